//! 一覧表示の並び順
//!
//! 出席数の多い順、同数なら名前（大文字小文字無視）の昇順。

use crate::types::{AttendanceCounts, RankedMember};
use std::cmp::Reverse;

/// 並び替えキー
pub fn rank_key(name: &str, counts: &AttendanceCounts) -> (Reverse<u64>, String) {
    (Reverse(counts.get(name)), name.to_lowercase())
}

/// ランキング順に並び替える（安定ソート）
pub fn sort_ranked<S: AsRef<str>>(names: &mut [S], counts: &AttendanceCounts) {
    names.sort_by_cached_key(|name| rank_key(name.as_ref(), counts));
}

/// 出席数を付けてランキング順に並べる
pub fn ranked<'a, I>(names: I, counts: &AttendanceCounts) -> Vec<RankedMember>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut names: Vec<&str> = names.into_iter().collect();
    sort_ranked(&mut names, counts);
    names
        .into_iter()
        .map(|name| RankedMember {
            name: name.to_string(),
            count: counts.get(name),
        })
        .collect()
}

/// 単純な文字列順（日付照会用）
pub fn sort_plain(names: &mut [String]) {
    names.sort();
}
