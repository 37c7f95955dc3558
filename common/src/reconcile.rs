//! 出席照合エンジン
//!
//! ## 処理フロー
//! 1. トークンを出現順に走査
//! 2. 名簿順で最初に閾値を満たしたメンバーに割り当て（貪欲）
//! 3. 一致ごとに累計を+1、当日ログへは未記録の場合のみ追加
//! 4. 名簿から一致メンバーを除いたものを欠席とする
//!
//! 同一実行内で同じメンバーに複数トークンが一致した場合、累計はその回数分増える。
//! 当日ログは集合なので1回だけ記録される。

use crate::error::{Error, Result};
use crate::matcher::Matcher;
use crate::ranking::{ranked, sort_plain};
use crate::tokenizer::TokenPool;
use crate::types::{AttendanceCounts, AttendanceLog, DayAttendance, ReconcileOutcome, Roster};
use std::collections::HashSet;

/// トークンを名簿と照合し、累計とログを更新する
///
/// 名簿が空の場合は何も変更せず `Error::NoRoster` を返す。
/// 永続化は呼び出し側の責務。
pub fn reconcile(
    pool: &TokenPool,
    roster: &Roster,
    counts: &mut AttendanceCounts,
    log: &mut AttendanceLog,
    day_key: &str,
    matcher: &Matcher,
) -> Result<ReconcileOutcome> {
    if roster.is_empty() {
        return Err(Error::NoRoster);
    }

    let mut matched: Vec<&str> = Vec::new();
    let mut unmatched = Vec::new();

    for token in pool.iter() {
        match matcher.find_member(token, roster) {
            Some(member) => {
                matched.push(member);
                counts.increment(member);
                log.insert(day_key, member);
            }
            None => unmatched.push(token.to_string()),
        }
    }

    let present: HashSet<&str> = matched.iter().copied().collect();
    let absent = roster.iter().filter(|m| !present.contains(m));

    Ok(ReconcileOutcome {
        day_key: day_key.to_string(),
        absent: ranked(absent, counts),
        matched: ranked(matched, counts),
        token_count: pool.len(),
        unmatched,
    })
}

/// 指定日の出席者を単純な文字列順で返す
///
/// 記録がない日は空の結果（エラーではない）。
pub fn day_attendance(log: &AttendanceLog, day_key: &str) -> DayAttendance {
    let mut members = log.day(day_key).map(<[String]>::to_vec).unwrap_or_default();
    sort_plain(&mut members);
    DayAttendance {
        day_key: day_key.to_string(),
        members,
    }
}
