//! 出席管理の型定義
//!
//! 永続化レコードと照合結果の型:
//! - Roster: メンバー名簿（`{"members": [...]}`）
//! - AttendanceCounts: メンバー名 → 累計出席日数
//! - AttendanceLog: 日付キー（YYYY-MM-DD） → その日の出席者
//! - ReconcileOutcome: 1回の照合結果（出席・欠席）

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// メンバー名簿
///
/// 登録順を保持する。大文字小文字を無視して一意。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    members: Vec<String>,
}

impl Roster {
    /// 名前リストから作成（トリム・空行除去・重複除去を行う）
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::default();
        roster.replace(names);
        roster
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// 大文字小文字を無視して検索
    pub fn find_ci(&self, name: &str) -> Option<&str> {
        let folded = name.to_lowercase();
        self.iter().find(|m| m.to_lowercase() == folded)
    }

    /// 大文字小文字を無視して重複しているメンバー（2人目）を返す
    pub fn find_duplicate(&self) -> Option<&str> {
        self.members.iter().enumerate().find_map(|(i, name)| {
            let folded = name.to_lowercase();
            self.members[..i]
                .iter()
                .any(|m| m.to_lowercase() == folded)
                .then_some(name.as_str())
        })
    }

    pub(crate) fn members_mut(&mut self) -> &mut Vec<String> {
        &mut self.members
    }
}

/// 累計出席日数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceCounts(BTreeMap<String, u64>);

impl AttendanceCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未登録のメンバーは0
    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// 1加算して新しい値を返す
    pub fn increment(&mut self, name: &str) -> u64 {
        let count = self.0.entry(name.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for AttendanceCounts {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// 日付別の出席ログ
///
/// 各日の出席者リストは集合として扱う（重複なし、追加順）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceLog(BTreeMap<String, Vec<String>>);

impl AttendanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 出席者を追加する。既に記録済みなら何もせず false を返す
    pub fn insert(&mut self, day_key: &str, name: &str) -> bool {
        let members = self.0.entry(day_key.to_string()).or_default();
        if members.iter().any(|m| m == name) {
            return false;
        }
        members.push(name.to_string());
        true
    }

    pub fn day(&self, day_key: &str) -> Option<&[String]> {
        self.0.get(day_key).map(Vec::as_slice)
    }

    pub fn days(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 同じ日に重複して記録された名前を探す（最初の1件）
    pub fn find_duplicate(&self) -> Option<(&str, &str)> {
        for (day, members) in &self.0 {
            for (i, name) in members.iter().enumerate() {
                if members[..i].contains(name) {
                    return Some((day.as_str(), name.as_str()));
                }
            }
        }
        None
    }
}

/// 出席数つきのメンバー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedMember {
    pub name: String,
    pub count: u64,
}

/// 1回の照合結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    /// 記録先の日付キー
    pub day_key: String,
    /// 出席（ランキング順、同一メンバーの重複あり）
    pub matched: Vec<RankedMember>,
    /// 欠席（ランキング順、重複なし）
    pub absent: Vec<RankedMember>,
    /// 照合したトークン数
    pub token_count: usize,
    /// どのメンバーにも一致しなかったトークン
    pub unmatched: Vec<String>,
}

impl ReconcileOutcome {
    /// 出席メンバー名（重複除去、ランキング順）
    pub fn present_names(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for m in &self.matched {
            if !seen.contains(&m.name.as_str()) {
                seen.push(m.name.as_str());
            }
        }
        seen
    }
}

/// 日付指定の出席者照会結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAttendance {
    pub day_key: String,
    pub members: Vec<String>,
}

impl DayAttendance {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_record_format() {
        let roster = Roster::from_names(["Alice", "Bob"]);
        let json = serde_json::to_string(&roster).unwrap();
        assert_eq!(json, r#"{"members":["Alice","Bob"]}"#);
    }

    #[test]
    fn test_roster_missing_members_field() {
        let roster: Roster = serde_json::from_str("{}").unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn test_roster_find_ci() {
        let roster = Roster::from_names(["Alice", "Bob"]);
        assert_eq!(roster.find_ci("ALICE"), Some("Alice"));
        assert_eq!(roster.find_ci("carol"), None);
    }

    #[test]
    fn test_roster_find_duplicate() {
        let roster: Roster = serde_json::from_str(r#"{"members":["Alice","Bob","alice"]}"#).unwrap();
        assert_eq!(roster.find_duplicate(), Some("alice"));
        assert_eq!(Roster::from_names(["Alice", "Bob"]).find_duplicate(), None);
    }

    #[test]
    fn test_counts_default_zero() {
        let mut counts = AttendanceCounts::new();
        assert_eq!(counts.get("Alice"), 0);
        assert_eq!(counts.increment("Alice"), 1);
        assert_eq!(counts.increment("Alice"), 2);
        assert_eq!(counts.get("alice"), 0);
    }

    #[test]
    fn test_counts_flat_json() {
        let counts: AttendanceCounts = [("Alice", 3u64), ("Bob", 0)].into_iter().collect();
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"Alice":3,"Bob":0}"#);
    }

    #[test]
    fn test_counts_reject_negative() {
        let result: std::result::Result<AttendanceCounts, _> = serde_json::from_str(r#"{"Alice":-1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_insert_idempotent() {
        let mut log = AttendanceLog::new();
        assert!(log.insert("2025-01-01", "Alice"));
        assert!(!log.insert("2025-01-01", "Alice"));
        assert!(log.insert("2025-01-02", "Alice"));
        assert_eq!(log.day("2025-01-01"), Some(&["Alice".to_string()][..]));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_log_find_duplicate() {
        let log: AttendanceLog =
            serde_json::from_str(r#"{"2025-01-01":["Alice","Bob","Alice"]}"#).unwrap();
        assert_eq!(log.find_duplicate(), Some(("2025-01-01", "Alice")));

        let mut clean = AttendanceLog::new();
        clean.insert("2025-01-01", "Alice");
        assert_eq!(clean.find_duplicate(), None);
    }

    #[test]
    fn test_present_names_dedup() {
        let outcome = ReconcileOutcome {
            matched: vec![
                RankedMember { name: "Alice".into(), count: 2 },
                RankedMember { name: "Alice".into(), count: 2 },
                RankedMember { name: "Bob".into(), count: 1 },
            ],
            ..Default::default()
        };
        assert_eq!(outcome.present_names(), vec!["Alice", "Bob"]);
    }
}
