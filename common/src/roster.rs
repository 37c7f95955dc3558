//! 名簿の管理操作
//!
//! 同一性は大文字小文字を無視して判定する。

use crate::error::{Error, Result};
use crate::types::Roster;

impl Roster {
    /// 名簿を丸ごと置き換える
    ///
    /// 前後の空白を除去し、空行と大文字小文字違いの重複を捨てる（先勝ち）。
    /// 保存された人数を返す。
    pub fn replace<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members = self.members_mut();
        members.clear();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let folded = name.to_lowercase();
            if members.iter().any(|m| m.to_lowercase() == folded) {
                continue;
            }
            members.push(name.to_string());
        }
        members.len()
    }

    /// メンバーを1人追加
    pub fn add(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidMemberName(name.to_string()));
        }
        if let Some(existing) = self.find_ci(name) {
            return Err(Error::DuplicateMember(existing.to_string()));
        }
        self.members_mut().push(name.to_string());
        Ok(())
    }

    /// 大文字小文字を無視して一致したメンバーを削除し、削除した名前を返す
    pub fn remove(&mut self, name: &str) -> Result<Vec<String>> {
        let folded = name.trim().to_lowercase();
        let members = self.members_mut();
        let (removed, kept): (Vec<String>, Vec<String>) = members
            .drain(..)
            .partition(|m| m.to_lowercase() == folded);
        *members = kept;

        if removed.is_empty() {
            return Err(Error::MemberNotFound(name.to_string()));
        }
        Ok(removed)
    }
}

/// アップロードされた名簿ファイルを解釈する
///
/// - `.txt`: 1行1名
/// - `.json`: `{"members": [...]}`
pub fn parse_roster_upload(file_name: &str, content: &str) -> Result<Roster> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".txt") {
        Ok(Roster::from_names(content.lines()))
    } else if lower.ends_with(".json") {
        let record: Roster = serde_json::from_str(content)?;
        Ok(Roster::from_names(record.members()))
    } else {
        Err(Error::UnsupportedRosterFile(file_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_trims_and_dedups() {
        let mut roster = Roster::from_names(["Old"]);
        let saved = roster.replace(["  Alice ", "", "Bob", "alice", "   "]);
        assert_eq!(saved, 2);
        assert_eq!(roster.members(), &["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_add() {
        let mut roster = Roster::from_names(["Alice"]);
        roster.add("Bob").unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_add_duplicate_case_insensitive() {
        let mut roster = Roster::from_names(["Alice"]);
        let err = roster.add("ALICE").unwrap_err();
        assert!(matches!(err, Error::DuplicateMember(ref n) if n == "Alice"));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_add_empty_name() {
        let mut roster = Roster::default();
        assert!(matches!(roster.add("   "), Err(Error::InvalidMemberName(_))));
    }

    #[test]
    fn test_remove_case_insensitive() {
        let mut roster = Roster::from_names(["Alice", "Bob"]);
        let removed = roster.remove("bob").unwrap();
        assert_eq!(removed, vec!["Bob".to_string()]);
        assert_eq!(roster.members(), &["Alice".to_string()]);
    }

    #[test]
    fn test_remove_not_found() {
        let mut roster = Roster::from_names(["Alice"]);
        assert!(matches!(roster.remove("Zed"), Err(Error::MemberNotFound(_))));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_parse_txt() {
        let roster = parse_roster_upload("members.TXT", "Alice\r\nBob\n\n").unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_parse_json() {
        let roster = parse_roster_upload("m.json", r#"{"members": ["Alice", " Bob "]}"#).unwrap();
        assert_eq!(roster.members(), &["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_parse_json_invalid() {
        assert!(matches!(parse_roster_upload("m.json", "[1, 2"), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_unsupported() {
        assert!(matches!(
            parse_roster_upload("m.csv", "Alice"),
            Err(Error::UnsupportedRosterFile(_))
        ));
    }
}
