//! トークンと名簿メンバーの照合

use crate::error::{Error, Result};
use crate::similarity::similarity;
use crate::types::Roster;
use serde::{Deserialize, Serialize};

/// 一致とみなす類似度の閾値（0〜100）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct MatchThreshold(f64);

impl MatchThreshold {
    pub const DEFAULT: f64 = 80.0;

    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&value) {
            return Err(Error::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn accepts(self, score: f64) -> bool {
        score >= self.0
    }
}

impl Default for MatchThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<f64> for MatchThreshold {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MatchThreshold> for f64 {
    fn from(threshold: MatchThreshold) -> Self {
        threshold.0
    }
}

impl std::fmt::Display for MatchThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 貪欲照合器
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    threshold: MatchThreshold,
}

impl Matcher {
    pub fn new(threshold: MatchThreshold) -> Self {
        Self { threshold }
    }

    pub fn is_match(&self, token: &str, member: &str) -> bool {
        self.threshold.accepts(similarity(token, member))
    }

    /// 名簿順で最初に閾値を満たしたメンバーを返す
    ///
    /// より類似度の高いメンバーが後ろにいても探索は打ち切る。
    pub fn find_member<'r>(&self, token: &str, roster: &'r Roster) -> Option<&'r str> {
        roster.iter().find(|member| self.is_match(token, member))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_bounds() {
        assert!(MatchThreshold::new(0.0).is_ok());
        assert!(MatchThreshold::new(100.0).is_ok());
        assert!(matches!(MatchThreshold::new(100.5), Err(Error::InvalidThreshold(_))));
        assert!(MatchThreshold::new(-1.0).is_err());
        assert!(MatchThreshold::new(f64::NAN).is_err());
    }

    #[test]
    fn test_threshold_serde() {
        let t: MatchThreshold = serde_json::from_str("75").unwrap();
        assert_eq!(t.value(), 75.0);
        assert!(serde_json::from_str::<MatchThreshold>("150").is_err());
        assert_eq!(serde_json::to_string(&t).unwrap(), "75.0");
    }

    #[test]
    fn test_boundary_exactly_eighty_matches() {
        let matcher = Matcher::default();
        assert!(matcher.is_match("abcde", "abcdx"));
    }

    #[test]
    fn test_boundary_just_below_eighty() {
        // LCS=17, 合計43 → 79.07
        let matcher = Matcher::default();
        assert!(!matcher.is_match("abcdefghijklmnopq", "abcdefghijklmnopq123456789"));
    }

    #[test]
    fn test_first_member_wins() {
        // "Alicia" と "Alice" の両方が閾値を超えるトークン
        let roster = Roster::from_names(["Alicia", "Alice"]);
        let matcher = Matcher::default();
        assert_eq!(matcher.find_member("Alici", &roster), Some("Alicia"));
    }

    #[test]
    fn test_no_member() {
        let roster = Roster::from_names(["Alice", "Bob", "Carol"]);
        assert_eq!(Matcher::default().find_member("Xander", &roster), None);
    }

    #[test]
    fn test_custom_threshold() {
        let roster = Roster::from_names(["Carol"]);
        let strict = Matcher::new(MatchThreshold::new(95.0).unwrap());
        assert_eq!(strict.find_member("Carrol", &roster), None);
        assert_eq!(Matcher::default().find_member("Carrol", &roster), Some("Carol"));
    }
}
