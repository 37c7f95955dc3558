//! 出席数による絞り込み

use crate::error::{Error, Result};
use crate::ranking::ranked;
use crate::types::{AttendanceCounts, RankedMember, Roster};

/// 比較演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountOperator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CountOperator {
    pub fn matches(self, count: u64, value: i64) -> bool {
        let count = i128::from(count);
        let value = i128::from(value);
        match self {
            CountOperator::Eq => count == value,
            CountOperator::Lt => count < value,
            CountOperator::Le => count <= value,
            CountOperator::Gt => count > value,
            CountOperator::Ge => count >= value,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CountOperator::Eq => "=",
            CountOperator::Lt => "<",
            CountOperator::Le => "<=",
            CountOperator::Gt => ">",
            CountOperator::Ge => ">=",
        }
    }
}

impl std::str::FromStr for CountOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "=" => Ok(CountOperator::Eq),
            "<" => Ok(CountOperator::Lt),
            "<=" => Ok(CountOperator::Le),
            ">" => Ok(CountOperator::Gt),
            ">=" => Ok(CountOperator::Ge),
            other => Err(Error::InvalidOperator(other.to_string())),
        }
    }
}

impl std::fmt::Display for CountOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// 条件を満たす名簿メンバーをランキング順で返す
pub fn filter_by_count(
    roster: &Roster,
    counts: &AttendanceCounts,
    operator: CountOperator,
    value: i64,
) -> Vec<RankedMember> {
    ranked(
        roster.iter().filter(|m| operator.matches(counts.get(m), value)),
        counts,
    )
}
