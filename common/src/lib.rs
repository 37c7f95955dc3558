//! Roll Call Common Library
//!
//! 名簿照合・出席集計の純粋ロジック（ファイル・時刻・OCRには触れない）

pub mod types;
pub mod error;
pub mod tokenizer;
pub mod similarity;
pub mod matcher;
pub mod ranking;
pub mod filter;
pub mod roster;
pub mod reconcile;

pub use types::{AttendanceCounts, AttendanceLog, DayAttendance, RankedMember, ReconcileOutcome, Roster};
pub use error::{Error, Result};
pub use tokenizer::{extract_tokens, TokenPool};
pub use similarity::similarity;
pub use matcher::{MatchThreshold, Matcher};
pub use ranking::{rank_key, ranked, sort_plain, sort_ranked};
pub use filter::{filter_by_count, CountOperator};
pub use roster::parse_roster_upload;
pub use reconcile::{day_attendance, reconcile};
