//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No roster configured. Use `set` first")]
    NoRoster,

    #[error("Invalid operator: {0}. Use one of: =, <, <=, >, >=")]
    InvalidOperator(String),

    #[error("Member already exists (case-insensitive match): {0}")]
    DuplicateMember(String),

    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Invalid member name: {0:?}")]
    InvalidMemberName(String),

    #[error("Unsupported roster file: {0}. Upload a .txt or .json file")]
    UnsupportedRosterFile(String),

    #[error("Invalid match threshold: {0} (expected 0-100)")]
    InvalidThreshold(f64),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
