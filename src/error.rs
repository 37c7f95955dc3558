use thiserror::Error;

#[derive(Error, Debug)]
pub enum RollCallError {
    #[error(transparent)]
    Core(#[from] roll_call_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("保存データが不正です ({file}): {reason}")]
    InvalidRecord { file: String, reason: String },

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("OCR実行エラー: {0}")]
    Ocr(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("ロック取得に失敗: {0}")]
    Lock(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl RollCallError {
    pub(crate) fn invalid_record(file: impl Into<String>, reason: impl ToString) -> Self {
        RollCallError::InvalidRecord {
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RollCallError>;
