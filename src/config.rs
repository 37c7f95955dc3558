use crate::error::{RollCallError, Result};
use roll_call_common::MatchThreshold;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DATA_DIR_ENV: &str = "ROLL_CALL_DATA_DIR";
const TESSERACT_ENV: &str = "ROLL_CALL_TESSERACT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 名簿・累計・ログの保存先（None ならカレントディレクトリ）
    pub data_dir: Option<PathBuf>,
    pub match_threshold: MatchThreshold,
    /// 照合実行時の「今日」を決めるUTCオフセット（分）
    pub check_utc_offset_minutes: i32,
    /// today/yesterday 照会のUTCオフセット（分）
    pub query_utc_offset_minutes: i32,
    /// 照合中に保存先をロックして同時実行を直列化する
    pub strict_locking: bool,
    pub lock_timeout_ms: u64,
    pub tesseract_cmd: String,
    pub upscale_factor: u32,
    /// 同じ画像のOCR結果を再利用する
    pub ocr_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            match_threshold: MatchThreshold::default(),
            check_utc_offset_minutes: 7 * 60, // Asia/Ho_Chi_Minh（夏時間なし）
            query_utc_offset_minutes: 0,
            strict_locking: true,
            lock_timeout_ms: 10_000,
            tesseract_cmd: default_tesseract_cmd().into(),
            upscale_factor: 2,
            ocr_cache: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)
                .map_err(|e| RollCallError::Config(format!("{}: {}", config_path.display(), e)))?
        } else {
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RollCallError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("roll-call").join("config.json"))
    }

    /// 環境変数で上書き
    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(cmd) = std::env::var(TESSERACT_ENV) {
            if !cmd.trim().is_empty() {
                self.tesseract_cmd = cmd;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        const MAX_OFFSET_MINUTES: i32 = 24 * 60;
        for (name, offset) in [
            ("check_utc_offset_minutes", self.check_utc_offset_minutes),
            ("query_utc_offset_minutes", self.query_utc_offset_minutes),
        ] {
            if offset.abs() >= MAX_OFFSET_MINUTES {
                return Err(RollCallError::Config(format!("{} が範囲外です: {}", name, offset)));
            }
        }
        if self.upscale_factor == 0 {
            return Err(RollCallError::Config("upscale_factor は1以上にしてください".into()));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn set_tesseract_cmd(&mut self, cmd: String) -> Result<()> {
        self.tesseract_cmd = cmd;
        self.save()
    }

    pub fn set_match_threshold(&mut self, value: f64) -> Result<()> {
        self.match_threshold = MatchThreshold::new(value)?;
        self.save()
    }
}

fn default_tesseract_cmd() -> &'static str {
    if cfg!(windows) {
        r"C:\Program Files\Tesseract-OCR\tesseract.exe"
    } else {
        "tesseract"
    }
}
