//! 名簿・累計・ログのJSON保存
//!
//! - 読み込み: ファイルがなければ空、壊れていればエラー（自動修復しない）
//! - 保存: 一時ファイルに書いてから置き換える（途中状態は見えない）

mod lock;

pub use lock::{RunLock, LOCK_FILE_NAME};

use crate::clock::DAY_KEY_FORMAT;
use crate::error::{RollCallError, Result};
use chrono::NaiveDate;
use regex::Regex;
use roll_call_common::{AttendanceCounts, AttendanceLog, Roster};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

pub const ROSTER_FILE_NAME: &str = "guild_members.json";
pub const COUNTS_FILE_NAME: &str = "attendance_count.json";
pub const LOG_FILE_NAME: &str = "attendance_log.json";

#[derive(Debug, Clone)]
pub struct AttendanceStore {
    dir: PathBuf,
}

impl AttendanceStore {
    /// 保存先ディレクトリを開く（なければ作成）
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub fn load_roster(&self) -> Result<Roster> {
        let roster: Roster = self.load_record(ROSTER_FILE_NAME)?;
        validate_roster(&roster)?;
        Ok(roster)
    }

    pub fn save_roster(&self, roster: &Roster) -> Result<()> {
        self.write_record(ROSTER_FILE_NAME, roster)
    }

    /// 名簿ファイルを削除。存在しなかった場合は false
    pub fn clear_roster(&self) -> Result<bool> {
        let path = self.path_of(ROSTER_FILE_NAME);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn load_counts(&self) -> Result<AttendanceCounts> {
        self.load_record(COUNTS_FILE_NAME)
    }

    pub fn save_counts(&self, counts: &AttendanceCounts) -> Result<()> {
        self.write_record(COUNTS_FILE_NAME, counts)
    }

    pub fn load_log(&self) -> Result<AttendanceLog> {
        let log: AttendanceLog = self.load_record(LOG_FILE_NAME)?;
        validate_log(&log)?;
        Ok(log)
    }

    pub fn save_log(&self, log: &AttendanceLog) -> Result<()> {
        self.write_record(LOG_FILE_NAME, log)
    }

    /// 照合結果をまとめて保存
    pub fn save_attendance(&self, counts: &AttendanceCounts, log: &AttendanceLog) -> Result<()> {
        validate_log(log)?;
        self.save_counts(counts)?;
        self.save_log(log)
    }

    /// 読み込み〜保存の間、他の実行を待たせる
    pub fn lock_for_run(&self, timeout: Duration) -> Result<RunLock> {
        RunLock::acquire(&self.dir, timeout)
    }

    fn load_record<T>(&self, file_name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path_of(file_name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| RollCallError::invalid_record(file_name, e))
    }

    fn write_record<T: Serialize>(&self, file_name: &str, value: &T) -> Result<()> {
        let path = self.path_of(file_name);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        tracing::debug!(file = %path.display(), "saved");
        Ok(())
    }
}

/// 大文字小文字違いの同一メンバーを拒否
fn validate_roster(roster: &Roster) -> Result<()> {
    if let Some(name) = roster.find_duplicate() {
        return Err(RollCallError::invalid_record(
            ROSTER_FILE_NAME,
            format!("{} が重複しています（大文字小文字を無視）", name),
        ));
    }
    Ok(())
}

/// 日付キーの形式と、同日内の重複をチェック
fn validate_log(log: &AttendanceLog) -> Result<()> {
    lazy_static::lazy_static! {
        static ref DAY_KEY_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    }

    let is_day_key =
        |day: &str| DAY_KEY_RE.is_match(day) && NaiveDate::parse_from_str(day, DAY_KEY_FORMAT).is_ok();
    if let Some(day) = log.days().find(|day| !is_day_key(*day)) {
        return Err(RollCallError::invalid_record(
            LOG_FILE_NAME,
            format!("日付キーが YYYY-MM-DD 形式ではありません: {:?}", day),
        ));
    }

    if let Some((day, name)) = log.find_duplicate() {
        return Err(RollCallError::invalid_record(
            LOG_FILE_NAME,
            format!("{} に {} が重複しています", day, name),
        ));
    }

    Ok(())
}
