//! 出席管理の操作
//!
//! 保存データの読み込み → 照合エンジン → 保存 をまとめる。
//! 権限チェックは呼び出し側（コマンド層）の責務。

use crate::clock::DayClock;
use crate::config::Config;
use crate::error::{RollCallError, Result};
use crate::store::{AttendanceStore, RunLock};
use roll_call_common::{
    day_attendance, filter_by_count, parse_roster_upload, ranked, reconcile, CountOperator,
    DayAttendance, Matcher, RankedMember, ReconcileOutcome, TokenPool,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AttendanceService {
    store: AttendanceStore,
    matcher: Matcher,
    clock: DayClock,
    strict_locking: bool,
    lock_timeout: Duration,
}

impl AttendanceService {
    pub fn new(store: AttendanceStore, matcher: Matcher, clock: DayClock) -> Self {
        Self {
            store,
            matcher,
            clock,
            strict_locking: true,
            lock_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_locking(mut self, strict: bool, timeout: Duration) -> Self {
        self.strict_locking = strict;
        self.lock_timeout = timeout;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let store = AttendanceStore::open(config.data_dir())?;
        let clock = DayClock::from_config(config)?;
        Ok(Self::new(store, Matcher::new(config.match_threshold), clock)
            .with_locking(config.strict_locking, Duration::from_millis(config.lock_timeout_ms)))
    }

    pub fn store(&self) -> &AttendanceStore {
        &self.store
    }

    /// 名簿の人数を返す。空なら `NoRoster`
    ///
    /// OCRの前に呼んで、名簿なしの実行で画像を読み取らないようにする。
    pub fn ensure_roster(&self) -> Result<usize> {
        let roster = self.store.load_roster()?;
        if roster.is_empty() {
            return Err(roll_call_common::Error::NoRoster.into());
        }
        Ok(roster.len())
    }

    /// `record_attendance` をブロッキングスレッドで実行する（ロック待ちで実行時を止めない）
    pub async fn record_attendance_task(&self, texts: Vec<String>) -> Result<ReconcileOutcome> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.record_attendance(&texts))
            .await
            .map_err(|e| RollCallError::Io(std::io::Error::other(format!("照合タスクが失敗しました: {}", e))))?
    }

    /// OCRテキスト（画像1枚につき1つ）から今日の出席を記録する
    pub fn record_attendance<S: AsRef<str>>(&self, texts: &[S]) -> Result<ReconcileOutcome> {
        let day_key = self.clock.check_day_key();
        self.record_attendance_on(texts, &day_key)
    }

    /// 日付キーを指定して出席を記録する
    ///
    /// 失敗時は何も保存しない。トークンが1つもなくても保存は行う（内容は変わらない）。
    pub fn record_attendance_on<S: AsRef<str>>(
        &self,
        texts: &[S],
        day_key: &str,
    ) -> Result<ReconcileOutcome> {
        let _guard = self.run_lock()?;

        let roster = self.store.load_roster()?;
        if roster.is_empty() {
            return Err(roll_call_common::Error::NoRoster.into());
        }
        let mut counts = self.store.load_counts()?;
        let mut log = self.store.load_log()?;

        let pool: TokenPool = texts.iter().map(|t| t.as_ref()).collect();
        let outcome = reconcile(&pool, &roster, &mut counts, &mut log, day_key, &self.matcher)?;

        self.store.save_attendance(&counts, &log)?;

        info!(
            day = day_key,
            tokens = outcome.token_count,
            matched = outcome.matched.len(),
            absent = outcome.absent.len(),
            "attendance recorded"
        );
        Ok(outcome)
    }

    /// 0 = 今日, 1 = 昨日（照会用タイムゾーン）
    pub fn day_attendance(&self, days_back: i64) -> Result<DayAttendance> {
        let day_key = self.clock.query_day_key(days_back);
        self.day_attendance_on(&day_key)
    }

    pub fn day_attendance_on(&self, day_key: &str) -> Result<DayAttendance> {
        let log = self.store.load_log()?;
        Ok(day_attendance(&log, day_key))
    }

    /// 名簿をランキング順で返す
    pub fn list_members(&self) -> Result<Vec<RankedMember>> {
        let roster = self.store.load_roster()?;
        let counts = self.store.load_counts()?;
        Ok(ranked(roster.iter(), &counts))
    }

    pub fn filter_members(&self, operator: CountOperator, value: i64) -> Result<Vec<RankedMember>> {
        let roster = self.store.load_roster()?;
        let counts = self.store.load_counts()?;
        Ok(filter_by_count(&roster, &counts, operator, value))
    }

    /// `.txt` / `.json` の名簿ファイルで置き換え、保存した人数を返す
    pub fn set_roster_from_file(&self, path: &Path) -> Result<usize> {
        if !path.is_file() {
            return Err(RollCallError::FileNotFound(path.display().to_string()));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let content = std::fs::read_to_string(path)?;
        let roster = parse_roster_upload(&file_name, &content)?;

        let _guard = self.run_lock()?;
        self.store.save_roster(&roster)?;
        info!(members = roster.len(), "roster replaced");
        Ok(roster.len())
    }

    pub fn add_member(&self, name: &str) -> Result<()> {
        let _guard = self.run_lock()?;
        let mut roster = self.store.load_roster()?;
        roster.add(name)?;
        self.store.save_roster(&roster)?;
        info!(member = name.trim(), "member added");
        Ok(())
    }

    pub fn remove_member(&self, name: &str) -> Result<Vec<String>> {
        let _guard = self.run_lock()?;
        let mut roster = self.store.load_roster()?;
        let removed = roster.remove(name)?;
        self.store.save_roster(&roster)?;
        info!(removed = ?removed, "member removed");
        Ok(removed)
    }

    /// 名簿を削除。名簿がなかった場合は false
    pub fn clear_roster(&self) -> Result<bool> {
        let _guard = self.run_lock()?;
        self.store.clear_roster()
    }

    fn run_lock(&self) -> Result<Option<RunLock>> {
        if !self.strict_locking {
            return Ok(None);
        }
        self.store.lock_for_run(self.lock_timeout).map(Some)
    }
}
