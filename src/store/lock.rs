//! 実行ロック
//!
//! 保存先ディレクトリにロックファイルを排他作成する。プロセス間でも有効。
//! ファイルには保持プロセスのPIDを書く。そのプロセスが終了していれば
//! （強制終了などで削除されずに残ったロック）引き継ぐ。

use crate::error::{RollCallError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use sysinfo::{Pid, ProcessesToUpdate, System};

pub const LOCK_FILE_NAME: &str = ".roll-call.lock";

const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// PIDが読めないロックファイルを放置とみなすまでの時間（作成直後は書き込み前のことがある）
const UNWRITTEN_GRACE: Duration = Duration::from_secs(2);

/// ドロップ時にロックファイルを削除する
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(dir: &Path, timeout: Duration) -> Result<Self> {
        let path = dir.join(LOCK_FILE_NAME);
        let started = Instant::now();

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let lock = Self { path };
                    writeln!(file, "{}", std::process::id())?;
                    file.flush()?;
                    tracing::debug!(lock = %lock.path.display(), "run lock acquired");
                    return Ok(lock);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if let Some(owner) = stale_owner(&path) {
                        tracing::warn!(lock = %path.display(), owner = %owner, "taking over stale run lock");
                        match std::fs::remove_file(&path) {
                            Ok(()) => continue,
                            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                            Err(e) => return Err(e.into()),
                        }
                    }

                    if started.elapsed() >= timeout {
                        return Err(RollCallError::Lock(format!(
                            "{} が解放されません（{}ms待機）",
                            path.display(),
                            timeout.as_millis()
                        )));
                    }
                    std::thread::sleep(RETRY_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 保持プロセスが終了しているロックなら、その保持者の表示名を返す
fn stale_owner(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    match content.trim().parse::<u32>() {
        Ok(pid) => (!is_process_alive(pid)).then(|| format!("pid {}", pid)),
        Err(_) => {
            let age = std::fs::metadata(path)
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| SystemTime::now().duration_since(modified).ok())?;
            (age >= UNWRITTEN_GRACE).then(|| "unknown".to_string())
        }
    }
}

fn is_process_alive(pid: u32) -> bool {
    if pid == std::process::id() {
        return true;
    }
    let pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]));
    system.process(pid).is_some()
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release run lock");
        }
    }
}
