//! OCR結果キャッシュモジュール
//!
//! 画像のSHA-256ハッシュをキーにしてOCRテキストをキャッシュし、
//! 同じスクリーンショットの再OCRをスキップする。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".ocr-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrCacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ハッシュ → OCRテキスト
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    pub text: String,
}

impl OcrCacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（壊れていれば空から作り直す）
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, OcrCacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(_) => {
                tracing::warn!("OCR cache version mismatch, rebuilding");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "OCR cache unreadable, rebuilding");
                Self::default()
            }
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// キャッシュファイルを削除。存在しなかった場合は false
    pub fn clear(folder: &Path) -> Result<bool> {
        let path = Self::cache_path(folder);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }

    pub fn get(&self, hash: &str) -> Option<&str> {
        self.entries.get(hash).map(|e| e.text.as_str())
    }

    pub fn insert(&mut self, hash: String, file_name: String, file_size: u64, text: String) {
        self.entries.insert(hash, CacheEntry {
            file_name,
            file_size,
            text,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OcrCacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// 画像の内容と抽出器の設定からキーを作る
pub fn compute_cache_key(path: &Path, tag: &str) -> Result<(String, u64)> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    hasher.update(tag.as_bytes());
    Ok((hex::encode(hasher.finalize()), bytes.len() as u64))
}
