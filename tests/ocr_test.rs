//! OCR抽出・キャッシュのテスト
//!
//! tesseract の代わりに固定テキストを返す抽出器を使う

use roll_call_rust::error::{RollCallError, Result};
use roll_call_rust::ocr::{extract_all_blocking, OcrCacheFile, TextExtractor};
use roll_call_rust::scanner::ImageInfo;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

/// ファイル内容をそのままテキストとして返す
struct EchoExtractor {
    calls: AtomicUsize,
}

impl EchoExtractor {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextExtractor for EchoExtractor {
    fn extract_text(&self, image: &Path) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(std::fs::read_to_string(image)?)
    }

    fn cache_tag(&self) -> String {
        "echo".to_string()
    }
}

struct FailingExtractor;

impl TextExtractor for FailingExtractor {
    fn extract_text(&self, _image: &Path) -> Result<String> {
        Err(RollCallError::Ocr("engine crashed".to_string()))
    }

    fn cache_tag(&self) -> String {
        "fail".to_string()
    }
}

fn write_images(dir: &Path, contents: &[&str]) -> Vec<ImageInfo> {
    contents
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let path = dir.join(format!("shot_{}.png", i));
            std::fs::write(&path, text).unwrap();
            ImageInfo::from_path(&path)
        })
        .collect()
}

/// 入力順で結果が返る
#[test]
fn test_results_in_input_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    let images = write_images(dir.path(), &["Alice", "Bob", "Carol", "Dave"]);
    let extractor = EchoExtractor::new();

    let results = extract_all_blocking(&images, &extractor, None, false).unwrap();

    let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["Alice", "Bob", "Carol", "Dave"]);
    assert_eq!(results[2].file_name, "shot_2.png");
    assert_eq!(extractor.calls(), 4);
}

/// 2回目はキャッシュから取得
#[test]
fn test_cache_hit_skips_extractor() {
    let dir = tempdir().expect("Failed to create temp dir");
    let images = write_images(dir.path(), &["Alice\nBob", "Carol"]);
    let extractor = EchoExtractor::new();

    let first = extract_all_blocking(&images, &extractor, Some(dir.path()), false).unwrap();
    assert!(first.iter().all(|r| !r.cached));
    assert_eq!(OcrCacheFile::load(dir.path()).len(), 2);

    let second = extract_all_blocking(&images, &extractor, Some(dir.path()), false).unwrap();
    assert!(second.iter().all(|r| r.cached));
    assert_eq!(second[0].text, "Alice\nBob");
    assert_eq!(extractor.calls(), 2);
}

/// 抽出器のエラーはそのまま返る
#[test]
fn test_extractor_error_propagates() {
    let dir = tempdir().expect("Failed to create temp dir");
    let images = write_images(dir.path(), &["Alice"]);

    let result = extract_all_blocking(&images, &FailingExtractor, Some(dir.path()), false);

    assert!(matches!(result, Err(RollCallError::Ocr(_))));
    assert!(!OcrCacheFile::cache_path(dir.path()).exists());
}

/// キャッシュファイルが破損している場合は空として扱う
#[test]
fn test_cache_corrupted_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(OcrCacheFile::cache_path(dir.path()), "{ invalid json }").unwrap();

    let cache = OcrCacheFile::load(dir.path());
    assert!(cache.is_empty());
}

/// キャッシュの保存・上書き・削除
#[test]
fn test_cache_save_overwrite_clear() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = OcrCacheFile::load(dir.path());
    cache.insert("hash".into(), "a.png".into(), 10, "first".into());
    cache.insert("hash".into(), "a.png".into(), 10, "second".into());
    cache.save(dir.path()).expect("キャッシュ保存失敗");

    let loaded = OcrCacheFile::load(dir.path());
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("hash"), Some("second"));

    assert!(OcrCacheFile::clear(dir.path()).unwrap());
    assert!(!OcrCacheFile::clear(dir.path()).unwrap());
}
