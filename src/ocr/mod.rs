//! 画像 → テキスト
//!
//! スクリーンショットごとにOCRを並列実行し、入力順でテキストを返す。
//! 照合はすべての画像が終わってから行う。

pub mod cache;
mod preprocess;
mod tesseract;

pub use cache::OcrCacheFile;
pub use preprocess::{preprocess, preprocess_file};
pub use tesseract::TesseractCli;

use crate::error::{RollCallError, Result};
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// 画像からテキストを取り出す外部処理
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, image: &Path) -> Result<String>;

    /// キャッシュキーに含める設定の識別子
    fn cache_tag(&self) -> String;
}

/// 1枚分のOCR結果
#[derive(Debug, Clone)]
pub struct ImageText {
    pub file_name: String,
    pub text: String,
    pub cached: bool,
}

/// 全画像のテキストを取得（キャッシュ利用時は `cache_dir` にキャッシュを置く）
pub async fn extract_all(
    images: Vec<ImageInfo>,
    extractor: Arc<dyn TextExtractor>,
    cache_dir: Option<&Path>,
    show_progress: bool,
) -> Result<Vec<ImageText>> {
    let cache_dir = cache_dir.map(Path::to_path_buf);

    tokio::task::spawn_blocking(move || {
        extract_all_blocking(&images, extractor.as_ref(), cache_dir.as_deref(), show_progress)
    })
    .await
    .map_err(|e| RollCallError::Ocr(format!("OCRタスクが失敗しました: {}", e)))?
}

pub fn extract_all_blocking(
    images: &[ImageInfo],
    extractor: &dyn TextExtractor,
    cache_dir: Option<&Path>,
    show_progress: bool,
) -> Result<Vec<ImageText>> {
    let mut cache = cache_dir.map(OcrCacheFile::load);
    let tag = extractor.cache_tag();

    let progress = if show_progress {
        let bar = ProgressBar::new(images.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let cache_ref = cache.as_ref();
    let results: Vec<(ImageText, Option<(String, u64)>)> = images
        .par_iter()
        .map(|img| -> Result<(ImageText, Option<(String, u64)>)> {
            let key = match cache_ref {
                Some(_) => Some(cache::compute_cache_key(&img.path, &tag)?),
                None => None,
            };

            let hit = cache_ref
                .zip(key.as_ref())
                .and_then(|(c, (hash, _))| c.get(hash).map(str::to_string));

            let (text, cached) = match hit {
                Some(text) => (text, true),
                None => (extractor.extract_text(&img.path)?, false),
            };

            progress.inc(1);
            Ok((
                ImageText {
                    file_name: img.file_name.clone(),
                    text,
                    cached,
                },
                key,
            ))
        })
        .collect::<Result<_>>()?;
    progress.finish_and_clear();

    if let (Some(cache), Some(dir)) = (cache.as_mut(), cache_dir) {
        let mut added = 0;
        for (image_text, key) in &results {
            if let (false, Some((hash, size))) = (image_text.cached, key) {
                cache.insert(hash.clone(), image_text.file_name.clone(), *size, image_text.text.clone());
                added += 1;
            }
        }
        if added > 0 {
            if let Err(e) = cache.save(dir) {
                tracing::warn!(error = %e, "failed to save OCR cache");
            }
        }
    }

    Ok(results.into_iter().map(|(text, _)| text).collect())
}
