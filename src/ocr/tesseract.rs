//! Tesseract CLI連携

use super::preprocess::preprocess_file;
use super::TextExtractor;
use crate::error::{RollCallError, Result};
use image::ImageFormat;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone)]
pub struct TesseractCli {
    cmd: String,
    upscale: u32,
}

impl TesseractCli {
    pub fn new(cmd: impl Into<String>, upscale: u32) -> Self {
        Self {
            cmd: cmd.into(),
            upscale,
        }
    }
}

impl TextExtractor for TesseractCli {
    fn extract_text(&self, image: &Path) -> Result<String> {
        let prepared = preprocess_file(image, self.upscale)?;

        let tmp = tempfile::Builder::new()
            .prefix("roll-call-")
            .suffix(".png")
            .tempfile()?;
        prepared
            .save_with_format(tmp.path(), ImageFormat::Png)
            .map_err(|e| RollCallError::ImageLoad(format!("前処理画像の保存に失敗: {}", e)))?;

        let output = Command::new(&self.cmd)
            .arg(tmp.path())
            .arg("stdout")
            .output()
            .map_err(|e| RollCallError::Ocr(format!("{} を実行できません: {}", self.cmd, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RollCallError::Ocr(format!(
                "tesseract failed (code {:?}): {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        tracing::debug!(image = %image.display(), chars = text.len(), "ocr done");
        Ok(text)
    }

    fn cache_tag(&self) -> String {
        format!("tesseract-x{}", self.upscale)
    }
}
