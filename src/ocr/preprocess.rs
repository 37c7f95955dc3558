//! OCR前処理
//!
//! グレースケール化 → 拡大 → 大津の二値化

use crate::error::{RollCallError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use std::path::Path;

pub fn preprocess_file(path: &Path, upscale: u32) -> Result<GrayImage> {
    let img = image::open(path)
        .map_err(|e| RollCallError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    Ok(preprocess(&img, upscale))
}

pub fn preprocess(img: &DynamicImage, upscale: u32) -> GrayImage {
    let gray = img.to_luma8();

    let resized = if upscale > 1 {
        imageops::resize(
            &gray,
            gray.width() * upscale,
            gray.height() * upscale,
            FilterType::Triangle,
        )
    } else {
        gray
    };

    let level = otsu_level(&resized);
    threshold(&resized, level, ThresholdType::Binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn two_tone(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 { Luma([40u8]) } else { Luma([210u8]) }
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_upscale_dimensions() {
        let out = preprocess(&two_tone(10, 4), 2);
        assert_eq!(out.dimensions(), (20, 8));
    }

    #[test]
    fn test_no_upscale() {
        let out = preprocess(&two_tone(10, 4), 1);
        assert_eq!(out.dimensions(), (10, 4));
    }

    #[test]
    fn test_output_is_binary() {
        let out = preprocess(&two_tone(16, 4), 2);
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(31, 0)[0], 255);
    }

    #[test]
    fn test_missing_file() {
        let result = preprocess_file(Path::new("/nonexistent/shot.png"), 2);
        assert!(matches!(result, Err(RollCallError::ImageLoad(_))));
    }
}
