//! Image preprocessing ahead of Tesseract.
//!
//! Low-contrast screenshots OCR badly as-is, so images are scaled down,
//! converted to grayscale, contrast-boosted and binarized first.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

use super::backend::OcrError;

/// Images wider than this are scaled down before OCR.
pub const MAX_WIDTH: u32 = 2000;

/// Contrast enhancement factor (1.0 leaves the image unchanged).
const CONTRAST_FACTOR: f32 = 2.0;

/// Luminance above which a pixel becomes white.
const THRESHOLD: u8 = 180;

/// Load an image from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, OcrError> {
    image::open(path).map_err(|e| OcrError::ImageError(format!("Failed to load image: {}", e)))
}

/// Scale an image down to `max_width`, preserving the aspect ratio.
/// Images already within the limit are returned unchanged.
pub fn resize_to_max_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    if width <= max_width {
        return img;
    }
    let ratio = max_width as f64 / width as f64;
    let new_height = ((height as f64 * ratio) as u32).max(1);
    img.resize_exact(max_width, new_height, FilterType::Lanczos3)
}

/// Grayscale, enhance contrast, stretch levels and threshold to pure black/white.
pub fn binarize(img: &DynamicImage) -> GrayImage {
    let mut gray = img.to_luma8();
    enhance_contrast(&mut gray, CONTRAST_FACTOR);
    autocontrast(&mut gray);
    threshold(&mut gray, THRESHOLD);
    gray
}

/// Push pixel values away from the mean luminance by `factor`.
fn enhance_contrast(gray: &mut GrayImage, factor: f32) {
    let count = (gray.width() as u64 * gray.height() as u64).max(1);
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    let mean = (sum as f32 / count as f32).round();

    for pixel in gray.pixels_mut() {
        let value = mean + factor * (pixel.0[0] as f32 - mean);
        *pixel = Luma([value.clamp(0.0, 255.0) as u8]);
    }
}

/// Stretch the darkest pixel to 0 and the brightest to 255.
fn autocontrast(gray: &mut GrayImage) {
    let (min, max) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
    if max <= min {
        return;
    }

    let scale = 255.0 / (max - min) as f32;
    for pixel in gray.pixels_mut() {
        let value = (pixel.0[0] - min) as f32 * scale;
        *pixel = Luma([value.round().clamp(0.0, 255.0) as u8]);
    }
}

fn threshold(gray: &mut GrayImage, level: u8) {
    for pixel in gray.pixels_mut() {
        *pixel = Luma([if pixel.0[0] > level { 255 } else { 0 }]);
    }
}

/// Load, resize and binarize `source`, writing the result as PNG into `dest_dir`.
pub fn preprocess_to_file(source: &Path, dest_dir: &Path) -> Result<PathBuf, OcrError> {
    let img = resize_to_max_width(load_image(source)?, MAX_WIDTH);
    let processed = binarize(&img);

    let dest = dest_dir.join(preprocessed_file_name(source));
    processed
        .save(&dest)
        .map_err(|e| OcrError::ImageError(format!("Failed to save preprocessed image: {}", e)))?;
    debug!("Preprocessed image written to {}", dest.display());
    Ok(dest)
}

/// `photo.jpg` -> `photo_preprocessed.png`
pub fn preprocessed_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    format!("{}_preprocessed.png", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_resize_preserves_aspect_ratio() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4000, 1000));
        let resized = resize_to_max_width(img, MAX_WIDTH);
        assert_eq!(resized.width(), 2000);
        assert_eq!(resized.height(), 500);
    }

    #[test]
    fn test_resize_leaves_small_images_alone() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let resized = resize_to_max_width(img, MAX_WIDTH);
        assert_eq!((resized.width(), resized.height()), (640, 480));
    }

    #[test]
    fn test_binarize_produces_black_and_white() {
        let mut img = RgbImage::from_pixel(10, 10, Rgb([200, 200, 200]));
        for x in 0..5 {
            img.put_pixel(x, 0, Rgb([90, 90, 90]));
        }
        let out = binarize(&DynamicImage::ImageRgb8(img));

        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(9, 9).0[0], 255);
    }

    #[test]
    fn test_binarize_uniform_image() {
        let img = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        let out = binarize(&DynamicImage::ImageRgb8(img));
        assert!(out.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_preprocessed_file_name() {
        assert_eq!(
            preprocessed_file_name(Path::new("/tmp/shot.jpg")),
            "shot_preprocessed.png"
        );
    }

    #[test]
    fn test_preprocess_to_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sample.png");
        RgbImage::from_pixel(8, 8, Rgb([10, 10, 10]))
            .save(&source)
            .unwrap();

        let out_dir = tempfile::tempdir().unwrap();
        let dest = preprocess_to_file(&source, out_dir.path()).unwrap();
        assert!(dest.exists());
        assert_eq!(dest.file_name().unwrap(), "sample_preprocessed.png");
    }
}
