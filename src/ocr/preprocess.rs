use crate::error::{InterlockError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// 長辺が `max_size` に収まるよう縮小してJPEGに再エンコード
///
/// 収まっている画像はそのまま返す。`max_size == 0` で縮小しない。
pub fn prepare_image(bytes: &[u8], max_size: u32) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| InterlockError::ImageLoad(e.to_string()))?;

    let (width, height) = img.dimensions();
    if max_size == 0 || width.max(height) <= max_size {
        return Ok(bytes.to_vec());
    }

    let resized = img.resize(max_size, max_size, FilterType::Lanczos3);
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buffer = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .map_err(|e| InterlockError::ImageLoad(format!("JPEG encoding failed: {}", e)))?;

    Ok(buffer)
}
