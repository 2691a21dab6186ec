use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, codecs::jpeg::JpegEncoder};
use tracing::error;

use crate::domain::{common::entities::app_errors::CoreError, storage::ports::ThumbnailGenerator};

const THUMBNAIL_MAX_SIDE: u32 = 300;
const THUMBNAIL_QUALITY: u8 = 80;

/// JPEG previews that fit a 300x300 box, never enlarged.
#[derive(Debug, Clone, Default)]
pub struct ImageThumbnailGenerator;

impl ImageThumbnailGenerator {
    pub fn new() -> Self {
        Self
    }
}

fn render_thumbnail(data: &[u8]) -> Result<Vec<u8>, CoreError> {
    let img = image::load_from_memory(data).map_err(|e| {
        error!("Failed to decode image for thumbnail: {}", e);
        CoreError::UnsupportedFileType("image could not be decoded".to_string())
    })?;

    let (width, height) = img.dimensions();
    let img = if width > THUMBNAIL_MAX_SIDE || height > THUMBNAIL_MAX_SIDE {
        img.thumbnail(THUMBNAIL_MAX_SIDE, THUMBNAIL_MAX_SIDE)
    } else {
        img
    };

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, THUMBNAIL_QUALITY);
    rgb.write_with_encoder(encoder).map_err(|e| {
        error!("Failed to encode thumbnail: {}", e);
        CoreError::StorageError(format!("thumbnail encoding failed: {e}"))
    })?;

    Ok(out.into_inner())
}

impl ThumbnailGenerator for ImageThumbnailGenerator {
    async fn generate(&self, image: Bytes) -> Result<Bytes, CoreError> {
        let encoded = tokio::task::spawn_blocking(move || render_thumbnail(&image))
            .await
            .map_err(|e| {
                error!("Thumbnail task panicked: {}", e);
                CoreError::InternalServerError
            })??;

        Ok(Bytes::from(encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png(width: u32, height: u32) -> Bytes {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 80, 40])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        Bytes::from(out.into_inner())
    }

    #[tokio::test]
    async fn test_large_image_is_scaled_down() {
        let thumb = ImageThumbnailGenerator::new().generate(png(900, 600)).await.unwrap();

        let decoded = image::load_from_memory_with_format(&thumb, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (300, 200));
    }

    #[tokio::test]
    async fn test_small_image_keeps_size() {
        let thumb = ImageThumbnailGenerator::new().generate(png(120, 80)).await.unwrap();

        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(decoded.dimensions(), (120, 80));
    }

    #[tokio::test]
    async fn test_garbage_is_rejected() {
        let result = ImageThumbnailGenerator::new()
            .generate(Bytes::from_static(b"not an image"))
            .await;

        assert!(matches!(result, Err(CoreError::UnsupportedFileType(_))));
    }
}
