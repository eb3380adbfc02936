use bytes::Bytes;

use super::orientation::ImageOrientation;
use crate::compression::{encode_jpeg, CompressionError};

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Unsupported or corrupt image data: {0}")]
    Decode(String),

    #[error(transparent)]
    Encode(#[from] CompressionError),

    #[error("Image transform task failed: {0}")]
    Worker(String),
}

/// The pipeline's local transform: horizontal flip, re-encoded as JPEG.
///
/// Failures are data defects and are never retried.
#[derive(Debug, Clone, Copy)]
pub struct FlipTransformer {
    quality: u8,
}

impl FlipTransformer {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }

    /// Decode, mirror and recompress `data`.
    pub fn flip_horizontal(&self, data: &[u8]) -> Result<Bytes, TransformError> {
        let img = image::load_from_memory(data).map_err(|e| TransformError::Decode(e.to_string()))?;
        let (width, height) = (img.width(), img.height());

        let flipped = ImageOrientation::flip_horizontal(img);
        let output = encode_jpeg(&flipped, self.quality)?;

        tracing::debug!(
            width,
            height,
            input_bytes = data.len(),
            output_bytes = output.len(),
            quality = self.quality,
            "Image flipped horizontally"
        );

        Ok(output)
    }

    /// [`flip_horizontal`](Self::flip_horizontal) on the blocking pool, so
    /// concurrent pipelines keep making progress.
    pub async fn flip_horizontal_blocking(&self, data: Bytes) -> Result<Bytes, TransformError> {
        let transformer = *self;
        tokio::task::spawn_blocking(move || transformer.flip_horizontal(&data))
            .await
            .map_err(|e| TransformError::Worker(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// 16x8 PNG, red on the left half and blue on the right half, half transparent.
    fn split_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(16, 8, |x, _| {
            if x < 8 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 128])
            }
        });
        let mut buffer = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_flip_mirrors_and_outputs_jpeg() {
        let input = split_png();
        let output = FlipTransformer::new(90).flip_horizontal(&input).unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        assert_ne!(&output[..], &input[..]);

        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(decoded.dimensions(), (16, 8));

        let left = decoded.get_pixel(1, 4);
        let right = decoded.get_pixel(14, 4);
        assert!(left[2] > left[0], "left side should now be blue: {left:?}");
        assert!(right[0] > right[2], "right side should now be red: {right:?}");
    }

    #[test]
    fn test_corrupt_input_is_decode_error() {
        let err = FlipTransformer::new(90)
            .flip_horizontal(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, TransformError::Decode(_)));
    }

    #[tokio::test]
    async fn test_blocking_variant() {
        let output = FlipTransformer::new(80)
            .flip_horizontal_blocking(Bytes::from(split_png()))
            .await
            .unwrap();
        assert_eq!(&output[..2], &[0xFF, 0xD8]);
    }
}
