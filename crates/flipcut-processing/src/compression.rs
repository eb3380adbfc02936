use bytes::Bytes;
use image::DynamicImage;

#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("JPEG encoding failed: {0}")]
    Encode(String),
}

/// Encode `img` as JPEG at `quality` (1-100).
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Bytes, CompressionError> {
    if !(1..=100).contains(&quality) {
        return Err(CompressionError::InvalidQuality(quality));
    }

    let rgb_img = img.to_rgb8();
    compress_rgb(&rgb_img, quality)
}

/// Compress to JPEG using mozjpeg
#[cfg(feature = "mozjpeg")]
fn compress_rgb(rgb_img: &image::RgbImage, quality: u8) -> Result<Bytes, CompressionError> {
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let encode = || -> std::io::Result<Vec<u8>> {
        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(rgb_img.as_raw())?;
        comp.finish()
    };

    encode()
        .map(Bytes::from)
        .map_err(|e| CompressionError::Encode(e.to_string()))
}

/// Compress to JPEG using the image crate's encoder
#[cfg(not(feature = "mozjpeg"))]
fn compress_rgb(rgb_img: &image::RgbImage, quality: u8) -> Result<Bytes, CompressionError> {
    use image::codecs::jpeg::JpegEncoder;

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(rgb_img)
        .map_err(|e| CompressionError::Encode(e.to_string()))?;

    Ok(Bytes::from(buffer))
}
