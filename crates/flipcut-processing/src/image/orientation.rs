use image::DynamicImage;

/// Image orientation operations
pub struct ImageOrientation;

impl ImageOrientation {
    /// Mirror the image around its vertical axis, keeping the pixel format.
    pub fn flip_horizontal(img: DynamicImage) -> DynamicImage {
        img.fliph()
    }
}
