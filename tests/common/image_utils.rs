//! Image inspection utilities for testing.
//!
//! Helpers for checking rendered figures without comparing against golden
//! files.

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};
use std::path::Path;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    image::open(path)
}

/// Check if a file holds an image of the expected format
pub fn assert_image_format(bytes: &[u8], expected_format: ImageFormat) -> Result<(), String> {
    let actual_format =
        image::guess_format(bytes).map_err(|e| format!("Could not detect image format: {}", e))?;

    if actual_format != expected_format {
        return Err(format!(
            "Image format differs: actual = {:?}, expected = {:?}",
            actual_format, expected_format
        ));
    }

    Ok(())
}

/// Check if an image has the expected dimensions
pub fn assert_image_dimensions(
    image: &DynamicImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();

    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }

    Ok(())
}

/// Number of pixels exactly equal to `color`
pub fn count_pixels(image: &DynamicImage, color: [u8; 4]) -> usize {
    image.pixels().filter(|(_, _, p)| p.0 == color).count()
}

/// Number of distinct colors in a rectangle, `x1`/`y1` exclusive
pub fn distinct_colors(image: &DynamicImage, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
    let mut seen: Vec<[u8; 4]> = Vec::new();
    for y in y0..y1.min(image.height()) {
        for x in x0..x1.min(image.width()) {
            let p = image.get_pixel(x, y).0;
            if !seen.contains(&p) {
                seen.push(p);
            }
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_count_and_distinct() {
        let mut img = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_pixel(4, 4, Rgba([255; 4]));
        img.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let img = DynamicImage::ImageRgba8(img);

        assert_eq!(count_pixels(&img, [0, 0, 0, 255]), 1);
        assert_eq!(distinct_colors(&img, 0, 0, 4, 4), 2);
        assert_eq!(distinct_colors(&img, 2, 2, 4, 4), 1);
        assert!(assert_image_dimensions(&img, 4, 4).is_ok());
        assert!(assert_image_dimensions(&img, 4, 5).is_err());
    }
}
