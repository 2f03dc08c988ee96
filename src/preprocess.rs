use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use ndarray::Array4;

use crate::error::Result;

pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Format sniffed from the leading bytes, if recognised.
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

pub fn format_dimensions(width: u32, height: u32) -> String {
    format!("{} × {}", width, height)
}

/// Build the NHWC `(1, size, size, 3)` input: RGB, stretched to a square,
/// each channel scaled into [0, 1].
pub fn to_input_tensor(img: &DynamicImage, size: u32) -> Array4<f32> {
    let resized = img.resize_exact(size, size, FilterType::Triangle).to_rgb8();

    let side = size as usize;
    let mut input = Array4::zeros((1, side, side, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            input[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
        }
    }
    input
}

/// Decoded upload plus the tensor fed to the model.
pub struct Prepared {
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageFormat>,
    pub input: Array4<f32>,
}

pub fn prepare(bytes: &[u8], size: u32) -> Result<Prepared> {
    let img = decode(bytes)?;
    let (width, height) = img.dimensions();
    Ok(Prepared {
        width,
        height,
        format: sniff_format(bytes),
        input: to_input_tensor(&img, size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn prepare_reports_source_dimensions() {
        let prepared = prepare(&png(64, 32, [0, 0, 0]), 224).unwrap();
        assert_eq!((prepared.width, prepared.height), (64, 32));
        assert_eq!(prepared.format, Some(ImageFormat::Png));
        assert_eq!(prepared.input.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn tensor_is_scaled_to_unit_range() {
        let img = decode(&png(10, 10, [255, 0, 51])).unwrap();
        let input = to_input_tensor(&img, 8);

        assert!((input[[0, 3, 4, 0]] - 1.0).abs() < 1e-6);
        assert!(input[[0, 3, 4, 1]].abs() < 1e-6);
        assert!((input[[0, 3, 4, 2]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn non_square_input_is_stretched() {
        let img = decode(&png(300, 20, [128, 128, 128])).unwrap();
        let input = to_input_tensor(&img, 16);

        // No padding: corners carry image data.
        assert!(input[[0, 0, 0, 0]] > 0.4);
        assert!(input[[0, 15, 15, 2]] > 0.4);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode(b"definitely not an image").is_err());
        assert_eq!(sniff_format(b"nope"), None);
    }

    #[test]
    fn dimensions_use_times_sign() {
        assert_eq!(format_dimensions(640, 480), "640 × 480");
    }
}
