//! Image enhancement ahead of recognition.

use image::{DynamicImage, GrayImage, Luma};
use log::debug;

/// Returns an enhanced image with the same dimensions as its input.
pub trait ImagePreprocessor {
    fn preprocess(&self, image: DynamicImage) -> DynamicImage;
}

/// Leaves the image as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl ImagePreprocessor for Passthrough {
    fn preprocess(&self, image: DynamicImage) -> DynamicImage {
        image
    }
}

/// Grayscale, stretch contrast to the full range, then threshold at the
/// Otsu level into black text on white.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binarize;

impl ImagePreprocessor for Binarize {
    fn preprocess(&self, image: DynamicImage) -> DynamicImage {
        let mut gray = image.into_luma8();
        stretch_contrast(&mut gray);
        let level = otsu_level(&gray);
        debug!(
            "Binarizing {}x{} image at level {}",
            gray.width(),
            gray.height(),
            level
        );
        for pixel in gray.pixels_mut() {
            *pixel = if pixel[0] > level { Luma([255]) } else { Luma([0]) };
        }
        DynamicImage::ImageLuma8(gray)
    }
}

fn stretch_contrast(gray: &mut GrayImage) {
    let (min, max) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
    if max <= min {
        return;
    }
    let span = (max - min) as u32;
    for pixel in gray.pixels_mut() {
        pixel[0] = ((pixel[0] - min) as u32 * 255 / span) as u8;
    }
}

/// Threshold that maximizes between-class variance of the histogram.
fn otsu_level(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel[0] as usize] += 1;
    }
    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 127;
    }
    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut background = 0u64;
    let mut background_sum = 0f64;
    let mut best_level = 0u8;
    let mut best_variance = 0f64;

    for (value, &count) in histogram.iter().enumerate() {
        background += count;
        if background == 0 {
            continue;
        }
        let foreground = total - background;
        if foreground == 0 {
            break;
        }
        background_sum += value as f64 * count as f64;
        let background_mean = background_sum / background as f64;
        let foreground_mean = (weighted_total - background_sum) / foreground as f64;
        let diff = background_mean - foreground_mean;
        let variance = background as f64 * foreground as f64 * diff * diff;
        if variance > best_variance {
            best_variance = variance;
            best_level = value as u8;
        }
    }
    best_level
}
