// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bitonal conversion for black-and-white-only encodings (TIFF G3/G4 and the
// bitonal multi-page PDF).

use image::{DynamicImage, GrayImage};
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use tracing::{debug, instrument};

/// Reduce any image to a `Luma8` image holding only 0 and 255.
///
/// Pixels at or below the Otsu level turn black. A flat page has no level
/// to split on, so only pure black stays black.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn to_bitonal(image: &DynamicImage) -> DynamicImage {
    let gray = image.to_luma8();
    let level = split_level(&gray);
    debug!(level, "bitonal split level");
    DynamicImage::ImageLuma8(threshold(&gray, level, ThresholdType::Binary))
}

/// Whether every pixel of a grey image is pure black or pure white.
pub fn is_bitonal(gray: &GrayImage) -> bool {
    gray.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255)
}

fn split_level(gray: &GrayImage) -> u8 {
    let mut levels = gray.pixels().map(|p| p.0[0]);
    let Some(first) = levels.next() else {
        return 0;
    };
    if levels.all(|level| level == first) {
        0
    } else {
        otsu_level(gray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn two_level_image_splits_cleanly() {
        let mut img = GrayImage::from_pixel(20, 20, Luma([30u8]));
        for y in 5..15 {
            for x in 5..15 {
                img.put_pixel(x, y, Luma([220u8]));
            }
        }
        let out = to_bitonal(&DynamicImage::ImageLuma8(img)).to_luma8();
        assert!(is_bitonal(&out));
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(10, 10).0[0], 255);
    }

    #[test]
    fn colour_input_becomes_single_channel() {
        let mut img = RgbImage::from_pixel(8, 8, Rgb([10, 200, 30]));
        img.put_pixel(0, 0, Rgb([250, 250, 250]));
        let out = to_bitonal(&DynamicImage::ImageRgb8(img));
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
        assert!(is_bitonal(&out.to_luma8()));
    }

    #[test]
    fn flat_light_page_stays_white() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([200u8])));
        let out = to_bitonal(&img).to_luma8();
        assert!(out.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn flat_black_page_stays_black() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([0u8])));
        let out = to_bitonal(&img).to_luma8();
        assert!(out.pixels().all(|p| p.0[0] == 0));
    }
}
