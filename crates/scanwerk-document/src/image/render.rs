// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test-pattern page renderer — produces synthetic "scanned" pages for the
// virtual source. Each page carries colour bars, a grey ramp, a black frame,
// and a row of tick marks encoding its page number so multi-page output can
// be told apart.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use tracing::{debug, instrument};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

const BARS: [Rgb<u8>; 7] = [
    Rgb([192, 192, 192]),
    Rgb([192, 192, 0]),
    Rgb([0, 192, 192]),
    Rgb([0, 192, 0]),
    Rgb([192, 0, 192]),
    Rgb([192, 0, 0]),
    Rgb([0, 0, 192]),
];

/// Renders test-pattern pages at a fixed pixel size.
#[derive(Debug, Clone, Copy)]
pub struct PageRenderer {
    width: u32,
    height: u32,
}

impl PageRenderer {
    /// Smallest page the pattern can be laid out on.
    pub const MIN_DIMENSION: u32 = 64;

    /// Create a renderer. Dimensions below `MIN_DIMENSION` are raised to it.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(Self::MIN_DIMENSION),
            height: height.max(Self::MIN_DIMENSION),
        }
    }

    /// Letter page at 50 dpi, small enough for quick batch runs.
    pub fn letter_preview() -> Self {
        Self::new(425, 550)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Render page `page_number` (1-based).
    #[instrument(skip(self), fields(width = self.width, height = self.height))]
    pub fn render(&self, page_number: u32) -> DynamicImage {
        let (w, h) = (self.width, self.height);
        let mut page = RgbImage::from_pixel(w, h, WHITE);
        let margin = w.min(h) / 16;
        let inner_w = w - 2 * margin;

        // Colour bars across the top third.
        let bar_w = (inner_w / BARS.len() as u32).max(1);
        let bar_h = h / 3;
        for (i, colour) in BARS.iter().enumerate() {
            let x = margin + i as u32 * bar_w;
            draw_filled_rect_mut(
                &mut page,
                Rect::at(x as i32, margin as i32).of_size(bar_w, bar_h),
                *colour,
            );
        }

        // Horizontal grey ramp below the bars.
        let ramp_top = margin + bar_h + margin / 2;
        let ramp_h = h / 8;
        for dx in 0..inner_w {
            let level = (dx * 255 / inner_w.max(1)) as u8;
            for dy in 0..ramp_h {
                page.put_pixel(margin + dx, ramp_top + dy, Rgb([level, level, level]));
            }
        }

        // Page-number ticks: one solid block per page.
        let tick_top = ramp_top + ramp_h + margin / 2;
        let tick = (margin / 2).max(2);
        for n in 0..page_number.min(inner_w / (2 * tick)) {
            let x = margin + n * 2 * tick;
            draw_filled_rect_mut(
                &mut page,
                Rect::at(x as i32, tick_top as i32).of_size(tick, tick * 2),
                BLACK,
            );
        }

        // Frame.
        draw_hollow_rect_mut(
            &mut page,
            Rect::at((margin / 2) as i32, (margin / 2) as i32)
                .of_size(w - margin, h - margin),
            BLACK,
        );

        debug!(page_number, "Rendered test page");
        DynamicImage::ImageRgb8(page)
    }

    /// Render pages `1..=count`.
    pub fn render_pages(&self, count: u32) -> Vec<DynamicImage> {
        (1..=count).map(|n| self.render(n)).collect()
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::letter_preview()
    }
}
