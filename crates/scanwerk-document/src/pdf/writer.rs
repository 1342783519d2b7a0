// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — wraps captured page images into a PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use image::DynamicImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::{debug, info, instrument, warn};

/// Builds a PDF with one page per captured image, each page sized to its
/// image at the configured resolution.
pub struct PdfWriter {
    /// Resolution the page images were captured at.
    dpi: f32,
}

impl PdfWriter {
    pub fn new(dpi: f32) -> Self {
        Self {
            dpi: if dpi > 0.0 { dpi } else { 72.0 },
        }
    }

    /// Create a PDF holding `pages` in order. `title` goes into the
    /// document's /Info dictionary.
    #[instrument(skip(self, pages), fields(pages = pages.len(), dpi = self.dpi))]
    pub fn create_from_pages(&self, pages: &[DynamicImage], title: &str) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ScanwerkError::PdfError("no pages to write".into()));
        }

        info!(title, "Creating image PDF");

        let mut doc = PdfDocument::new(title);
        let mut pdf_pages = Vec::with_capacity(pages.len());

        for image in pages {
            let img_width = image.width() as usize;
            let img_height = image.height() as usize;

            // printpdf takes raw RGB8; bitonal pages are already 0/255 grey.
            let rgb_image = image.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width,
                height: img_height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let page_w = Mm(img_width as f32 / self.dpi * 25.4);
            let page_h = Mm(img_height as f32 / self.dpi * 25.4);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(self.dpi),
                    rotate: None,
                },
            }];
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pdf_pages);
        debug!(pages = doc.pages.len(), "Page layout complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings");
        }

        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new(50.0)
    }
}
