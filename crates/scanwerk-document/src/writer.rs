// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image file writer — turns captured pages into bytes on disk in the
// requested encoding.
//
// Raster formats go through the `image` crate encoders; PDFs through
// `PdfWriter`. CCITT compression is not available in the `image` TIFF
// encoder, so the Group 3 / Group 4 encodings are written as uncompressed
// TIFFs holding bitonal (0/255) grey data.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Frame, ImageFormat};
use scanwerk_core::error::{AcquisitionErrorKind, Result, ScanwerkError};
use scanwerk_core::types::{FileType, FileTypeClass, PixelType};
use tracing::{debug, info, instrument};

use crate::image::to_bitonal;
use crate::integrity::sha256_hex;
use crate::pdf::PdfWriter;

/// Result of writing one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub pages: u32,
    pub bytes: u64,
    pub sha256: String,
}

/// Encodes page images into any `FileType`.
pub struct ImageFileWriter {
    pdf: PdfWriter,
    jpeg_quality: u8,
}

impl ImageFileWriter {
    /// Create a writer for pages captured at `dpi`.
    pub fn new(dpi: f32) -> Self {
        Self {
            pdf: PdfWriter::new(dpi),
            jpeg_quality: 85,
        }
    }

    /// JPEG quality (1-100, clamped).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Encode `pages` as `file_type`, returning the file bytes.
    ///
    /// Bitonal pixel type reduces every page to black and white first.
    /// Bitonal-only encodings refuse colour pixel data, and single-page
    /// encodings refuse more than one page.
    #[instrument(skip(self, pages), fields(pages = pages.len()))]
    pub fn encode(
        &self,
        pages: &[DynamicImage],
        file_type: FileType,
        pixel_type: PixelType,
    ) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ScanwerkError::ImageError("no pages captured".into()));
        }
        if !file_type.is_multi_page() && pages.len() > 1 {
            return Err(ScanwerkError::acquisition(
                AcquisitionErrorKind::PageLimitExceeded,
                format!("{file_type} holds one page, {} captured", pages.len()),
            ));
        }
        if file_type.classification() == FileTypeClass::BitonalOnly
            && pixel_type != PixelType::Bitonal
        {
            return Err(ScanwerkError::ImageError(format!(
                "{file_type} requires bitonal pixel data, got {pixel_type:?}"
            )));
        }

        let prepared: Vec<DynamicImage> = match pixel_type {
            PixelType::Bitonal => pages.iter().map(to_bitonal).collect(),
            PixelType::DefaultColor => pages.to_vec(),
        };

        let bytes = match file_type {
            FileType::Bmp => encode_raster(&prepared[0], ImageFormat::Bmp)?,
            FileType::Png => encode_raster(&prepared[0], ImageFormat::Png)?,
            FileType::Tga => encode_raster(&prepared[0], ImageFormat::Tga)?,
            FileType::WebP => encode_raster(&prepared[0], ImageFormat::WebP)?,
            FileType::TiffNone | FileType::TiffGroup3 | FileType::TiffGroup4 => {
                encode_raster(&prepared[0], ImageFormat::Tiff)?
            }
            FileType::Jpeg => self.encode_jpeg(&prepared[0])?,
            FileType::Gif | FileType::GifMulti => encode_gif_frames(&prepared)?,
            FileType::Pdf | FileType::PdfMulti | FileType::PdfBitonalMulti => {
                self.pdf.create_from_pages(&prepared, file_type.canonical_name())?
            }
        };

        debug!(%file_type, bytes = bytes.len(), "Pages encoded");
        Ok(bytes)
    }

    /// Encode `pages` and write them to `path`. The parent directory must
    /// already exist.
    pub fn write(
        &self,
        pages: &[DynamicImage],
        file_type: FileType,
        pixel_type: PixelType,
        path: impl AsRef<Path>,
    ) -> Result<WrittenFile> {
        let path = path.as_ref();
        let bytes = self.encode(pages, file_type, pixel_type)?;
        std::fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Wrote {file_type}");

        Ok(WrittenFile {
            path: path.to_path_buf(),
            pages: pages.len() as u32,
            bytes: bytes.len() as u64,
            sha256: sha256_hex(&bytes),
        })
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.jpeg_quality);
        let encoded = match image {
            DynamicImage::ImageLuma8(gray) => gray.write_with_encoder(encoder),
            other => other.to_rgb8().write_with_encoder(encoder),
        };
        encoded.map_err(|err| ScanwerkError::ImageError(format!("JPEG encoding failed: {err}")))?;
        Ok(buffer)
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new(50.0)
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_raster(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        ScanwerkError::ImageError(format!("{format:?} encoding failed: {err}"))
    })?;
    Ok(buffer)
}

/// Encode pages as GIF frames (a single frame for one page).
fn encode_gif_frames(pages: &[DynamicImage]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buffer);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|err| ScanwerkError::ImageError(format!("GIF setup failed: {err}")))?;
        let frames = pages.iter().map(|page| Frame::new(page.to_rgba8()));
        encoder
            .encode_frames(frames)
            .map_err(|err| ScanwerkError::ImageError(format!("GIF encoding failed: {err}")))?;
    }
    Ok(buffer)
}
