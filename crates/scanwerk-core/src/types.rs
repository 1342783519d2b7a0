// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwerk acquisition harness.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity the application presents to the device subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub product_name: String,
    pub manufacturer: String,
    pub product_family: String,
    pub version: String,
}

impl AppInfo {
    /// App info with the given product name and workspace defaults elsewhere.
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Self::default()
        }
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            product_name: "Scanwerk".into(),
            manufacturer: "Scanwerk".into(),
            product_family: "Acquisition Harness".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Lifecycle states of a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Constructed, `start` not yet called.
    Uninitialized,
    /// Device subsystem is up; sources may be selected.
    Started,
    /// `start` failed; every later operation fails fast.
    Failed,
}

/// Whether a run produces single-page or multi-page output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureMode {
    SinglePage,
    MultiPage,
}

impl CaptureMode {
    /// Both modes, in the order a combined run executes them.
    pub const ALL: [CaptureMode; 2] = [CaptureMode::SinglePage, CaptureMode::MultiPage];

    /// Maximum page count requested from the source for this mode.
    ///
    /// `multi_page_count` is the policy value for multi-page runs and is
    /// raised to 2 if configured lower.
    pub fn max_page_count(&self, multi_page_count: u32) -> u32 {
        match self {
            Self::SinglePage => 1,
            Self::MultiPage => multi_page_count.max(2),
        }
    }
}

impl std::fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SinglePage => f.write_str("single-page"),
            Self::MultiPage => f.write_str("multi-page"),
        }
    }
}

/// Pixel encoding requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelType {
    /// Whatever the source delivers by default (colour where supported).
    #[default]
    DefaultColor,
    /// One bit per pixel, black and white.
    Bitonal,
}

/// Whether an encoding can carry colour data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileTypeClass {
    ColorCapable,
    BitonalOnly,
}

/// Output file encodings known to Scanwerk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    Bmp,
    Jpeg,
    Png,
    Gif,
    Tga,
    WebP,
    /// Uncompressed TIFF.
    TiffNone,
    /// CCITT Group 3 TIFF.
    TiffGroup3,
    /// CCITT Group 4 TIFF.
    TiffGroup4,
    Pdf,
    PdfMulti,
    PdfBitonalMulti,
    GifMulti,
}

impl FileType {
    /// Every encoding that produces one page per file.
    pub const SINGLE_PAGE: [FileType; 10] = [
        FileType::Bmp,
        FileType::Jpeg,
        FileType::Png,
        FileType::Gif,
        FileType::Tga,
        FileType::WebP,
        FileType::TiffNone,
        FileType::TiffGroup3,
        FileType::TiffGroup4,
        FileType::Pdf,
    ];

    /// Every encoding that can hold several pages in one file.
    pub const MULTI_PAGE: [FileType; 3] = [
        FileType::PdfMulti,
        FileType::PdfBitonalMulti,
        FileType::GifMulti,
    ];

    /// Canonical catalog name (also the output file stem).
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Bmp => "BMP",
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::Tga => "TGA",
            Self::WebP => "WEBP",
            Self::TiffNone => "TIFF_NONE",
            Self::TiffGroup3 => "TIFF_G3",
            Self::TiffGroup4 => "TIFF_G4",
            Self::Pdf => "PDF",
            Self::PdfMulti => "PDF_MULTI",
            Self::PdfBitonalMulti => "PDF_BW_MULTI",
            Self::GifMulti => "GIF_MULTI",
        }
    }

    /// File extensions, canonical extension first.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Bmp => &["bmp"],
            Self::Jpeg => &["jpg", "jpeg"],
            Self::Png => &["png"],
            Self::Gif | Self::GifMulti => &["gif"],
            Self::Tga => &["tga"],
            Self::WebP => &["webp"],
            Self::TiffNone | Self::TiffGroup3 | Self::TiffGroup4 => &["tif", "tiff"],
            Self::Pdf | Self::PdfMulti | Self::PdfBitonalMulti => &["pdf"],
        }
    }

    pub fn classification(&self) -> FileTypeClass {
        match self {
            Self::TiffGroup3 | Self::TiffGroup4 | Self::PdfBitonalMulti => {
                FileTypeClass::BitonalOnly
            }
            _ => FileTypeClass::ColorCapable,
        }
    }

    pub fn is_multi_page(&self) -> bool {
        matches!(self, Self::PdfMulti | Self::PdfBitonalMulti | Self::GifMulti)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// One row of an encoding catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingCatalogEntry {
    pub name: String,
    /// Canonical extension first.
    pub extensions: Vec<String>,
    pub file_type: FileType,
    pub classification: FileTypeClass,
}

impl EncodingCatalogEntry {
    /// Canonical extension (the first one listed).
    pub fn primary_extension(&self) -> &str {
        self.extensions.first().map(String::as_str).unwrap_or_default()
    }

    /// File name (without directory) for this entry: `<name>.<ext>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.primary_extension())
    }

    /// Pixel type the source must be set to for this encoding.
    pub fn required_pixel_type(&self) -> PixelType {
        match self.classification {
            FileTypeClass::BitonalOnly => PixelType::Bitonal,
            FileTypeClass::ColorCapable => PixelType::DefaultColor,
        }
    }
}

impl From<FileType> for EncodingCatalogEntry {
    fn from(file_type: FileType) -> Self {
        Self {
            name: file_type.canonical_name().to_owned(),
            extensions: file_type
                .extensions()
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect(),
            file_type,
            classification: file_type.classification(),
        }
    }
}

/// Build the catalog rows for a list of encodings, preserving order.
pub fn catalog_from_file_types(file_types: &[FileType]) -> Vec<EncodingCatalogEntry> {
    file_types.iter().copied().map(EncodingCatalogEntry::from).collect()
}

/// A selectable acquisition source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub id: String,
    pub product_name: String,
    pub manufacturer: String,
    pub product_family: String,
    /// Whether pages come from an automatic document feeder.
    pub has_feeder: bool,
}

/// Outcome of asking the user to pick a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    Selected(SourceInfo),
    Canceled,
}

impl SourceSelection {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// What a completed capture-and-save produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionOutcome {
    pub file: PathBuf,
    pub pages: u32,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the written file.
    pub sha256: String,
    pub captured_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogs_are_partitioned_by_page_support() {
        assert!(FileType::SINGLE_PAGE.iter().all(|ft| !ft.is_multi_page()));
        assert!(FileType::MULTI_PAGE.iter().all(|ft| ft.is_multi_page()));
    }

    #[test]
    fn tiff_entries_use_tif_as_primary_extension() {
        let entry = EncodingCatalogEntry::from(FileType::TiffGroup4);
        assert_eq!(entry.name, "TIFF_G4");
        assert_eq!(entry.primary_extension(), "tif");
        assert_eq!(entry.file_name(), "TIFF_G4.tif");
        assert_eq!(entry.required_pixel_type(), PixelType::Bitonal);
    }

    #[test]
    fn color_entries_require_default_color() {
        let entry = EncodingCatalogEntry::from(FileType::Jpeg);
        assert_eq!(entry.file_name(), "JPEG.jpg");
        assert_eq!(entry.required_pixel_type(), PixelType::DefaultColor);
    }

    #[test]
    fn multi_page_count_is_never_below_two() {
        assert_eq!(CaptureMode::SinglePage.max_page_count(5), 1);
        assert_eq!(CaptureMode::MultiPage.max_page_count(2), 2);
        assert_eq!(CaptureMode::MultiPage.max_page_count(0), 2);
        assert_eq!(CaptureMode::MultiPage.max_page_count(4), 4);
    }

    #[test]
    fn empty_extension_list_yields_empty_primary() {
        let entry = EncodingCatalogEntry {
            name: "RAW".into(),
            extensions: Vec::new(),
            file_type: FileType::Bmp,
            classification: FileTypeClass::ColorCapable,
        };
        assert_eq!(entry.primary_extension(), "");
    }
}
