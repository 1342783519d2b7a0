// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Acquisition characteristics — the configuration a source reads at the
// moment it is triggered.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanwerkError};
use crate::types::{EncodingCatalogEntry, FileType, FileTypeClass, PixelType};

/// Where and how the captured image is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTransferOptions {
    pub name: PathBuf,
    pub file_type: FileType,
    /// Create missing parent directories before writing.
    pub auto_create_directory: bool,
}

impl FileTransferOptions {
    pub fn set_name(&mut self, name: impl Into<PathBuf>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn set_type(&mut self, file_type: FileType) -> &mut Self {
        self.file_type = file_type;
        self
    }

    pub fn enable_autocreate_directory(&mut self, enable: bool) -> &mut Self {
        self.auto_create_directory = enable;
        self
    }
}

impl Default for FileTransferOptions {
    fn default() -> Self {
        Self {
            name: PathBuf::new(),
            file_type: FileType::Bmp,
            auto_create_directory: false,
        }
    }
}

/// Page count and pixel encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralOptions {
    pub max_page_count: u32,
    pub pixel_type: PixelType,
}

impl GeneralOptions {
    pub fn set_max_page_count(&mut self, count: u32) -> &mut Self {
        self.max_page_count = count;
        self
    }

    pub fn set_pixel_type(&mut self, pixel_type: PixelType) -> &mut Self {
        self.pixel_type = pixel_type;
        self
    }
}

impl Default for GeneralOptions {
    fn default() -> Self {
        Self {
            max_page_count: 1,
            pixel_type: PixelType::DefaultColor,
        }
    }
}

/// Whether the source's own user interface is shown during capture.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InteractionOptions {
    pub show_native_ui: bool,
}

impl InteractionOptions {
    pub fn show(&mut self, show: bool) -> &mut Self {
        self.show_native_ui = show;
        self
    }
}

/// Everything a source needs to perform one capture-and-save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AcquisitionCharacteristics {
    pub file_transfer: FileTransferOptions,
    pub general: GeneralOptions,
    pub interaction: InteractionOptions,
}

impl AcquisitionCharacteristics {
    pub fn file_transfer_options(&mut self) -> &mut FileTransferOptions {
        &mut self.file_transfer
    }

    pub fn general_options(&mut self) -> &mut GeneralOptions {
        &mut self.general
    }

    pub fn interaction_options(&mut self) -> &mut InteractionOptions {
        &mut self.interaction
    }

    /// Derive the snapshot for one catalog entry: this template with the
    /// output name, encoding, and pixel type overridden.
    ///
    /// Pixel type is always written, so a bitonal setting from an earlier
    /// entry can never carry over.
    pub fn for_entry(&self, entry: &EncodingCatalogEntry, directory: &Path) -> Self {
        let mut snapshot = self.clone();
        snapshot
            .file_transfer
            .set_name(directory.join(entry.file_name()))
            .set_type(entry.file_type);
        snapshot.general.set_pixel_type(entry.required_pixel_type());
        snapshot
    }

    /// Check the snapshot against the catalog it was derived from.
    ///
    /// Page limits of the encoding are the source's concern and surface as a
    /// per-entry acquisition error, not here.
    pub fn validate(&self, catalog: &[EncodingCatalogEntry]) -> Result<()> {
        let file_type = self.file_transfer.file_type;
        let entry = catalog
            .iter()
            .find(|e| e.file_type == file_type)
            .ok_or_else(|| {
                ScanwerkError::Configuration(format!(
                    "{file_type} is not in the active encoding catalog"
                ))
            })?;

        if entry.classification == FileTypeClass::BitonalOnly
            && self.general.pixel_type != PixelType::Bitonal
        {
            return Err(ScanwerkError::Configuration(format!(
                "{file_type} is bitonal-only but pixel type is {:?}",
                self.general.pixel_type
            )));
        }

        if self.general.max_page_count == 0 {
            return Err(ScanwerkError::Configuration(
                "max page count must be positive".into(),
            ));
        }

        if self.file_transfer.name.as_os_str().is_empty() {
            return Err(ScanwerkError::Configuration("output file name is empty".into()));
        }

        Ok(())
    }
}
