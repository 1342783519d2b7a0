// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the imaging device subsystem.
//
// The orchestrator only ever talks to these traits. A driver-backed bridge
// and the built-in virtual scanner both implement them.

use std::path::Path;

use scanwerk_core::characteristics::AcquisitionCharacteristics;
use scanwerk_core::error::{ErrorCode, Result};
use scanwerk_core::types::{
    AcquisitionOutcome, AppInfo, CaptureMode, EncodingCatalogEntry, SourceInfo, SourceSelection,
};

/// Process-level handle to the imaging device subsystem.
pub trait DeviceSubsystem {
    /// Human-readable backend name (e.g. "Virtual scanner").
    fn platform_name(&self) -> &str;

    /// Bring the subsystem up. Fails if no driver can be loaded.
    fn start(&mut self, app_info: &AppInfo) -> Result<()>;

    /// Sources currently known to the subsystem.
    fn available_sources(&self) -> Result<Vec<SourceInfo>>;

    /// Ask the user to pick a source. Blocks until they choose or dismiss
    /// the chooser; dismissal is `SourceSelection::Canceled`, not an error.
    fn select_source(&mut self) -> Result<SourceSelection>;

    /// Open a previously selected source.
    fn open_source(&mut self, info: &SourceInfo) -> Result<Box<dyn DeviceSource>>;

    /// Directory for transient artifacts produced during acquisition.
    fn set_temporary_directory(&mut self, path: &Path) -> Result<()>;

    /// Encodings the subsystem can write for `mode`, in the order it
    /// reports them.
    fn filetype_info(&self, mode: CaptureMode) -> Result<Vec<EncodingCatalogEntry>>;

    /// Code of the most recent failure inside the subsystem.
    fn last_error(&self) -> ErrorCode;
}

/// An opened acquisition source.
pub trait DeviceSource {
    fn info(&self) -> &SourceInfo;

    /// Perform one capture-and-save using exactly the characteristics given.
    fn acquire(&mut self, characteristics: &AcquisitionCharacteristics)
    -> Result<AcquisitionOutcome>;
}

/// Interactive source picker.
pub trait SourceChooser {
    /// Return the index of the chosen source, or `None` if the user
    /// dismissed the chooser.
    fn choose(&self, sources: &[SourceInfo]) -> Result<Option<usize>>;
}

/// Non-interactive chooser that always takes the first source.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstSourceChooser;

impl SourceChooser for FirstSourceChooser {
    fn choose(&self, sources: &[SourceInfo]) -> Result<Option<usize>> {
        Ok(if sources.is_empty() { None } else { Some(0) })
    }
}
