// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub subsystem for hosts without any imaging driver.
//
// `start` fails with `PlatformUnavailable`; every other method reports the
// same, so a session built on it never leaves the Failed state.

use std::path::Path;

use scanwerk_core::error::{ErrorCode, Result, ScanwerkError};
use scanwerk_core::types::{
    AppInfo, CaptureMode, EncodingCatalogEntry, SourceInfo, SourceSelection,
};

use crate::traits::*;

/// Subsystem that has no driver behind it.
pub struct StubSubsystem;

impl DeviceSubsystem for StubSubsystem {
    fn platform_name(&self) -> &str {
        "No imaging driver (stub)"
    }

    fn start(&mut self, _app_info: &AppInfo) -> Result<()> {
        tracing::warn!("DeviceSubsystem::start called on stub subsystem");
        Err(ScanwerkError::PlatformUnavailable)
    }

    fn available_sources(&self) -> Result<Vec<SourceInfo>> {
        Err(ScanwerkError::PlatformUnavailable)
    }

    fn select_source(&mut self) -> Result<SourceSelection> {
        Err(ScanwerkError::PlatformUnavailable)
    }

    fn open_source(&mut self, _info: &SourceInfo) -> Result<Box<dyn DeviceSource>> {
        Err(ScanwerkError::PlatformUnavailable)
    }

    fn set_temporary_directory(&mut self, _path: &Path) -> Result<()> {
        Err(ScanwerkError::PlatformUnavailable)
    }

    fn filetype_info(&self, _mode: CaptureMode) -> Result<Vec<EncodingCatalogEntry>> {
        Err(ScanwerkError::PlatformUnavailable)
    }

    fn last_error(&self) -> ErrorCode {
        ErrorCode::DriverMissing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_never_starts() {
        let mut stub = StubSubsystem;
        assert!(matches!(
            stub.start(&AppInfo::default()),
            Err(ScanwerkError::PlatformUnavailable)
        ));
        assert_eq!(stub.last_error(), ErrorCode::DriverMissing);
        assert!(stub.filetype_info(CaptureMode::SinglePage).is_err());
    }
}
