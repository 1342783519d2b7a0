// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error classification for batch acquisition.
//
// Classifies errors into Recoverable (record and move to the next entry),
// Configuration (logic error, abort the batch), and Fatal (the device or
// session is gone, abort the batch).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use scanwerk_core::error::{AcquisitionErrorKind, ScanwerkError};

/// How the orchestrator should treat an error raised during a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// One entry failed; later entries still run.
    Recoverable(AcquisitionErrorKind),
    /// The characteristics were inconsistent with the catalog.
    Configuration,
    /// The device or session can no longer be used.
    Fatal,
}

/// Classify a `ScanwerkError` for the continue-or-abort decision.
pub fn classify_error(err: &ScanwerkError) -> ErrorClass {
    let class = match err {
        // Per-item: device conditions and writer failures
        ScanwerkError::Acquisition { kind, .. } => ErrorClass::Recoverable(*kind),
        ScanwerkError::ImageError(_) | ScanwerkError::PdfError(_) => {
            ErrorClass::Recoverable(AcquisitionErrorKind::EncodingFailed)
        }
        ScanwerkError::Io(_) => ErrorClass::Recoverable(AcquisitionErrorKind::OutputUnwritable),

        ScanwerkError::Configuration(_) => ErrorClass::Configuration,

        // Fatal: nothing more can be captured through this session
        ScanwerkError::FatalDevice(_)
        | ScanwerkError::SessionStart(_)
        | ScanwerkError::DriverMissing(_)
        | ScanwerkError::PermissionDenied(_)
        | ScanwerkError::SessionNotStarted
        | ScanwerkError::SessionAlreadyStarted
        | ScanwerkError::SourceOpen(_)
        | ScanwerkError::SourceAlreadyOpen(_)
        | ScanwerkError::PlatformUnavailable
        | ScanwerkError::Serialization(_) => ErrorClass::Fatal,
    };

    match class {
        ErrorClass::Recoverable(kind) => debug!(%kind, "recoverable acquisition error"),
        other => warn!(class = ?other, "batch-ending error"),
    }
    class
}
