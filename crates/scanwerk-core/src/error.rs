// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single capture-and-save failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcquisitionErrorKind {
    /// Source is busy with another job.
    DeviceBusy,
    /// Lost contact with the source mid-transfer.
    Communication,
    /// Output file or its directory could not be written.
    OutputUnwritable,
    /// More pages were requested than the encoding or source allows.
    PageLimitExceeded,
    /// User aborted through the source's own interface.
    UserAborted,
    /// File writer rejected the captured image data.
    EncodingFailed,
}

impl std::fmt::Display for AcquisitionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DeviceBusy => "device busy",
            Self::Communication => "communication failure",
            Self::OutputUnwritable => "output unwritable",
            Self::PageLimitExceeded => "page limit exceeded",
            Self::UserAborted => "user aborted",
            Self::EncodingFailed => "encoding failed",
        };
        f.write_str(s)
    }
}

/// Stable diagnostic code for the last error a session saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCode {
    #[default]
    None,
    DriverMissing,
    PermissionDenied,
    SessionNotStarted,
    SessionAlreadyStarted,
    SourceUnavailable,
    SourceAlreadyOpen,
    InvalidConfiguration,
    Acquisition(AcquisitionErrorKind),
    DeviceFailure,
    Io,
    Internal,
}

/// Top-level error type for all Scanwerk operations.
#[derive(Debug, Error)]
pub enum ScanwerkError {
    // -- Session lifecycle --
    #[error("device subsystem could not start: {0}")]
    SessionStart(String),

    #[error("device driver not found: {0}")]
    DriverMissing(String),

    #[error("permission denied by device subsystem: {0}")]
    PermissionDenied(String),

    #[error("session is not started")]
    SessionNotStarted,

    #[error("session is already started")]
    SessionAlreadyStarted,

    // -- Sources --
    #[error("source could not be opened: {0}")]
    SourceOpen(String),

    #[error("another source is already open: {0}")]
    SourceAlreadyOpen(String),

    // -- Configuration --
    #[error("invalid acquisition configuration: {0}")]
    Configuration(String),

    // -- Acquisition --
    #[error("acquisition failed ({kind}): {detail}")]
    Acquisition {
        kind: AcquisitionErrorKind,
        detail: String,
    },

    #[error("device failure: {0}")]
    FatalDevice(String),

    // -- Output --
    #[error("image encoding failed: {0}")]
    ImageError(String),

    #[error("PDF generation failed: {0}")]
    PdfError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl ScanwerkError {
    /// Shorthand for a per-item acquisition failure.
    pub fn acquisition(kind: AcquisitionErrorKind, detail: impl Into<String>) -> Self {
        Self::Acquisition {
            kind,
            detail: detail.into(),
        }
    }

    /// Diagnostic code recorded as a session's last error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SessionStart(_) | Self::PlatformUnavailable => ErrorCode::DriverMissing,
            Self::DriverMissing(_) => ErrorCode::DriverMissing,
            Self::PermissionDenied(_) => ErrorCode::PermissionDenied,
            Self::SessionNotStarted => ErrorCode::SessionNotStarted,
            Self::SessionAlreadyStarted => ErrorCode::SessionAlreadyStarted,
            Self::SourceOpen(_) => ErrorCode::SourceUnavailable,
            Self::SourceAlreadyOpen(_) => ErrorCode::SourceAlreadyOpen,
            Self::Configuration(_) => ErrorCode::InvalidConfiguration,
            Self::Acquisition { kind, .. } => ErrorCode::Acquisition(*kind),
            Self::FatalDevice(_) => ErrorCode::DeviceFailure,
            Self::ImageError(_) | Self::PdfError(_) => {
                ErrorCode::Acquisition(AcquisitionErrorKind::EncodingFailed)
            }
            Self::Io(_) => ErrorCode::Io,
            Self::Serialization(_) => ErrorCode::Internal,
        }
    }

    /// Acquisition kind for errors raised during capture-and-save.
    pub fn acquisition_kind(&self) -> Option<AcquisitionErrorKind> {
        match self {
            Self::Acquisition { kind, .. } => Some(*kind),
            Self::ImageError(_) | Self::PdfError(_) => Some(AcquisitionErrorKind::EncodingFailed),
            Self::Io(_) => Some(AcquisitionErrorKind::OutputUnwritable),
            _ => None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanwerkError>;
