// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable descriptions for error codes and errors.
//
// Session diagnostics hand out `ErrorCode`s; this module turns them (and full
// errors) into plain English with a suggestion for the operator.

use crate::error::{AcquisitionErrorKind, ErrorCode, ScanwerkError};

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Busy device or flaky cable. Trying again may work.
    Transient,
    /// Operator must do something (load paper, fix permissions, pick a source).
    ActionRequired,
    /// Will not succeed without a code or installation change.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Short description of a diagnostic code. Never fails.
pub fn describe_code(code: ErrorCode) -> String {
    let text = match code {
        ErrorCode::None => "no error",
        ErrorCode::DriverMissing => "the imaging device subsystem is not installed or could not be loaded",
        ErrorCode::PermissionDenied => "the imaging device subsystem refused access",
        ErrorCode::SessionNotStarted => "the acquisition session has not been started",
        ErrorCode::SessionAlreadyStarted => "the acquisition session was already started",
        ErrorCode::SourceUnavailable => "the selected source could not be opened",
        ErrorCode::SourceAlreadyOpen => "another source is still open in this session",
        ErrorCode::InvalidConfiguration => "the acquisition settings are inconsistent",
        ErrorCode::Acquisition(kind) => return describe_acquisition_kind(kind).to_owned(),
        ErrorCode::DeviceFailure => "the device stopped responding and the session was lost",
        ErrorCode::Io => "a file could not be read or written",
        ErrorCode::Internal => "internal error",
    };
    text.to_owned()
}

fn describe_acquisition_kind(kind: AcquisitionErrorKind) -> &'static str {
    match kind {
        AcquisitionErrorKind::DeviceBusy => "the source is busy with another job",
        AcquisitionErrorKind::Communication => "communication with the source failed during transfer",
        AcquisitionErrorKind::OutputUnwritable => "the output file could not be written",
        AcquisitionErrorKind::PageLimitExceeded => "more pages were requested than the output can hold",
        AcquisitionErrorKind::UserAborted => "the capture was canceled from the source's interface",
        AcquisitionErrorKind::EncodingFailed => "the image could not be encoded in the requested format",
    }
}

/// Convert a `ScanwerkError` into a `HumanError`.
pub fn humanize_error(err: &ScanwerkError) -> HumanError {
    match err {
        ScanwerkError::SessionStart(_)
        | ScanwerkError::DriverMissing(_)
        | ScanwerkError::PlatformUnavailable => HumanError {
            message: "The scanner subsystem could not be started.".into(),
            suggestion: "Check that a scanner driver is installed for this platform.".into(),
            severity: Severity::Permanent,
        },

        ScanwerkError::PermissionDenied(_) => HumanError {
            message: "Access to the scanner subsystem was denied.".into(),
            suggestion: "Run as a user with access to imaging devices.".into(),
            severity: Severity::ActionRequired,
        },

        ScanwerkError::SessionNotStarted | ScanwerkError::SessionAlreadyStarted => HumanError {
            message: "The acquisition session is in the wrong state.".into(),
            suggestion: "Start the session exactly once before selecting a source.".into(),
            severity: Severity::Permanent,
        },

        ScanwerkError::SourceOpen(_) => HumanError {
            message: "The selected scanner could not be opened.".into(),
            suggestion: "Make sure the scanner is switched on and not in use by another program.".into(),
            severity: Severity::Transient,
        },

        ScanwerkError::SourceAlreadyOpen(_) => HumanError {
            message: "A scanner is already open.".into(),
            suggestion: "Close the current scanner before opening another one.".into(),
            severity: Severity::Permanent,
        },

        ScanwerkError::Configuration(_) => HumanError {
            message: "The scan settings don't fit together.".into(),
            suggestion: "This is a bug in the acquisition settings; please report it.".into(),
            severity: Severity::Permanent,
        },

        ScanwerkError::Acquisition { kind, .. } => humanize_acquisition(*kind),

        ScanwerkError::FatalDevice(_) => HumanError {
            message: "The scanner stopped responding.".into(),
            suggestion: "Reconnect the scanner and run the batch again.".into(),
            severity: Severity::ActionRequired,
        },

        ScanwerkError::ImageError(_) | ScanwerkError::PdfError(_) => {
            humanize_acquisition(AcquisitionErrorKind::EncodingFailed)
        }

        ScanwerkError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "No permission to write to the output folder.".into(),
                suggestion: "Choose a different output folder or fix its permissions.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::NotFound => HumanError {
                message: "The output folder doesn't exist.".into(),
                suggestion: "Create the folder first or enable directory auto-creation.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem writing a file.".into(),
                suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                severity: Severity::Transient,
            },
        },

        ScanwerkError::Serialization(_) => HumanError {
            message: "Internal data problem.".into(),
            suggestion: "Please report it.".into(),
            severity: Severity::Permanent,
        },
    }
}

fn humanize_acquisition(kind: AcquisitionErrorKind) -> HumanError {
    let (suggestion, severity) = match kind {
        AcquisitionErrorKind::DeviceBusy => (
            "Wait for the scanner to finish its current job, then try again.",
            Severity::Transient,
        ),
        AcquisitionErrorKind::Communication => (
            "Check the cable or network connection to the scanner.",
            Severity::Transient,
        ),
        AcquisitionErrorKind::OutputUnwritable => (
            "Choose an output folder you can write to.",
            Severity::ActionRequired,
        ),
        AcquisitionErrorKind::PageLimitExceeded => (
            "Request fewer pages or pick a multi-page format.",
            Severity::Permanent,
        ),
        AcquisitionErrorKind::UserAborted => (
            "Run the capture again and let it finish.",
            Severity::ActionRequired,
        ),
        AcquisitionErrorKind::EncodingFailed => (
            "Try a different output format.",
            Severity::Permanent,
        ),
    };
    let mut message = describe_acquisition_kind(kind).to_owned();
    if let Some(first) = message.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    message.push('.');
    HumanError {
        message,
        suggestion: suggestion.into(),
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_a_description() {
        let codes = [
            ErrorCode::None,
            ErrorCode::DriverMissing,
            ErrorCode::PermissionDenied,
            ErrorCode::SessionNotStarted,
            ErrorCode::SessionAlreadyStarted,
            ErrorCode::SourceUnavailable,
            ErrorCode::SourceAlreadyOpen,
            ErrorCode::InvalidConfiguration,
            ErrorCode::Acquisition(AcquisitionErrorKind::DeviceBusy),
            ErrorCode::DeviceFailure,
            ErrorCode::Io,
            ErrorCode::Internal,
        ];
        for code in codes {
            assert!(!describe_code(code).is_empty(), "{code:?} has no description");
        }
    }

    #[test]
    fn busy_device_is_transient() {
        let err = ScanwerkError::acquisition(AcquisitionErrorKind::DeviceBusy, "busy");
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert_eq!(human.message, "The source is busy with another job.");
    }

    #[test]
    fn missing_driver_is_permanent() {
        let human = humanize_error(&ScanwerkError::DriverMissing("twain_32".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn permission_denied_io_needs_action() {
        let err: ScanwerkError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
