// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session — explicit handle to the device subsystem.
//
// Lifecycle is construct → start → use → drop. Everything except `start`
// and the diagnostic accessors requires the Started state; a session whose
// start failed stays Failed and rejects every later operation.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use tracing::{debug, error, info, instrument};

use scanwerk_bridge::DeviceSubsystem;
use scanwerk_core::error::{ErrorCode, Result, ScanwerkError};
use scanwerk_core::human_errors::describe_code;
use scanwerk_core::types::{
    AppInfo, CaptureMode, EncodingCatalogEntry, SessionId, SessionState, SourceInfo,
    SourceSelection,
};

use crate::source::{OpenSlot, SourceHandle};

pub struct Session {
    id: SessionId,
    subsystem: Box<dyn DeviceSubsystem>,
    state: SessionState,
    app_info: AppInfo,
    working_directory: Option<PathBuf>,
    last_error: ErrorCode,
    open_slot: Weak<OpenSlot>,
}

impl Session {
    pub fn new(subsystem: Box<dyn DeviceSubsystem>) -> Self {
        Self {
            id: SessionId::new(),
            subsystem,
            state: SessionState::Uninitialized,
            app_info: AppInfo::default(),
            working_directory: None,
            last_error: ErrorCode::None,
            open_slot: Weak::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn app_info(&self) -> &AppInfo {
        &self.app_info
    }

    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }

    pub fn platform_name(&self) -> &str {
        self.subsystem.platform_name()
    }

    /// Code of the most recent failure seen through this session.
    pub fn last_error(&self) -> ErrorCode {
        self.last_error
    }

    /// Plain-English text for an error code.
    pub fn describe(&self, code: ErrorCode) -> String {
        describe_code(code)
    }

    /// Uninitialized → Started, or Failed if the subsystem cannot come up.
    #[instrument(skip(self, app_info), fields(session = %self.id, product = %app_info.product_name))]
    pub fn start(&mut self, app_info: AppInfo) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return self.record(Err(ScanwerkError::SessionAlreadyStarted));
        }
        self.app_info = app_info;
        match self.subsystem.start(&self.app_info) {
            Ok(()) => {
                self.state = SessionState::Started;
                info!(platform = %self.subsystem.platform_name(), "session started");
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Failed;
                self.last_error = match self.subsystem.last_error() {
                    ErrorCode::None => err.code(),
                    code => code,
                };
                error!(error = %err, "session failed to start");
                Err(err)
            }
        }
    }

    /// Ask the user for a source. Dismissal is `Canceled`, not an error.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn select_source(&mut self) -> Result<SourceSelection> {
        self.ensure_started()?;
        let selection = self.subsystem.select_source();
        let selection = self.record(selection)?;
        match &selection {
            SourceSelection::Selected(info) => info!(source = %info.product_name, "source selected"),
            SourceSelection::Canceled => info!("source selection canceled"),
        }
        Ok(selection)
    }

    /// Open a selected source. At most one handle may be open at a time.
    #[instrument(skip(self, info), fields(session = %self.id, source = %info.product_name))]
    pub fn open_source(&mut self, info: &SourceInfo) -> Result<SourceHandle> {
        self.ensure_started()?;
        if let Some(open) = self.open_slot.upgrade() {
            return self.record(Err(ScanwerkError::SourceAlreadyOpen(
                open.source_name.clone(),
            )));
        }
        let device = self.subsystem.open_source(info);
        let device = self.record(device)?;

        let slot = Arc::new(OpenSlot {
            source_name: info.product_name.clone(),
        });
        self.open_slot = Arc::downgrade(&slot);
        Ok(SourceHandle::new(self.id, device, slot))
    }

    pub fn has_open_source(&self) -> bool {
        self.open_slot.strong_count() > 0
    }

    #[instrument(skip(self, path), fields(session = %self.id, path = %path.as_ref().display()))]
    pub fn set_working_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_started()?;
        let path = path.as_ref();
        let result = self.subsystem.set_temporary_directory(path);
        self.record(result)?;
        self.working_directory = Some(path.to_path_buf());
        debug!("working directory set");
        Ok(())
    }

    /// Encodings the subsystem supports for `mode`, in report order.
    pub fn encoding_catalog(&mut self, mode: CaptureMode) -> Result<Vec<EncodingCatalogEntry>> {
        self.ensure_started()?;
        let catalog = self.subsystem.filetype_info(mode);
        let catalog = self.record(catalog)?;
        debug!(session = %self.id, %mode, entries = catalog.len(), "encoding catalog read");
        Ok(catalog)
    }

    fn ensure_started(&mut self) -> Result<()> {
        let result = match self.state {
            SessionState::Started => Ok(()),
            SessionState::Uninitialized => Err(ScanwerkError::SessionNotStarted),
            SessionState::Failed => Err(ScanwerkError::SessionStart(format!(
                "session {} failed to start: {}",
                self.id,
                describe_code(self.last_error)
            ))),
        };
        if self.state == SessionState::Failed {
            // Keep the start failure as the reported reason.
            return result;
        }
        self.record(result)
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref err) = result {
            self.last_error = err.code();
        }
        result
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(session = %self.id, "session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSubsystem;
    use scanwerk_core::types::FileType;

    fn started() -> (Session, ScriptedSubsystem) {
        let scripted = ScriptedSubsystem::new(vec![FileType::Png]);
        let mut session = Session::new(Box::new(scripted.clone()));
        session.start(AppInfo::new("tests")).expect("start");
        (session, scripted)
    }

    #[test]
    fn new_session_is_uninitialized() {
        let session = Session::new(Box::new(ScriptedSubsystem::new(Vec::new())));
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert_eq!(session.last_error(), ErrorCode::None);
        assert!(session.working_directory().is_none());
    }

    #[test]
    fn operations_before_start_fail_fast() {
        let mut session = Session::new(Box::new(ScriptedSubsystem::new(Vec::new())));
        assert!(matches!(session.select_source(), Err(ScanwerkError::SessionNotStarted)));
        assert!(session.encoding_catalog(CaptureMode::SinglePage).is_err());
        assert_eq!(session.last_error(), ErrorCode::SessionNotStarted);
    }

    #[test]
    fn failed_start_is_sticky() {
        let scripted = ScriptedSubsystem::new(Vec::new()).failing_start();
        let mut session = Session::new(Box::new(scripted));

        assert!(session.start(AppInfo::new("tests")).is_err());
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.last_error(), ErrorCode::DriverMissing);

        assert!(matches!(session.select_source(), Err(ScanwerkError::SessionStart(_))));
        assert!(session.set_working_directory("/tmp").is_err());
        // Start reason survives later rejected calls.
        assert_eq!(session.last_error(), ErrorCode::DriverMissing);
        assert!(!session.describe(session.last_error()).is_empty());
    }

    #[test]
    fn second_start_is_rejected() {
        let (mut session, _) = started();
        assert!(matches!(
            session.start(AppInfo::new("again")),
            Err(ScanwerkError::SessionAlreadyStarted)
        ));
        assert_eq!(session.state(), SessionState::Started);
    }

    #[test]
    fn only_one_source_open_at_a_time() {
        let (mut session, _) = started();
        let SourceSelection::Selected(info) = session.select_source().expect("select") else {
            panic!("scripted subsystem selects by default");
        };

        let handle = session.open_source(&info).expect("open");
        assert!(session.has_open_source());
        assert!(matches!(
            session.open_source(&info),
            Err(ScanwerkError::SourceAlreadyOpen(_))
        ));
        assert_eq!(session.last_error(), ErrorCode::SourceAlreadyOpen);

        drop(handle);
        assert!(!session.has_open_source());
        assert!(session.open_source(&info).is_ok());
    }

    #[test]
    fn working_directory_is_forwarded() {
        let (mut session, scripted) = started();
        session.set_working_directory("/out/Single").expect("set");
        assert_eq!(session.working_directory(), Some(Path::new("/out/Single")));
        assert_eq!(
            scripted.temporary_directory(),
            Some(PathBuf::from("/out/Single"))
        );
    }

    #[test]
    fn catalog_is_reported_in_subsystem_order() {
        let scripted = ScriptedSubsystem::new(vec![FileType::TiffGroup4, FileType::Jpeg]);
        let mut session = Session::new(Box::new(scripted));
        session.start(AppInfo::default()).expect("start");

        let names: Vec<String> = session
            .encoding_catalog(CaptureMode::SinglePage)
            .expect("catalog")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["TIFF_G4", "JPEG"]);
    }
}
