// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted device subsystem for unit tests. Records every characteristics
// snapshot seen at trigger time and fails on request.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::Utc;

use scanwerk_bridge::{DeviceSource, DeviceSubsystem};
use scanwerk_core::characteristics::AcquisitionCharacteristics;
use scanwerk_core::error::{AcquisitionErrorKind, ErrorCode, Result, ScanwerkError};
use scanwerk_core::types::{
    AcquisitionOutcome, AppInfo, CaptureMode, EncodingCatalogEntry, FileType, SourceInfo,
    SourceSelection, catalog_from_file_types,
};

#[derive(Debug, Clone, Copy)]
pub(crate) enum ScriptedFailure {
    Item(AcquisitionErrorKind),
    DeviceLost,
}

#[derive(Default)]
struct Script {
    single_page: Vec<FileType>,
    multi_page: Vec<FileType>,
    fail_start: bool,
    cancel_selection: bool,
    fail_open: bool,
    failures: HashMap<FileType, ScriptedFailure>,
    snapshots: Vec<AcquisitionCharacteristics>,
    temporary_directory: Option<PathBuf>,
    last_error: ErrorCode,
}

/// Cloning shares the script, so a test keeps one clone for inspection and
/// hands the other to the session.
#[derive(Clone)]
pub(crate) struct ScriptedSubsystem {
    script: Rc<RefCell<Script>>,
}

impl ScriptedSubsystem {
    pub(crate) fn new(single_page: Vec<FileType>) -> Self {
        let script = Script {
            single_page,
            multi_page: FileType::MULTI_PAGE.to_vec(),
            ..Script::default()
        };
        Self {
            script: Rc::new(RefCell::new(script)),
        }
    }

    pub(crate) fn with_multi_page(self, multi_page: Vec<FileType>) -> Self {
        self.script.borrow_mut().multi_page = multi_page;
        self
    }

    pub(crate) fn failing_start(self) -> Self {
        self.script.borrow_mut().fail_start = true;
        self
    }

    pub(crate) fn canceling(self) -> Self {
        self.script.borrow_mut().cancel_selection = true;
        self
    }

    pub(crate) fn failing_open(self) -> Self {
        self.script.borrow_mut().fail_open = true;
        self
    }

    pub(crate) fn fail_on(self, file_type: FileType, failure: ScriptedFailure) -> Self {
        self.script.borrow_mut().failures.insert(file_type, failure);
        self
    }

    pub(crate) fn snapshots(&self) -> Vec<AcquisitionCharacteristics> {
        self.script.borrow().snapshots.clone()
    }

    pub(crate) fn acquire_calls(&self) -> usize {
        self.script.borrow().snapshots.len()
    }

    pub(crate) fn temporary_directory(&self) -> Option<PathBuf> {
        self.script.borrow().temporary_directory.clone()
    }

    fn source() -> SourceInfo {
        SourceInfo {
            id: "scripted".into(),
            product_name: "Scripted Scanner".into(),
            manufacturer: "Tests".into(),
            product_family: "Scripted".into(),
            has_feeder: true,
        }
    }
}

impl DeviceSubsystem for ScriptedSubsystem {
    fn platform_name(&self) -> &str {
        "Scripted"
    }

    fn start(&mut self, _app_info: &AppInfo) -> Result<()> {
        let mut script = self.script.borrow_mut();
        if script.fail_start {
            script.last_error = ErrorCode::DriverMissing;
            return Err(ScanwerkError::DriverMissing("scripted start failure".into()));
        }
        Ok(())
    }

    fn available_sources(&self) -> Result<Vec<SourceInfo>> {
        Ok(vec![Self::source()])
    }

    fn select_source(&mut self) -> Result<SourceSelection> {
        if self.script.borrow().cancel_selection {
            Ok(SourceSelection::Canceled)
        } else {
            Ok(SourceSelection::Selected(Self::source()))
        }
    }

    fn open_source(&mut self, info: &SourceInfo) -> Result<Box<dyn DeviceSource>> {
        if self.script.borrow().fail_open {
            return Err(ScanwerkError::SourceOpen(format!("{} went away", info.id)));
        }
        Ok(Box::new(ScriptedSource {
            info: info.clone(),
            script: Rc::clone(&self.script),
        }))
    }

    fn set_temporary_directory(&mut self, path: &Path) -> Result<()> {
        self.script.borrow_mut().temporary_directory = Some(path.to_path_buf());
        Ok(())
    }

    fn filetype_info(&self, mode: CaptureMode) -> Result<Vec<EncodingCatalogEntry>> {
        let script = self.script.borrow();
        Ok(match mode {
            CaptureMode::SinglePage => catalog_from_file_types(&script.single_page),
            CaptureMode::MultiPage => catalog_from_file_types(&script.multi_page),
        })
    }

    fn last_error(&self) -> ErrorCode {
        self.script.borrow().last_error
    }
}

struct ScriptedSource {
    info: SourceInfo,
    script: Rc<RefCell<Script>>,
}

impl DeviceSource for ScriptedSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn acquire(
        &mut self,
        characteristics: &AcquisitionCharacteristics,
    ) -> Result<AcquisitionOutcome> {
        let mut script = self.script.borrow_mut();
        script.snapshots.push(characteristics.clone());

        let file_type = characteristics.file_transfer.file_type;
        let pages = characteristics.general.max_page_count;
        if !file_type.is_multi_page() && pages > 1 {
            return Err(ScanwerkError::acquisition(
                AcquisitionErrorKind::PageLimitExceeded,
                format!("{file_type} holds one page, {pages} requested"),
            ));
        }
        match script.failures.get(&file_type) {
            Some(ScriptedFailure::Item(kind)) => {
                Err(ScanwerkError::acquisition(*kind, format!("scripted {file_type}")))
            }
            Some(ScriptedFailure::DeviceLost) => {
                Err(ScanwerkError::FatalDevice("scripted device loss".into()))
            }
            None => Ok(AcquisitionOutcome {
                file: characteristics.file_transfer.name.clone(),
                pages,
                bytes: 0,
                sha256: String::new(),
                captured_at: Utc::now(),
            }),
        }
    }
}
