// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch acquisition orchestrator.
//
// Selects a source, configures it, and triggers one capture per entry of the
// mode's encoding catalog. Before each trigger the handle's characteristics
// are replaced wholesale by a snapshot derived from one base template, so no
// setting carries over from a previous entry.
//
// State machine:
//   Idle → SourceSelecting → Canceled
//                          → SourceOpenFailed
//                          → Configuring → Iterating → Completed
//                                                    → Aborted
//
// The source handle lives for the whole `run` call and is released when it
// returns, after the terminal state has been reported.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use scanwerk_core::characteristics::AcquisitionCharacteristics;
use scanwerk_core::config::AppConfig;
use scanwerk_core::error::{AcquisitionErrorKind, ScanwerkError};
use scanwerk_core::human_errors::humanize_error;
use scanwerk_core::types::{CaptureMode, EncodingCatalogEntry, SourceInfo, SourceSelection};

use crate::classify::{ErrorClass, classify_error};
use crate::session::Session;
use crate::source::SourceHandle;

/// Where a batch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchState {
    Idle,
    SourceSelecting,
    Canceled,
    SourceOpenFailed,
    Configuring,
    Iterating,
    Completed,
    Aborted,
}

impl BatchState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Canceled | Self::SourceOpenFailed | Self::Completed | Self::Aborted
        )
    }
}

/// Category of an error that ended a batch early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatalKind {
    /// The session rejected the request (not started, or failed).
    Session,
    SourceOpen,
    Configuration,
    Device,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatalError {
    pub kind: FatalKind,
    pub detail: String,
    /// Plain-English summary for the operator.
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedItem {
    pub name: String,
    pub file: PathBuf,
    pub pages: u32,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    pub name: String,
    pub file: PathBuf,
    pub kind: AcquisitionErrorKind,
    pub detail: String,
    pub message: String,
    pub suggestion: String,
}

/// Structured result of one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub mode: CaptureMode,
    pub directory: PathBuf,
    pub source: Option<SourceInfo>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub completed: Vec<CompletedItem>,
    pub failures: Vec<FailedItem>,
    pub canceled: bool,
    pub fatal: Option<FatalError>,
    pub state: BatchState,
}

impl BatchSummary {
    fn new(mode: CaptureMode, directory: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            batch_id: Uuid::new_v4(),
            mode,
            directory,
            source: None,
            started_at: now,
            finished_at: now,
            completed: Vec::new(),
            failures: Vec::new(),
            canceled: false,
            fatal: None,
            state: BatchState::Idle,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    pub fn success_count(&self) -> usize {
        self.completed.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Progress callbacks. Every method defaults to doing nothing.
pub trait BatchObserver {
    fn state_changed(&mut self, _state: BatchState) {}
    fn item_completed(&mut self, _item: &CompletedItem) {}
    fn item_failed(&mut self, _item: &FailedItem) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Runs one batch per call against a started session.
#[derive(Debug, Clone, Default)]
pub struct BatchOrchestrator {
    config: AppConfig,
}

impl BatchOrchestrator {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Output directory for `mode` under `base`. Trailing separators on
    /// `base` are dropped.
    pub fn effective_directory(&self, base: &Path, mode: CaptureMode) -> PathBuf {
        let base: PathBuf = base.components().collect();
        base.join(self.config.subdir_for(mode))
    }

    /// Template applied to every entry before its own overrides.
    pub fn base_characteristics(&self, mode: CaptureMode) -> AcquisitionCharacteristics {
        let mut ac = AcquisitionCharacteristics::default();
        ac.file_transfer_options()
            .enable_autocreate_directory(self.config.auto_create_directory);
        ac.general_options()
            .set_max_page_count(mode.max_page_count(self.config.multi_page_count));
        ac.interaction_options().show(self.config.show_native_ui);
        ac
    }

    /// Run a full batch. Never returns an error: every outcome, including
    /// cancellation and fatal failures, lands in the summary.
    #[instrument(skip(self, session, observer), fields(session = %session.id(), %mode, base = %base.display()))]
    pub fn run(
        &self,
        session: &mut Session,
        mode: CaptureMode,
        base: &Path,
        observer: &mut dyn BatchObserver,
    ) -> BatchSummary {
        let directory = self.effective_directory(base, mode);
        let mut run = BatchRun {
            summary: BatchSummary::new(mode, directory),
            observer,
        };

        run.transition(BatchState::SourceSelecting);
        let info = match session.select_source() {
            Ok(SourceSelection::Selected(info)) => info,
            Ok(SourceSelection::Canceled) => {
                info!("user canceled source selection");
                run.summary.canceled = true;
                return run.finish(BatchState::Canceled);
            }
            Err(err) => return run.abort(FatalKind::Session, &err),
        };

        let mut handle = match session.open_source(&info) {
            Ok(handle) => handle,
            Err(err) => {
                error!(source = %info.product_name, error = %err, "could not open source");
                run.summary.source = Some(info);
                run.set_fatal(FatalKind::SourceOpen, &err);
                return run.finish(BatchState::SourceOpenFailed);
            }
        };
        run.summary.source = Some(info);

        run.transition(BatchState::Configuring);
        if let Err(err) = session.set_working_directory(&run.summary.directory) {
            return run.abort(FatalKind::Session, &err);
        }
        let catalog = match session.encoding_catalog(mode) {
            Ok(catalog) => catalog,
            Err(err) => return run.abort(FatalKind::Session, &err),
        };
        let template = self.base_characteristics(mode);
        debug!(entries = catalog.len(), ?template, "batch configured");

        run.transition(BatchState::Iterating);
        for entry in &catalog {
            if let Err(abort) = run.process_entry(&mut handle, &template, entry, &catalog) {
                debug!(triggers = handle.acquire_count(), "iteration stopped");
                return run.abort(abort.0, &abort.1);
            }
        }

        debug!(triggers = handle.acquire_count(), "iteration done");
        run.finish(BatchState::Completed)
    }
}

/// Error that ends the batch during iteration.
struct Abort(FatalKind, ScanwerkError);

struct BatchRun<'a> {
    summary: BatchSummary,
    observer: &'a mut dyn BatchObserver,
}

impl BatchRun<'_> {
    fn transition(&mut self, state: BatchState) {
        debug!(from = ?self.summary.state, to = ?state, "batch state");
        self.summary.state = state;
        self.observer.state_changed(state);
    }

    fn set_fatal(&mut self, kind: FatalKind, err: &ScanwerkError) {
        let human = humanize_error(err);
        self.summary.fatal = Some(FatalError {
            kind,
            detail: err.to_string(),
            message: human.message,
            suggestion: human.suggestion,
        });
    }

    fn abort(mut self, kind: FatalKind, err: &ScanwerkError) -> BatchSummary {
        error!(?kind, error = %err, "batch aborted");
        self.set_fatal(kind, err);
        self.finish(BatchState::Aborted)
    }

    fn finish(mut self, state: BatchState) -> BatchSummary {
        debug_assert!(state.is_terminal(), "{state:?} is not a terminal state");
        self.transition(state);
        self.summary.finished_at = Utc::now();
        info!(
            completed = self.summary.success_count(),
            failed = self.summary.failure_count(),
            canceled = self.summary.canceled,
            fatal = self.summary.is_fatal(),
            "batch finished"
        );
        self.summary
    }

    fn process_entry(
        &mut self,
        handle: &mut SourceHandle,
        template: &AcquisitionCharacteristics,
        entry: &EncodingCatalogEntry,
        catalog: &[EncodingCatalogEntry],
    ) -> Result<(), Abort> {
        let snapshot = template.for_entry(entry, &self.summary.directory);
        snapshot
            .validate(catalog)
            .map_err(|err| Abort(FatalKind::Configuration, err))?;

        let file = snapshot.file_transfer.name.clone();
        *handle.acquisition_characteristics_mut() = snapshot;

        match handle.acquire() {
            Ok(outcome) => {
                let item = CompletedItem {
                    name: entry.name.clone(),
                    file,
                    pages: outcome.pages,
                    sha256: outcome.sha256,
                };
                info!(name = %item.name, file = %item.file.display(), "entry saved");
                self.observer.item_completed(&item);
                self.summary.completed.push(item);
                Ok(())
            }
            Err(err) => match classify_error(&err) {
                ErrorClass::Recoverable(kind) => {
                    let human = humanize_error(&err);
                    let item = FailedItem {
                        name: entry.name.clone(),
                        file,
                        kind,
                        detail: err.to_string(),
                        message: human.message,
                        suggestion: human.suggestion,
                    };
                    warn!(
                        name = %item.name,
                        %kind,
                        severity = ?human.severity,
                        error = %err,
                        "entry failed, continuing"
                    );
                    self.observer.item_failed(&item);
                    self.summary.failures.push(item);
                    Ok(())
                }
                ErrorClass::Configuration => Err(Abort(FatalKind::Configuration, err)),
                ErrorClass::Fatal => Err(Abort(FatalKind::Device, err)),
            },
        }
    }
}
