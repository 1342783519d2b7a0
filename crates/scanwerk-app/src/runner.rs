// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runner — starts the session and runs the selected batches, printing one
// line per processed encoding.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use scanwerk_acquire::{
    BatchObserver, BatchOrchestrator, BatchSummary, CompletedItem, FailedItem, Session,
};
use scanwerk_bridge::DeviceSubsystem;
use scanwerk_core::config::AppConfig;
use scanwerk_core::types::AppInfo;
use tracing::{debug, info, warn};

use crate::cli::TestSelection;

/// What a whole invocation produced.
#[derive(Debug)]
pub enum RunReport {
    /// The session never started; nothing ran.
    StartFailed(String),
    Finished(Vec<BatchSummary>),
}

impl RunReport {
    /// False when the session failed to start or any batch ended fatally.
    pub fn is_success(&self) -> bool {
        match self {
            Self::StartFailed(_) => false,
            Self::Finished(summaries) => !summaries.iter().any(BatchSummary::is_fatal),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

pub struct Runner {
    config: AppConfig,
}

impl Runner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        subsystem: Box<dyn DeviceSubsystem>,
        selection: TestSelection,
        output_directory: &Path,
        out: &mut dyn Write,
    ) -> RunReport {
        let mut session = Session::new(subsystem);
        if session.start(AppInfo::new(&self.config.product_name)).is_err() {
            let reason = session.describe(session.last_error());
            print_line(
                out,
                format_args!("Could not start the device session.\nReason: {reason}"),
            );
            return RunReport::StartFailed(reason);
        }
        info!(session = %session.id(), platform = %session.platform_name(), "running {selection:?}");

        let orchestrator = BatchOrchestrator::new(self.config.clone());
        let mut summaries = Vec::new();
        for &mode in selection.modes() {
            let mut reporter = LineReporter { out: &mut *out };
            let summary = orchestrator.run(&mut session, mode, output_directory, &mut reporter);

            if summary.canceled {
                print_line(out, format_args!("User canceled selecting the source"));
            }
            if let Some(fatal) = &summary.fatal {
                print_line(
                    out,
                    format_args!("Batch aborted: {}\nSuggestion: {}", fatal.message, fatal.suggestion),
                );
                debug!(kind = ?fatal.kind, detail = %fatal.detail, "batch aborted");
            }
            match summary.to_json() {
                Ok(json) => debug!(summary = %json, "batch summary"),
                Err(err) => warn!(error = %err, "could not serialise batch summary"),
            }
            summaries.push(summary);
        }
        RunReport::Finished(summaries)
    }
}

/// Prints `<NAME> <file>` for every processed entry, with the plain-English
/// reason appended for failures.
struct LineReporter<'a> {
    out: &'a mut dyn Write,
}

impl BatchObserver for LineReporter<'_> {
    fn item_completed(&mut self, item: &CompletedItem) {
        print_line(self.out, format_args!("{} {}", item.name, item.file.display()));
    }

    fn item_failed(&mut self, item: &FailedItem) {
        print_line(
            self.out,
            format_args!(
                "{} {} FAILED: {} {}",
                item.name,
                item.file.display(),
                item.message,
                item.suggestion
            ),
        );
    }
}

fn print_line(out: &mut dyn Write, line: std::fmt::Arguments<'_>) {
    if let Err(err) = writeln!(out, "{line}") {
        warn!(error = %err, "could not write to output");
    }
}
