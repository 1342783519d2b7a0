// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk Acquire — session lifecycle, source handles, and the batch
// acquisition orchestrator. This crate sits between the device traits in
// `scanwerk-bridge` and the entry point in `scanwerk-app`.

pub mod classify;
pub mod orchestrator;
pub mod session;
pub mod source;

#[cfg(test)]
mod testing;

pub use classify::{ErrorClass, classify_error};
pub use orchestrator::{
    BatchObserver, BatchOrchestrator, BatchState, BatchSummary, CompletedItem, FailedItem,
    FatalError, FatalKind, NoopObserver,
};
pub use session::Session;
pub use source::SourceHandle;
