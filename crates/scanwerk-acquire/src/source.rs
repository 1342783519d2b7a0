// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source handle — one opened device source bound to a session.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use scanwerk_bridge::DeviceSource;
use scanwerk_core::characteristics::AcquisitionCharacteristics;
use scanwerk_core::error::Result;
use scanwerk_core::types::{AcquisitionOutcome, SessionId, SourceInfo};

/// Marker held by the open handle. The session keeps a `Weak` to it, so the
/// slot frees itself when the handle is dropped.
#[derive(Debug)]
pub(crate) struct OpenSlot {
    pub(crate) source_name: String,
}

/// An opened source.
///
/// Owns one `AcquisitionCharacteristics` for its lifetime. `acquire` reads
/// them at call time; nothing is cached between triggers.
pub struct SourceHandle {
    session_id: SessionId,
    device: Box<dyn DeviceSource>,
    characteristics: AcquisitionCharacteristics,
    acquire_count: u32,
    _slot: Arc<OpenSlot>,
}

impl SourceHandle {
    pub(crate) fn new(
        session_id: SessionId,
        device: Box<dyn DeviceSource>,
        slot: Arc<OpenSlot>,
    ) -> Self {
        Self {
            session_id,
            device,
            characteristics: AcquisitionCharacteristics::default(),
            acquire_count: 0,
            _slot: slot,
        }
    }

    pub fn info(&self) -> &SourceInfo {
        self.device.info()
    }

    pub fn acquisition_characteristics(&self) -> &AcquisitionCharacteristics {
        &self.characteristics
    }

    pub fn acquisition_characteristics_mut(&mut self) -> &mut AcquisitionCharacteristics {
        &mut self.characteristics
    }

    /// Number of triggers issued through this handle, successful or not.
    pub fn acquire_count(&self) -> u32 {
        self.acquire_count
    }

    /// One capture-and-save with the characteristics as they are now.
    #[instrument(skip(self), fields(
        session = %self.session_id,
        source = %self.device.info().product_name,
        file = %self.characteristics.file_transfer.name.display(),
    ))]
    pub fn acquire(&mut self) -> Result<AcquisitionOutcome> {
        self.acquire_count += 1;
        debug!(
            file_type = %self.characteristics.file_transfer.file_type,
            pixel_type = ?self.characteristics.general.pixel_type,
            max_pages = self.characteristics.general.max_page_count,
            "triggering acquisition"
        );
        let outcome = self.device.acquire(&self.characteristics)?;
        info!(pages = outcome.pages, bytes = outcome.bytes, "acquisition saved");
        Ok(outcome)
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        debug!(session = %self.session_id, source = %self.device.info().product_name, "source closed");
    }
}
