// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

use crate::types::CaptureMode;

/// Batch run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Product name presented to the device subsystem.
    pub product_name: String,
    /// Output subdirectory for single-page runs.
    pub single_page_subdir: String,
    /// Output subdirectory for multi-page runs.
    pub multi_page_subdir: String,
    /// Pages requested per file in multi-page runs (at least 2).
    pub multi_page_count: u32,
    /// Show the source's own interface during capture.
    pub show_native_ui: bool,
    /// Let the source create the output directory.
    pub auto_create_directory: bool,
}

impl AppConfig {
    /// Output subdirectory segment for a capture mode.
    pub fn subdir_for(&self, mode: CaptureMode) -> &str {
        match mode {
            CaptureMode::SinglePage => &self.single_page_subdir,
            CaptureMode::MultiPage => &self.multi_page_subdir,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            product_name: "Scanwerk".into(),
            single_page_subdir: "Single".into(),
            multi_page_subdir: "Multi".into(),
            multi_page_count: 2,
            show_native_ui: false,
            auto_create_directory: true,
        }
    }
}
