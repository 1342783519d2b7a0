// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal source chooser.

use std::io::{self, IsTerminal};

use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use scanwerk_bridge::{FirstSourceChooser, SourceChooser};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::SourceInfo;
use tracing::debug;

/// Arrow-key picker. Esc or `q` dismisses it, which the session reports as a
/// canceled selection.
pub struct TerminalChooser {
    theme: ColorfulTheme,
}

impl TerminalChooser {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceChooser for TerminalChooser {
    fn choose(&self, sources: &[SourceInfo]) -> Result<Option<usize>> {
        let labels: Vec<String> = sources.iter().map(source_label).collect();
        Select::with_theme(&self.theme)
            .with_prompt("Select source")
            .items(&labels)
            .default(0)
            .interact_opt()
            .map_err(|e| ScanwerkError::Io(io::Error::other(e)))
    }
}

fn source_label(info: &SourceInfo) -> String {
    let feeder = if info.has_feeder { ", feeder" } else { "" };
    format!("{} ({}{feeder})", info.product_name, info.manufacturer)
}

/// Prompt when a person is at the terminal, otherwise take the first source.
pub fn chooser_for_terminal() -> Box<dyn SourceChooser> {
    if io::stdin().is_terminal() && io::stderr().is_terminal() {
        Box::new(TerminalChooser::new())
    } else {
        debug!("non-interactive run, using first source");
        Box::new(FirstSourceChooser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_mentions_feeder() {
        let info = SourceInfo {
            id: "a".into(),
            product_name: "Flatbed".into(),
            manufacturer: "Acme".into(),
            product_family: "X".into(),
            has_feeder: true,
        };
        assert_eq!(source_label(&info), "Flatbed (Acme, feeder)");
    }
}
