// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — test-pattern page rendering and bitonal conversion.

pub mod bitonal;
pub mod render;

pub use bitonal::to_bitonal;
pub use render::PageRenderer;
