// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — single- and multi-page PDFs from captured page images.

pub mod writer;

pub use writer::PdfWriter;
