// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-document — Output side of the acquisition pipeline.
//
// Provides test-pattern page rendering, bitonal conversion, PDF assembly, and
// the file writer that encodes captured pages into every supported encoding.

pub mod image;
pub mod integrity;
pub mod pdf;
pub mod writer;

// Re-export the primary structs so callers can use `scanwerk_document::ImageFileWriter` etc.
pub use self::image::render::PageRenderer;
pub use pdf::writer::PdfWriter;
pub use writer::{ImageFileWriter, WrittenFile};
