// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output fingerprinting. Every written file is reported with its SHA-256 so
// repeated runs against the same source can be compared.

use std::fs::File;
use std::io;
use std::path::Path;

use scanwerk_core::error::Result;
use sha2::{Digest, Sha256};

/// Lowercase-hex SHA-256 of an encoded file body.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// SHA-256 of a file already on disk, streamed rather than read whole.
pub fn file_sha256(path: impl AsRef<Path>) -> Result<String> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
