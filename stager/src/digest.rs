// This file is part of fpgabench, an application to stage FPGA bitstreams, boot images and root filesystems for hardware-in-the-loop benchmark runs.
//
// Copyright 2025 Canonical Ltd.
//
// SPDX-License-Identifier: GPL-3.0-only
//
// fpgabench is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// fpgabench is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

//! Content digests used to decide whether a staged file is still current.

use crate::error::BenchError;
use crate::system_io::fs_open;
use log::{debug, trace};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Something that can fingerprint the contents of a file.
pub trait ContentDigest {
    /// Digest of the bytes of the file at `path`, following symlinks.
    ///
    /// # Returns: `Result<String, BenchError>`
    /// * `Ok(String)` - Hex encoded digest
    /// * `Err(BenchError::IORead)` - The file (or a link's target) cannot be read
    fn digest(&self, path: &Path) -> Result<String, BenchError>;
}

/// In-process SHA-256.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Digest;

impl ContentDigest for Sha256Digest {
    fn digest(&self, path: &Path) -> Result<String, BenchError> {
        let mut file = fs_open(path)?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; 1024 * 1024];
        loop {
            let n = file.read(&mut buf).map_err(|e| BenchError::IORead {
                file: path.to_path_buf(),
                e,
            })?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Whether `a` and `b` both resolve to readable files with identical contents.
///
/// Sizes are compared first so differing files are usually rejected without reading
/// them. Anything unreadable, including a dangling symlink, counts as a mismatch.
pub fn same_content<D: ContentDigest + ?Sized>(digest: &D, a: &Path, b: &Path) -> bool {
    let (len_a, len_b) = match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(meta_a), Ok(meta_b)) => (meta_a.len(), meta_b.len()),
        (Err(e), _) | (_, Err(e)) => {
            debug!("Cannot compare {a:?} with {b:?}: {e}");
            return false;
        }
    };
    if len_a != len_b {
        trace!("{a:?} is {len_a} bytes, {b:?} is {len_b} bytes");
        return false;
    }
    match (digest.digest(a), digest.digest(b)) {
        (Ok(digest_a), Ok(digest_b)) => {
            trace!("{a:?}: {digest_a}, {b:?}: {digest_b}");
            digest_a == digest_b
        }
        (Err(e), _) | (_, Err(e)) => {
            debug!("Cannot compare {a:?} with {b:?}: {e}");
            false
        }
    }
}
