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

//! Error Wrapping File System I/O Helpers
//!
//! This module provides thin wrappers around standard Rust file system operations,
//! with automatic conversion to `BenchError` types. All functions include trace logging
//! and keep the offending path(s) in the returned error.
//!
//! Includes: read, create, delete, copy, symlink and directory listing operations.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use fpgabench::system_io::{fs_copy, fs_create_dir};
//! # use std::path::Path;
//!
//! # fn example() -> Result<(), fpgabench::error::BenchError> {
//! fs_create_dir(Path::new("/tmp/symlink_dir_host"))?;
//! fs_copy(Path::new("/srv/rootfs.img"), Path::new("/tmp/symlink_dir_host/rootfs.img"))?;
//! # Ok(())
//! # }
//! ```

use crate::error::BenchError;
use log::trace;
use std::fs::{File, OpenOptions, create_dir_all, remove_dir, remove_file};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read the contents of a file to a String.
///
/// # Arguments
///
/// * `file_path` - Path to the file to read
///
/// # Returns: `Result<String, BenchError>`
/// * `Ok(String)` - The complete contents of the file
/// * `Err(BenchError::IORead)` - If the file cannot be read (doesn't exist, permissions, etc.)
pub fn fs_read(file_path: &Path) -> Result<String, BenchError> {
    trace!("Attempting to read from {file_path:?}");
    let mut buf: String = String::new();
    let result = OpenOptions::new()
        .read(true)
        .open(file_path)
        .and_then(|mut f| f.read_to_string(&mut buf));

    match result {
        Ok(_) => {
            trace!("Reading done");
            Ok(buf)
        }
        Err(e) => Err(BenchError::IORead {
            file: file_path.into(),
            e,
        }),
    }
}

/// Open a file for reading, following symlinks.
///
/// # Returns: `Result<File, BenchError>`
/// * `Ok(File)` - Handle opened read-only
/// * `Err(BenchError::IORead)` - The file, or the target of a symlink, cannot be opened
pub fn fs_open(file_path: &Path) -> Result<File, BenchError> {
    trace!("Attempting to open {file_path:?}");
    File::open(file_path).map_err(|e| BenchError::IORead {
        file: file_path.into(),
        e,
    })
}

/// Recursively create directories up to the specified path.
///
/// This is a wrapper around `std::fs::create_dir_all`, so an already existing
/// directory is not an error.
///
/// # Returns: `Result<(), BenchError>`
/// * `Ok(())` - Directory created (or already existed)
/// * `Err(BenchError::IOCreate)` - If directory creation fails (permissions, a file is in the way, etc.)
pub fn fs_create_dir(path: &Path) -> Result<(), BenchError> {
    trace!("Attempting to Create '{path:?}'");
    let result = create_dir_all(path);
    match result {
        Ok(_) => {
            trace!("Directory created at {path:?}.");
            Ok(())
        }
        Err(e) => Err(BenchError::IOCreate {
            file: path.into(),
            e,
        }),
    }
}

/// Remove an empty directory.
///
/// # Returns: `Result<(), BenchError>`
/// * `Ok(())` - Directory removed successfully
/// * `Err(BenchError::IODelete)` - If removal fails (not empty, doesn't exist, permissions, etc.)
pub fn fs_remove_dir(path: &Path) -> Result<(), BenchError> {
    trace!("Attempting to delete '{path:?}'");
    let result = remove_dir(path);
    match result {
        Ok(_) => {
            trace!("Deleted {path:?}");
            Ok(())
        }
        Err(e) => Err(BenchError::IODelete {
            file: path.into(),
            e,
        }),
    }
}

/// Remove a file or a symlink. Symlinks are removed themselves, never their target,
/// which also makes this the way to get rid of a dangling link.
///
/// # Returns: `Result<(), BenchError>`
/// * `Ok(())` - Entry removed
/// * `Err(BenchError::IODelete)` - If removal fails
pub fn fs_remove_file(path: &Path) -> Result<(), BenchError> {
    trace!("Attempting to delete '{path:?}'");
    match remove_file(path) {
        Ok(_) => {
            trace!("Deleted {path:?}");
            Ok(())
        }
        Err(e) => Err(BenchError::IODelete {
            file: path.into(),
            e,
        }),
    }
}

/// Copy the contents of `from` to `to`, overwriting `to` if it is a regular file.
///
/// # Returns: `Result<u64, BenchError>`
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(BenchError::IOCopy)` - If either side cannot be accessed
pub fn fs_copy(from: &Path, to: &Path) -> Result<u64, BenchError> {
    trace!("Attempting to copy {from:?} to {to:?}");
    match std::fs::copy(from, to) {
        Ok(n) => {
            trace!("Copied {n} bytes.");
            Ok(n)
        }
        Err(e) => Err(BenchError::IOCopy {
            from: from.into(),
            to: to.into(),
            e,
        }),
    }
}

/// Create a symbolic link at `link` pointing to `target`.
///
/// The raw `std::io::Error` is kept inside `BenchError::IOSymlink` so callers can
/// tell an `AlreadyExists` collision apart from other failures.
///
/// # Returns: `Result<(), BenchError>`
/// * `Ok(())` - Link created
/// * `Err(BenchError::IOSymlink)` - If something already occupies `link`, or the
///   parent directory is not writable
pub fn fs_symlink(target: &Path, link: &Path) -> Result<(), BenchError> {
    trace!("Attempting to link {link:?} -> {target:?}");
    match std::os::unix::fs::symlink(target, link) {
        Ok(_) => {
            trace!("Link created.");
            Ok(())
        }
        Err(e) => Err(BenchError::IOSymlink {
            target: target.into(),
            link: link.into(),
            e,
        }),
    }
}

/// Read the contents of a directory and return the full path of every entry.
///
/// Entries that cannot be read are silently skipped.
///
/// # Returns: `Result<Vec<PathBuf>, BenchError>`
/// * `Ok(Vec<PathBuf>)` - Paths of the entries in the directory (files, links and subdirectories)
/// * `Err(BenchError::IOReadDir)` - If the directory cannot be read (doesn't exist, permissions, etc.)
pub fn fs_read_dir(dir: &Path) -> Result<Vec<PathBuf>, BenchError> {
    trace!("Attempting to read directory '{dir:?}'");
    std::fs::read_dir(dir).map_or_else(
        |e| {
            Err(BenchError::IOReadDir {
                dir: dir.to_owned(),
                e,
            })
        },
        |iter| {
            let ret = iter
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .collect();
            trace!("Dir reading done.");
            Ok(ret)
        },
    )
}
