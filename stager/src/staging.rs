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

//! Artifact staging manager.
//!
//! This module provides [`ArtifactStager`], which brings a working directory to a state
//! where every input of a benchmark run is present and current. Read-only inputs are
//! symlinked into the directory, the root filesystem image is copied because the
//! runner mutates it.
//!
//! # Staging Directory Layout
//!
//! ```text
//! symlink_dir_<machine>/
//! ├── design-vcu118.bit   -> <[fpga] bit>
//! ├── u-boot-spl.bin      -> <[fusdk] uboot_spl>
//! ├── u-boot.itb          -> <[fusdk] uboot_itb>
//! ├── Image               -> <[fusdk] kernel>
//! ├── board.dtb           -> <[fusdk] dtb>
//! └── rootfs.img             (copy of [fusdk] root_fs)
//! ```
//!
//! # Reconciliation
//!
//! The directory is reused across runs. An existing entry is kept when its content
//! digest matches the source, otherwise it is removed and staged again. Nothing is
//! locked; two concurrent runs against the same directory resolve as last writer wins.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fpgabench::staging::ArtifactStager;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), fpgabench::error::BenchError> {
//! let stager = ArtifactStager::new("/scratch/symlink_dir_host");
//! stager.ensure_directory();
//! stager.stage_symlink(
//!     Path::new("/srv/bitstreams/rocket.bit"),
//!     &stager.dir().join("design-vcu118.bit"),
//! )?;
//! stager.stage_copy(Path::new("/srv/rootfs.img"), &stager.dir().join("rootfs.img"))?;
//! # Ok(())
//! # }
//! ```

use crate::digest::{ContentDigest, Sha256Digest, same_content};
use crate::error::BenchError;
use crate::system_io::{
    fs_copy, fs_create_dir, fs_read_dir, fs_remove_dir, fs_remove_file, fs_symlink,
};
use log::{debug, error, info, trace};
use std::ffi::OsString;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name the bitstream is always staged under, whatever its source is called.
pub static BITSTREAM_STAGED_NAME: &str = "design-vcu118.bit";

/// Prefix of the per-machine staging directory name.
pub static STAGING_DIR_PREFIX: &str = "symlink_dir_";

/// Name of the staging directory for `machine`, so hosts sharing a filesystem do not
/// collide.
pub fn staging_dir_name(machine: &str) -> String {
    format!("{STAGING_DIR_PREFIX}{machine}")
}

/// How a staged artifact refers to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    Symlink,
    Copy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Bitstream,
    UbootSpl,
    UbootItb,
    Kernel,
    DeviceTree,
    RootFs,
}

impl ArtifactKind {
    /// All artifacts, in the order they are staged.
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::Bitstream,
        ArtifactKind::UbootSpl,
        ArtifactKind::UbootItb,
        ArtifactKind::Kernel,
        ArtifactKind::DeviceTree,
        ArtifactKind::RootFs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::Bitstream => "bitstream",
            ArtifactKind::UbootSpl => "uboot_spl",
            ArtifactKind::UbootItb => "uboot_itb",
            ArtifactKind::Kernel => "kernel",
            ArtifactKind::DeviceTree => "dtb",
            ArtifactKind::RootFs => "root_fs",
        }
    }

    /// The root filesystem is written to by the runner, so it gets its own copy.
    pub fn linkage(self) -> Linkage {
        match self {
            ArtifactKind::RootFs => Linkage::Copy,
            _ => Linkage::Symlink,
        }
    }

    /// File name inside the staging directory for a source at `source`.
    pub fn staged_file_name(self, source: &Path) -> Option<OsString> {
        match self {
            ArtifactKind::Bitstream => Some(OsString::from(BITSTREAM_STAGED_NAME)),
            _ => source.file_name().map(OsString::from),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    pub kind: ArtifactKind,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl StagedArtifact {
    /// Place `source` inside `staging_dir`. Returns `None` for an empty source path.
    pub fn new(kind: ArtifactKind, source: &Path, staging_dir: &Path) -> Option<StagedArtifact> {
        if source.as_os_str().is_empty() {
            return None;
        }
        let file_name = kind.staged_file_name(source)?;
        Some(StagedArtifact {
            kind,
            source: source.to_path_buf(),
            destination: staging_dir.join(file_name),
        })
    }

    pub fn linkage(&self) -> Linkage {
        self.kind.linkage()
    }
}

/// Destination of the staged `kind` in `artifacts`, if it was staged.
pub fn staged_path(artifacts: &[StagedArtifact], kind: ArtifactKind) -> Option<&Path> {
    artifacts
        .iter()
        .find(|a| a.kind == kind)
        .map(|a| a.destination.as_path())
}

/// What staging did to a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Nothing was there, the entry was created.
    Created,
    /// The entry already matched its source and was left alone.
    Unchanged,
    /// The entry was stale or unreadable and has been recreated.
    Replaced,
}

/// Keeps one staging directory in sync with its sources.
#[derive(Debug)]
pub struct ArtifactStager<D: ContentDigest = Sha256Digest> {
    dir: PathBuf,
    digest: D,
}

impl ArtifactStager<Sha256Digest> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ArtifactStager::with_digest(dir, Sha256Digest)
    }
}

impl<D: ContentDigest> ArtifactStager<D> {
    /// Create a stager comparing contents with `digest`. A relative `dir` is resolved
    /// against the current working directory.
    pub fn with_digest(dir: impl Into<PathBuf>, digest: D) -> Self {
        let dir = dir.into();
        let dir = std::path::absolute(&dir).unwrap_or(dir);
        trace!("creating new ArtifactStager for {dir:?}");
        ArtifactStager { dir, digest }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn digest(&self) -> &D {
        &self.digest
    }

    /// Create the staging directory if it does not exist yet.
    ///
    /// Failures are logged and not returned. The staging calls that follow report any
    /// real problem with the directory.
    pub fn ensure_directory(&self) {
        if self.dir.is_dir() {
            info!("Directory {:?} already exists, reusing it", self.dir);
            return;
        }
        match fs_create_dir(&self.dir) {
            Ok(()) => info!("Created staging directory {:?}", self.dir),
            Err(e) => error!("Failed to create staging directory: {e}"),
        }
    }

    /// Make `destination` a symlink resolving to content identical to `source`.
    ///
    /// # Returns: `Result<StageOutcome, BenchError>`
    /// * `Ok(StageOutcome::Created)` - The link did not exist and was created
    /// * `Ok(StageOutcome::Unchanged)` - Whatever was at `destination` already matched
    /// * `Ok(StageOutcome::Replaced)` - A stale or dangling entry was swapped for a new link
    /// * `Err(BenchError::IODelete)` - The stale entry could not be removed
    /// * `Err(BenchError::IOSymlink)` - The link could not be created even after cleanup
    pub fn stage_symlink(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<StageOutcome, BenchError> {
        match fs_symlink(source, destination) {
            Ok(()) => return Ok(StageOutcome::Created),
            Err(e) => debug!("{e}"),
        }

        if same_content(&self.digest, source, destination) {
            trace!("{destination:?} already matches {source:?}");
            return Ok(StageOutcome::Unchanged);
        }

        info!("{destination:?} is stale, relinking it to {source:?}");
        remove_entry(destination)?;
        fs_symlink(source, destination)?;
        Ok(StageOutcome::Replaced)
    }

    /// Make `destination` a regular file with the same bytes as `source`.
    ///
    /// A symlink found at `destination` is always replaced, even when it resolves to
    /// matching content, so the runner never writes through to a shared image.
    ///
    /// # Returns: `Result<StageOutcome, BenchError>`
    /// * `Ok(StageOutcome::Created)` - Nothing was at `destination`, the file was copied
    /// * `Ok(StageOutcome::Unchanged)` - The existing copy matched
    /// * `Ok(StageOutcome::Replaced)` - The existing entry differed and was recopied
    /// * `Err(BenchError::IODelete)` - The stale entry could not be removed
    /// * `Err(BenchError::IOCopy)` - Copying failed
    pub fn stage_copy(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<StageOutcome, BenchError> {
        let is_regular_file = match std::fs::symlink_metadata(destination) {
            Ok(meta) => meta.file_type().is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs_copy(source, destination)?;
                return Ok(StageOutcome::Created);
            }
            Err(e) => {
                debug!("Cannot inspect {destination:?}: {e}");
                false
            }
        };

        if is_regular_file && same_content(&self.digest, source, destination) {
            trace!("{destination:?} already matches {source:?}");
            return Ok(StageOutcome::Unchanged);
        }

        info!("{destination:?} is stale, copying {source:?} again");
        remove_entry(destination)?;
        fs_copy(source, destination)?;
        Ok(StageOutcome::Replaced)
    }

    /// Stage a single artifact with the linkage its kind calls for.
    pub fn stage(&self, artifact: &StagedArtifact) -> Result<StageOutcome, BenchError> {
        info!("Prepare {} ...", artifact.kind);
        let outcome = match artifact.linkage() {
            Linkage::Symlink => self.stage_symlink(&artifact.source, &artifact.destination)?,
            Linkage::Copy => self.stage_copy(&artifact.source, &artifact.destination)?,
        };
        debug!("{} staged at {:?}: {outcome:?}", artifact.kind, artifact.destination);
        Ok(outcome)
    }

    /// Stage every artifact in order, stopping at the first failure.
    pub fn stage_all(
        &self,
        artifacts: &[StagedArtifact],
    ) -> Result<Vec<(ArtifactKind, StageOutcome)>, BenchError> {
        artifacts
            .iter()
            .map(|artifact| self.stage(artifact).map(|outcome| (artifact.kind, outcome)))
            .collect()
    }

    /// Remove the staging directory and everything in it.
    ///
    /// Files go first, then subdirectories bottom-up, then the directory itself. Errors
    /// are logged at debug level and otherwise ignored.
    pub fn teardown_directory(&self) {
        info!("Removing staging directory {:?}", self.dir);
        if let Err(e) = remove_tree(&self.dir) {
            debug!("Teardown of {:?} stopped early: {e}", self.dir);
        }
    }
}

/// Remove whatever occupies `path`. Missing entries are fine.
fn remove_entry(path: &Path) -> Result<(), BenchError> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => remove_tree(path),
        Ok(_) => fs_remove_file(path),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BenchError::IODelete {
            file: path.to_path_buf(),
            e,
        }),
    }
}

fn remove_tree(dir: &Path) -> Result<(), BenchError> {
    let (subdirs, files): (Vec<PathBuf>, Vec<PathBuf>) =
        fs_read_dir(dir)?.into_iter().partition(|entry| {
            std::fs::symlink_metadata(entry)
                .map(|meta| meta.is_dir())
                .unwrap_or(false)
        });
    for file in &files {
        fs_remove_file(file)?;
    }
    for subdir in &subdirs {
        remove_tree(subdir)?;
    }
    fs_remove_dir(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitstream_gets_fixed_name() {
        let artifact = StagedArtifact::new(
            ArtifactKind::Bitstream,
            Path::new("/a/x.bit"),
            Path::new("/stage"),
        )
        .expect("artifact");
        assert_eq!(artifact.destination, PathBuf::from("/stage/design-vcu118.bit"));
        assert_eq!(artifact.linkage(), Linkage::Symlink);
    }

    #[test]
    fn test_other_artifacts_keep_their_file_name() {
        let artifact =
            StagedArtifact::new(ArtifactKind::RootFs, Path::new("/a/rootfs.img"), Path::new("/s"))
                .expect("artifact");
        assert_eq!(artifact.destination, PathBuf::from("/s/rootfs.img"));
        assert_eq!(artifact.linkage(), Linkage::Copy);
    }

    #[test]
    fn test_empty_source_is_not_staged() {
        assert!(StagedArtifact::new(ArtifactKind::Kernel, Path::new(""), Path::new("/s")).is_none());
    }

    #[test]
    fn test_only_root_fs_is_copied() {
        let copied: Vec<_> = ArtifactKind::ALL
            .iter()
            .filter(|kind| kind.linkage() == Linkage::Copy)
            .collect();
        assert_eq!(copied, vec![&ArtifactKind::RootFs]);
    }

    #[test]
    fn test_staging_dir_name() {
        assert_eq!(staging_dir_name("node7"), "symlink_dir_node7");
    }
}
