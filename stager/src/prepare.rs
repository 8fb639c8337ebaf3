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

use crate::error::BenchError;
use crate::manifest::{Manifest, SectionPolicy};
use crate::staging::{ArtifactStager, StagedArtifact};
use log::info;
use std::path::{Path, PathBuf};

/// A staging directory that is ready for the runner.
#[derive(Debug)]
pub struct PreparedRun {
    pub manifest: Manifest,
    pub stager: ArtifactStager,
    pub staged: Vec<StagedArtifact>,
}

/// Load the manifest at `ini_path` and stage it into `staging_dir`.
///
/// The manifest is validated in full before the staging directory is touched, so a
/// missing input leaves the file system as it was.
pub fn prepare_run(
    ini_path: &Path,
    policy: SectionPolicy,
    staging_dir: impl Into<PathBuf>,
) -> Result<PreparedRun, BenchError> {
    let manifest = Manifest::from_ini_file(ini_path, policy)?;

    let stager = ArtifactStager::new(staging_dir);
    stager.ensure_directory();
    let staged = manifest.plan(stager.dir());
    for (kind, outcome) in stager.stage_all(&staged)? {
        info!("{kind}: {outcome:?}");
    }

    Ok(PreparedRun {
        manifest,
        stager,
        staged,
    })
}
