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

//! Source manifest: the set of input files a benchmark run needs, read from an ini file.
//!
//! # Ini Layout
//!
//! ```ini
//! [script]
//! dir = /opt/fpga-scripts
//!
//! [fpga]
//! target = vcu118
//! core = rocket
//! bit = /srv/bitstreams/rocket.bit
//!
//! [fusdk]
//! uboot_itb = /srv/boot/u-boot.itb
//! uboot_spl = /srv/boot/u-boot-spl.bin
//! dtb = /srv/boot/board.dtb
//! kernel = /srv/boot/Image
//! root_fs = /srv/rootfs.img
//! ```
//!
//! Every path is made absolute and checked for existence while loading, so a
//! [`Manifest`] value is proof that staging may begin. A missing key is always fatal.
//! A missing section is fatal under [`SectionPolicy::Strict`] and only logged under
//! [`SectionPolicy::Lenient`], in which case the section's fields stay empty.
//!
//! Values are taken literally: backslashes and quotes are part of the path. Key names
//! match regardless of case, section names do not.

use crate::error::BenchError;
use crate::staging::{ArtifactKind, StagedArtifact};
use ini::{Ini, ParseOption, Properties};
use log::{error, trace, warn};
use std::path::{Path, PathBuf};

/// How to treat a section that is absent from the ini file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SectionPolicy {
    /// Refuse to continue.
    #[default]
    Strict,
    /// Log the problem and continue with empty values.
    Lenient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Directory holding the downstream runner script.
    pub script_dir: PathBuf,
    /// Hardware target id, `<core>_<target>`.
    pub target: String,
    pub bitstream: PathBuf,
    pub uboot_spl: PathBuf,
    pub uboot_itb: PathBuf,
    pub kernel: PathBuf,
    pub dtb: PathBuf,
    pub root_fs: PathBuf,
}

impl Manifest {
    /// Read and validate the manifest stored in the ini file at `path`.
    ///
    /// # Returns: `Result<Manifest, BenchError>`
    /// * `Ok(Manifest)` - All configured paths exist
    /// * `Err(BenchError::IniParse)` - The file is unreadable or not valid ini
    /// * `Err(BenchError::MissingSection)` - A section is absent and `policy` is strict
    /// * `Err(BenchError::MissingKey)` - A key is absent from a present section
    /// * `Err(BenchError::MissingFile)` - A configured path does not exist
    pub fn from_ini_file(path: &Path, policy: SectionPolicy) -> Result<Manifest, BenchError> {
        trace!("Loading manifest from {path:?} with {policy:?} section policy");
        let ini =
            Ini::load_from_file_opt(path, parse_option()).map_err(|e| BenchError::IniParse {
                file: path.to_path_buf(),
                e,
            })?;
        Manifest::from_ini(&ini, policy)
    }

    /// Validate an already parsed ini document. See [`Manifest::from_ini_file`].
    pub fn from_ini(ini: &Ini, policy: SectionPolicy) -> Result<Manifest, BenchError> {
        let mut manifest = Manifest::default();

        if let Some(script) = section(ini, "script", policy)? {
            manifest.script_dir = existing_path(required_key(script, "script", "dir")?)?;
        }

        if let Some(fpga) = section(ini, "fpga", policy)? {
            let target = required_key(fpga, "fpga", "target")?;
            let core = required_key(fpga, "fpga", "core")?;
            manifest.target = format!("{core}_{target}");
            manifest.bitstream = existing_path(required_key(fpga, "fpga", "bit")?)?;
        }

        if let Some(fusdk) = section(ini, "fusdk", policy)? {
            manifest.uboot_itb = existing_path(required_key(fusdk, "fusdk", "uboot_itb")?)?;
            manifest.uboot_spl = existing_path(required_key(fusdk, "fusdk", "uboot_spl")?)?;
            manifest.dtb = existing_path(required_key(fusdk, "fusdk", "dtb")?)?;
            manifest.kernel = existing_path(required_key(fusdk, "fusdk", "kernel")?)?;
            manifest.root_fs = existing_path(required_key(fusdk, "fusdk", "root_fs")?)?;
        }

        trace!("Manifest loaded: {manifest:?}");
        Ok(manifest)
    }

    /// Source path configured for `kind`. Empty when its section was skipped.
    pub fn source(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Bitstream => &self.bitstream,
            ArtifactKind::UbootSpl => &self.uboot_spl,
            ArtifactKind::UbootItb => &self.uboot_itb,
            ArtifactKind::Kernel => &self.kernel,
            ArtifactKind::DeviceTree => &self.dtb,
            ArtifactKind::RootFs => &self.root_fs,
        }
    }

    /// Lay the manifest out as staged artifacts under `staging_dir`, in staging order.
    ///
    /// Artifacts whose source is empty (lenient policy) are left out.
    pub fn plan(&self, staging_dir: &Path) -> Vec<StagedArtifact> {
        ArtifactKind::ALL
            .iter()
            .filter_map(|&kind| {
                let source = self.source(kind);
                let artifact = StagedArtifact::new(kind, source, staging_dir);
                if artifact.is_none() {
                    warn!("No {} configured, it will not be staged", kind.name());
                }
                artifact
            })
            .collect()
    }
}

/// Literal values, no escape or quote processing.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn section<'a>(
    ini: &'a Ini,
    name: &str,
    policy: SectionPolicy,
) -> Result<Option<&'a Properties>, BenchError> {
    match (ini.section(Some(name)), policy) {
        (Some(properties), _) => Ok(Some(properties)),
        (None, SectionPolicy::Strict) => Err(BenchError::MissingSection(name.to_string())),
        (None, SectionPolicy::Lenient) => {
            error!("Ini file parsing error: no [{name}] section, continuing without it");
            Ok(None)
        }
    }
}

fn required_key<'a>(
    properties: &'a Properties,
    section: &str,
    key: &str,
) -> Result<&'a str, BenchError> {
    properties
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
        .ok_or_else(|| BenchError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn existing_path(value: &str) -> Result<PathBuf, BenchError> {
    let path = Path::new(value);
    if value.is_empty() || !path.exists() {
        return Err(BenchError::MissingFile(path.to_path_buf()));
    }
    std::path::absolute(path).map_err(|e| BenchError::IORead {
        file: path.to_path_buf(),
        e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_reported_with_section() {
        let ini = Ini::load_from_str("[script]\n").expect("valid ini");
        let result = Manifest::from_ini(&ini, SectionPolicy::Lenient);
        assert!(
            matches!(
                result,
                Err(BenchError::MissingKey { ref section, ref key }) if section == "script" && key == "dir"
            ),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn test_empty_ini_is_rejected_when_strict() {
        let ini = Ini::load_from_str("").expect("valid ini");
        let result = Manifest::from_ini(&ini, SectionPolicy::Strict);
        assert!(matches!(result, Err(BenchError::MissingSection(ref s)) if s == "script"));
    }

    #[test]
    fn test_empty_ini_is_empty_manifest_when_lenient() {
        let ini = Ini::load_from_str("").expect("valid ini");
        let manifest = Manifest::from_ini(&ini, SectionPolicy::Lenient).expect("lenient load");
        assert_eq!(manifest, Manifest::default());
        assert!(manifest.plan(Path::new("/tmp/stage")).is_empty());
    }

    #[test]
    fn test_values_are_literal_and_keys_ignore_case() {
        let text = "[fpga]\nTarget = vcu118\nCORE = rocket\nbit = /srv/a\\tb.bit\n";
        let ini = Ini::load_from_str_opt(text, parse_option()).expect("valid ini");
        let fpga = ini.section(Some("fpga")).expect("fpga section");

        assert_eq!(required_key(fpga, "fpga", "target").ok(), Some("vcu118"));
        assert_eq!(required_key(fpga, "fpga", "core").ok(), Some("rocket"));
        assert_eq!(required_key(fpga, "fpga", "bit").ok(), Some("/srv/a\\tb.bit"));
    }

    #[test]
    fn test_empty_value_is_missing_file() {
        let ini = Ini::load_from_str("[script]\ndir =\n").expect("valid ini");
        let result = Manifest::from_ini(&ini, SectionPolicy::Strict);
        assert!(matches!(result, Err(BenchError::MissingFile(_))));
    }
}
