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

//! Tool-wide defaults loaded from `/etc/fpgabench/config.toml`.
//!
//! Every key is optional. When the file is missing or cannot be parsed the hardcoded
//! values below are used and a warning is logged, so a bare install still works.
//!
//! ```toml
//! [defaults]
//! net_interface = "ethtest"
//! interpreter = "python3"
//! runner_script = "pro_fpga_run_linux.py"
//! staging_root = "/scratch/fpga"
//! lenient_sections = false
//! ```

use crate::error::BenchError;
use crate::manifest::SectionPolicy;
use crate::system_io::fs_read;
use log::{trace, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// Hardcoded backups used when the config file or one of its keys is absent
pub static DEFAULT_CONFIG_PATH: &str = "/etc/fpgabench/config.toml";
pub static NET_INTERFACE: &str = "ethtest";
pub static INTERPRETER: &str = "python3";
pub static RUNNER_SCRIPT: &str = "pro_fpga_run_linux.py";
pub static STAGING_ROOT: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Interface whose IPv4 address is handed to the runner as `--server-ip`.
    pub net_interface: String,
    /// Program used to launch the runner script.
    pub interpreter: String,
    /// File name of the runner script inside the `[script] dir` directory.
    pub runner_script: String,
    /// Directory under which `symlink_dir_<machine>` is created.
    pub staging_root: PathBuf,
    pub section_policy: SectionPolicy,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            net_interface: NET_INTERFACE.to_string(),
            interpreter: INTERPRETER.to_string(),
            runner_script: RUNNER_SCRIPT.to_string(),
            staging_root: PathBuf::from(STAGING_ROOT),
            section_policy: SectionPolicy::Strict,
        }
    }
}

/// This is the top level struct which holds all sections
#[derive(Debug, Deserialize)]
struct TomlConfig {
    defaults: Option<DefaultsToml>,
}

/// This is the "defaults" struct
#[derive(Debug, Deserialize)]
struct DefaultsToml {
    net_interface: Option<String>,
    interpreter: Option<String>,
    runner_script: Option<String>,
    staging_root: Option<PathBuf>,
    lenient_sections: Option<bool>,
}

impl From<DefaultsToml> for ToolConfig {
    fn from(value: DefaultsToml) -> Self {
        trace!("User provided config: {value:?}");
        ToolConfig {
            net_interface: value.net_interface.unwrap_or_else(|| {
                trace!("No net_interface provided. Using hardcoded value.");
                NET_INTERFACE.to_string()
            }),
            interpreter: value.interpreter.unwrap_or_else(|| {
                trace!("No interpreter provided. Using hardcoded value.");
                INTERPRETER.to_string()
            }),
            runner_script: value.runner_script.unwrap_or_else(|| {
                trace!("No runner_script provided. Using hardcoded value.");
                RUNNER_SCRIPT.to_string()
            }),
            staging_root: value.staging_root.unwrap_or_else(|| {
                trace!("No staging_root provided. Using hardcoded value.");
                PathBuf::from(STAGING_ROOT)
            }),
            section_policy: match value.lenient_sections {
                Some(true) => SectionPolicy::Lenient,
                _ => SectionPolicy::Strict,
            },
        }
    }
}

/// Parse a config file's contents. A file without a `[defaults]` section yields the
/// hardcoded defaults.
pub fn parse_config(toml_string: &str, origin: &Path) -> Result<ToolConfig, BenchError> {
    let config: TomlConfig = match toml::from_str(toml_string) {
        Ok(config) => config,
        Err(e) => {
            return Err(BenchError::TomlDe {
                file: origin.to_path_buf(),
                e,
            });
        }
    };
    match config.defaults {
        Some(defaults_toml) => Ok(defaults_toml.into()),
        None => {
            trace!("{origin:?} did not contain a `[defaults]` section.");
            Ok(ToolConfig::default())
        }
    }
}

fn config_from_file(config_path: &Path) -> Result<ToolConfig, BenchError> {
    if !config_path.is_file() {
        return Err(BenchError::Internal(format!(
            "Config file not found in {config_path:?}."
        )));
    }
    let toml_string = fs_read(config_path)?;
    parse_config(&toml_string, config_path)
}

/// Load the tool configuration, falling back to hardcoded defaults on any failure.
pub fn load_tool_config(config_path: &Path) -> ToolConfig {
    match config_from_file(config_path) {
        Ok(config) => {
            trace!("Successfully loaded config: {config:?}");
            config
        }
        Err(e) => {
            warn!("Using hardcoded defaults because failed to load config: {e}");
            ToolConfig::default()
        }
    }
}
