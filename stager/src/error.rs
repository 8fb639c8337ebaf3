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

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("BenchError::IniParse: Failed to parse ini file {file:?}: {e}")]
    IniParse { file: PathBuf, e: ini::Error },
    #[error("BenchError::MissingSection: Ini file has no [{0}] section")]
    MissingSection(String),
    #[error("BenchError::MissingKey: Ini section [{section}] has no `{key}` key")]
    MissingKey { section: String, key: String },
    #[error("BenchError::MissingFile: The file {0:?} does not exist!")]
    MissingFile(PathBuf),
    #[error("BenchError::TomlDe: Failed to parse {file:?}: {e}")]
    TomlDe { file: PathBuf, e: toml::de::Error },
    #[error("BenchError::Argument: {0}")]
    Argument(String),
    #[error("BenchError::IORead: An IO error occurred when reading from {file:?}: {e}")]
    IORead { file: PathBuf, e: std::io::Error },
    #[error("BenchError::IOCreate: An IO error occurred when creating {file:?}: {e}")]
    IOCreate { file: PathBuf, e: std::io::Error },
    #[error("BenchError::IODelete: An IO error occurred when deleting {file:?}: {e}")]
    IODelete { file: PathBuf, e: std::io::Error },
    #[error("BenchError::IOReadDir: An IO error occurred when reading directory {dir:?}: {e}")]
    IOReadDir { dir: PathBuf, e: std::io::Error },
    #[error("BenchError::IOCopy: An IO error occurred when copying {from:?} to {to:?}: {e}")]
    IOCopy {
        from: PathBuf,
        to: PathBuf,
        e: std::io::Error,
    },
    #[error("BenchError::IOSymlink: An IO error occurred when linking {link:?} to {target:?}: {e}")]
    IOSymlink {
        target: PathBuf,
        link: PathBuf,
        e: std::io::Error,
    },
    #[error("BenchError::Hostname: Failed to read the local hostname: {0}")]
    Hostname(std::io::Error),
    #[error("BenchError::Network: Failed to resolve an IPv4 address for interface `{iface}`: {reason}")]
    Network { iface: String, reason: String },
    #[error("BenchError::Runner: Failed to launch {program:?}: {e}")]
    Runner { program: String, e: std::io::Error },
    #[error("BenchError::Internal: An Internal error occurred: {0}")]
    Internal(String),
}
