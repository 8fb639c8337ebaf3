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

//! fpgabench - artifact staging for hardware-in-the-loop SPEC CPU2006 runs on FPGA
//! soft cores.
//!
//! A run is prepared in four steps:
//! 1. Load and validate the [`manifest::Manifest`] from an ini file
//! 2. Stage its artifacts into a per-machine directory with [`staging::ArtifactStager`]
//!    (steps 1 and 2 together are [`prepare::prepare_run`])
//! 3. Discover the server address with [`host::interface_ipv4`]
//! 4. Hand over to the external runner through [`runner::RunnerInvocation`]
//!
//! FPGA programming, Linux boot and benchmark execution all happen in the runner.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (`trace`, `debug`, `info`, `warn`, `error`
//!   or `off`). The `fpgabench` binary defaults to `info`

pub mod config;
pub mod digest;
pub mod error;
pub mod host;
pub mod manifest;
pub mod prepare;
pub mod runner;
pub mod staging;
pub mod system_io;
