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

//! Invocation of the downstream runner script, which programs the FPGA, boots Linux
//! over NBD and runs the SPEC CPU2006 case.
//!
//! The runner owns retries and timeouts. This side only builds the command line,
//! waits for the child and hands back its exit status.

use crate::config::ToolConfig;
use crate::error::BenchError;
use crate::manifest::Manifest;
use crate::staging::{ArtifactKind, StagedArtifact, staged_path};
use log::info;
use std::fmt;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::str::FromStr;

/// Retry count requested from the runner.
pub const RUNNER_RETRIES: u32 = 3;

/// SPEC CPU2006 input set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BenchmarkSize {
    #[default]
    Ref,
    Train,
    Test,
}

impl BenchmarkSize {
    pub fn as_str(self) -> &'static str {
        match self {
            BenchmarkSize::Ref => "ref",
            BenchmarkSize::Train => "train",
            BenchmarkSize::Test => "test",
        }
    }
}

impl fmt::Display for BenchmarkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BenchmarkSize {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ref" => Ok(BenchmarkSize::Ref),
            "train" => Ok(BenchmarkSize::Train),
            "test" => Ok(BenchmarkSize::Test),
            other => Err(BenchError::Argument(format!(
                "unknown benchmark size `{other}`, expected ref, train or test"
            ))),
        }
    }
}

/// Benchmark selection, forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkParams {
    pub size: BenchmarkSize,
    pub iterations: u32,
    pub binary: PathBuf,
    pub casename: String,
}

/// Behaviour toggles forwarded to the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerFlags {
    /// Leave the NBD export up after the run.
    pub keep_nbd_when_exit: bool,
    /// Program the FPGA and boot Linux again before running.
    pub reflash: bool,
}

impl Default for RunnerFlags {
    fn default() -> Self {
        RunnerFlags {
            keep_nbd_when_exit: true,
            reflash: true,
        }
    }
}

/// Everything the runner needs besides the benchmark itself.
#[derive(Debug, Clone, Copy)]
pub struct RunTarget<'a> {
    pub manifest: &'a Manifest,
    pub staging_dir: &'a Path,
    pub staged: &'a [StagedArtifact],
    pub server_ip: Ipv4Addr,
}

/// A fully built runner command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerInvocation {
    program: String,
    args: Vec<String>,
}

impl RunnerInvocation {
    pub fn new(
        config: &ToolConfig,
        target: &RunTarget<'_>,
        bench: &BenchmarkParams,
        flags: RunnerFlags,
    ) -> Self {
        let script = target.manifest.script_dir.join(&config.runner_script);
        let staged = |kind| {
            staged_path(target.staged, kind)
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        let mut args = vec![
            script.display().to_string(),
            "-t".to_string(),
            target.manifest.target.clone(),
            "-d".to_string(),
            target.staging_dir.display().to_string(),
            "--nbd".to_string(),
            "--uboot-spl-path".to_string(),
            staged(ArtifactKind::UbootSpl),
            "--uboot-itb-path".to_string(),
            staged(ArtifactKind::UbootItb),
            "--rootfs-path".to_string(),
            staged(ArtifactKind::RootFs),
            "--kernel-path".to_string(),
            staged(ArtifactKind::Kernel),
            "--dtb-path".to_string(),
            staged(ArtifactKind::DeviceTree),
            "--fpga-use-static-ip".to_string(),
            "--server-ip".to_string(),
            target.server_ip.to_string(),
            "--spec2k6".to_string(),
            "--spec2k6-size".to_string(),
            bench.size.to_string(),
            "--spec2k6-iter".to_string(),
            bench.iterations.to_string(),
            "--spec2k6-binary".to_string(),
            bench.binary.display().to_string(),
            "--spec2k6-casename".to_string(),
            bench.casename.clone(),
            "--retry".to_string(),
            RUNNER_RETRIES.to_string(),
        ];

        if flags.keep_nbd_when_exit {
            args.push("--keep-nbd-when-exit".to_string());
        }
        if !flags.reflash {
            args.push("--skip-linux-boot".to_string());
            args.push("--skip-program-fpga".to_string());
        }

        RunnerInvocation {
            program: config.interpreter.clone(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program, starting with the script path.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Spawn the runner and block until it exits. There is no timeout.
    ///
    /// # Returns: `Result<ExitStatus, BenchError>`
    /// * `Ok(ExitStatus)` - The runner ran, whatever its status
    /// * `Err(BenchError::Runner)` - The program could not be started
    pub fn run(&self) -> Result<ExitStatus, BenchError> {
        info!("Running: {}", self.command_line());
        Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| BenchError::Runner {
                program: self.program.clone(),
                e,
            })
    }
}

/// Process exit code mirroring the runner's status. A signal death maps to 1.
pub fn exit_code(status: ExitStatus) -> u8 {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}
