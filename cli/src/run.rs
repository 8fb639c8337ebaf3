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

use crate::Cli;
use fpgabench::config::load_tool_config;
use fpgabench::error::BenchError;
use fpgabench::host::{interface_ipv4, machine_name};
use fpgabench::manifest::SectionPolicy;
use fpgabench::prepare::prepare_run;
use fpgabench::runner::{RunTarget, RunnerInvocation, exit_code};
use fpgabench::staging::staging_dir_name;
use log::{info, warn};

/// Stages everything the ini file lists, then runs the benchmark and returns the
/// runner's exit code
pub fn run_handler(cli: &Cli) -> Result<u8, BenchError> {
    let config = load_tool_config(&cli.config);
    let policy = if cli.lenient_ini {
        SectionPolicy::Lenient
    } else {
        config.section_policy
    };

    let staging_dir = config.staging_root.join(staging_dir_name(&machine_name()?));
    let prepared = prepare_run(&cli.ini, policy, staging_dir)?;

    let server_ip = interface_ipv4(&config.net_interface)?;
    let target = RunTarget {
        manifest: &prepared.manifest,
        staging_dir: prepared.stager.dir(),
        staged: &prepared.staged,
        server_ip,
    };
    let invocation = RunnerInvocation::new(&config, &target, &cli.benchmark(), cli.runner_flags());
    let result = invocation.run();
    if cli.teardown {
        prepared.stager.teardown_directory();
    }

    let status = result?;
    if status.success() {
        info!("Runner finished");
    } else {
        warn!("Runner exited with {status}");
    }
    Ok(exit_code(status))
}
