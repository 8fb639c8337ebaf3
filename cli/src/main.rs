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

mod run;

use clap::Parser;
use fpgabench::config::DEFAULT_CONFIG_PATH;
use fpgabench::runner::{BenchmarkParams, BenchmarkSize, RunnerFlags};
use log::{debug, error};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fpgabench")]
#[command(bin_name = "fpgabench")]
#[command(about = "Stage FPGA artifacts and run a SPEC CPU2006 case on the board")]
struct Cli {
    #[arg(
        short = 'i',
        long = "ini",
        help = r#"input ini file.
should include below section/key
  [script]
     dir =
  [fpga]
     target =
     core =
     bit =
  [fusdk]
     uboot_itb =
     uboot_spl =
     dtb =
     kernel =
     root_fs =
"#
    )]
    ini: PathBuf,

    #[arg(long = "spec2k6-size", default_value = "ref", help = "ref / train / test")]
    spec2k6_size: BenchmarkSize,

    #[arg(
        long = "spec2k6-iter",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "1 or more"
    )]
    spec2k6_iter: u32,

    #[arg(
        long = "spec2k6-binary",
        value_parser = existing_file,
        help = "path of spec2k6's bin"
    )]
    spec2k6_binary: PathBuf,

    #[arg(long = "spec2k6-casename", help = "462.libquantum or ...")]
    spec2k6_casename: String,

    #[arg(long = "not-keep-nbd-when-exit", help = "Exit and close the NBD")]
    not_keep_nbd_when_exit: bool,

    #[arg(long = "not-reflash", help = "Not reflash fpga again")]
    not_reflash: bool,

    #[arg(
        long = "config",
        default_value = DEFAULT_CONFIG_PATH,
        help = "tool configuration (network interface, interpreter, staging root)"
    )]
    config: PathBuf,

    #[arg(
        long = "lenient-ini",
        help = "log missing ini sections instead of failing, and continue without them"
    )]
    lenient_ini: bool,

    #[arg(
        long = "teardown",
        help = "remove the staging directory once the runner has exited"
    )]
    teardown: bool,
}

impl Cli {
    fn benchmark(&self) -> BenchmarkParams {
        BenchmarkParams {
            size: self.spec2k6_size,
            iterations: self.spec2k6_iter,
            binary: self.spec2k6_binary.clone(),
            casename: self.spec2k6_casename.clone(),
        }
    }

    fn runner_flags(&self) -> RunnerFlags {
        RunnerFlags {
            keep_nbd_when_exit: !self.not_keep_nbd_when_exit,
            reflash: !self.not_reflash,
        }
    }
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("The file {value} does not exist!"))
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    debug!("parsed cli command with {cli:?}");
    match run::run_handler(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
