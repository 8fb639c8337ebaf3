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

#![allow(dead_code)]

use fpgabench::digest::{ContentDigest, Sha256Digest};
use fpgabench::error::BenchError;
use fpgabench::manifest::{Manifest, SectionPolicy};
use rstest::*;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch tree holding one of every input a run needs.
pub struct Sources {
    pub root: TempDir,
    pub script_dir: PathBuf,
    pub bit: PathBuf,
    pub uboot_spl: PathBuf,
    pub uboot_itb: PathBuf,
    pub kernel: PathBuf,
    pub dtb: PathBuf,
    pub root_fs: PathBuf,
}

impl Sources {
    pub fn stage_dir(&self) -> PathBuf {
        self.root.path().join("symlink_dir_testhost")
    }

    /// Ini text listing every source, with `[section]` blocks in the usual order.
    pub fn ini_text(&self) -> String {
        format!(
            "[script]\ndir = {}\n\n\
             [fpga]\ntarget = vcu118\ncore = rocket\nbit = {}\n\n\
             [fusdk]\nuboot_itb = {}\nuboot_spl = {}\ndtb = {}\nkernel = {}\nroot_fs = {}\n",
            self.script_dir.display(),
            self.bit.display(),
            self.uboot_itb.display(),
            self.uboot_spl.display(),
            self.dtb.display(),
            self.kernel.display(),
            self.root_fs.display(),
        )
    }

    pub fn write_ini(&self, text: &str) -> PathBuf {
        let path = self.root.path().join("run.ini");
        write_file(&path, text.as_bytes());
        path
    }

    pub fn manifest(&self) -> Manifest {
        let ini = self.write_ini(&self.ini_text());
        Manifest::from_ini_file(&ini, SectionPolicy::Strict).expect("complete manifest should load")
    }
}

pub fn write_file(path: &Path, contents: &[u8]) {
    fs::write(path, contents).unwrap_or_else(|e| panic!("failed to write {path:?}: {e}"));
}

#[fixture]
pub fn sources() -> Sources {
    let root = tempfile::tempdir().expect("failed to create scratch dir");
    let inputs = root.path().join("inputs");
    let script_dir = root.path().join("scripts");
    fs::create_dir_all(&inputs).expect("failed to create inputs dir");
    fs::create_dir_all(&script_dir).expect("failed to create scripts dir");

    let file = |name: &str, contents: &[u8]| {
        let path = inputs.join(name);
        write_file(&path, contents);
        path
    };

    Sources {
        bit: file("x.bit", b"bitstream v1"),
        uboot_spl: file("u-boot-spl.bin", b"spl"),
        uboot_itb: file("u-boot.itb", b"itb"),
        kernel: file("Image", b"kernel image"),
        dtb: file("board.dtb", b"device tree"),
        root_fs: file("rootfs.img", b"root filesystem v1"),
        script_dir,
        root,
    }
}

/// SHA-256 that counts how many files it was asked to digest.
#[derive(Debug, Default)]
pub struct CountingDigest {
    calls: Cell<usize>,
}

impl CountingDigest {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ContentDigest for CountingDigest {
    fn digest(&self, path: &Path) -> Result<String, BenchError> {
        self.calls.set(self.calls.get() + 1);
        Sha256Digest.digest(path)
    }
}
