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

use fpgabench::error::BenchError;
use fpgabench::system_io::{fs_copy, fs_read, fs_read_dir, fs_remove_dir, fs_symlink};
use googletest::prelude::*;
use rstest::*;
use std::path::Path;

#[gtest]
#[rstest]
#[case::not_found(
    "bad_input",
    err(displays_as(contains_substring("No such file or directory")))
)]
#[case::is_dir("/etc/", err(displays_as(contains_substring("Is a directory"))))]
#[case::ok("./Cargo.toml", ok(anything()))]
fn test_fs_read<M: for<'a> Matcher<&'a std::result::Result<String, BenchError>>>(
    #[case] path_str: &str,
    #[case] condition: M,
) {
    let r = fs_read(Path::new(path_str));
    expect_that!(r, condition);
}

#[gtest]
#[rstest]
fn test_fs_symlink_keeps_already_exists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let link = dir.path().join("link");
    fs_symlink(Path::new("/etc/hostname"), &link).expect("first link");

    let r = fs_symlink(Path::new("/etc/hostname"), &link);
    assert!(
        matches!(&r, Err(BenchError::IOSymlink { e, .. }) if e.kind() == std::io::ErrorKind::AlreadyExists),
        "unexpected result: {r:?}"
    );
}

#[gtest]
#[rstest]
fn test_fs_copy_reports_both_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    let r = fs_copy(&dir.path().join("absent"), &dir.path().join("copy"));
    expect_that!(
        r,
        err(displays_as(contains_substring("BenchError::IOCopy")))
    );
}

#[gtest]
#[rstest]
fn test_fs_read_dir_lists_full_paths() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a"), b"a").expect("write");
    let entries = fs_read_dir(dir.path()).expect("readable dir");
    assert_eq!(entries, vec![dir.path().join("a")]);
}

#[gtest]
#[rstest]
fn test_fs_remove_dir_refuses_non_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a"), b"a").expect("write");
    expect_that!(
        fs_remove_dir(dir.path()),
        err(displays_as(contains_substring("BenchError::IODelete")))
    );
}
