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

//! Facts about the local machine: its short name and the address the board should
//! reach it on.

use crate::error::BenchError;
use log::trace;
use nix::ifaddrs::getifaddrs;
use std::net::Ipv4Addr;

/// First label of `hostname`, e.g. `build03` for `build03.lab.example.com`.
pub fn short_hostname(hostname: &str) -> &str {
    hostname.split('.').next().unwrap_or(hostname)
}

/// The local hostname as reported by `gethostname(2)`.
pub fn hostname() -> Result<String, BenchError> {
    let name = nix::unistd::gethostname()
        .map_err(|e| BenchError::Hostname(e.into()))?
        .to_string_lossy()
        .into_owned();
    trace!("hostname is {name:?}");
    Ok(name)
}

/// Machine identifier used to namespace the staging directory.
pub fn machine_name() -> Result<String, BenchError> {
    Ok(short_hostname(&hostname()?).to_string())
}

/// First IPv4 address assigned to the interface called `iface`.
///
/// # Returns: `Result<Ipv4Addr, BenchError>`
/// * `Ok(Ipv4Addr)` - Address found
/// * `Err(BenchError::Network)` - Interfaces cannot be listed, or `iface` does not exist
///   or carries no IPv4 address
pub fn interface_ipv4(iface: &str) -> Result<Ipv4Addr, BenchError> {
    let addrs = getifaddrs().map_err(|e| BenchError::Network {
        iface: iface.to_string(),
        reason: e.to_string(),
    })?;
    let found = addrs
        .filter(|ifaddr| ifaddr.interface_name == iface)
        .find_map(|ifaddr| ifaddr.address?.as_sockaddr_in().map(|sin| sin.ip()));

    trace!("{iface} has address {found:?}");
    found.ok_or_else(|| BenchError::Network {
        iface: iface.to_string(),
        reason: "no such interface or no IPv4 address assigned".to_string(),
    })
}
