// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! cgroup-v1 control-file line parser.
//!
//! A `/proc/self/cgroup` record ends in a slash-delimited path whose last
//! segment carries the container ID, possibly wrapped in a runtime prefix
//! (`crio-`, `docker-`) and/or a suffix (`.scope`):
//!
//! ```text
//! 13:name=systemd:/podruntime/docker/kubepods/crio-e2cc29debdf85dde404998aa128997a819ff
//! ```

use crate::hex::is_valid_hex;

/// Extracts a container ID candidate from one cgroup-v1 line.
///
/// Takes the segment after the last `/`, then the substring strictly
/// between the last `-` (exclusive) and the last `.` (exclusive). The
/// delimiter positions are computed independently on the same segment; a
/// `.` sitting before the last `-` produces an inverted range and no
/// candidate.
pub(crate) fn extract_v1(line: &str) -> Option<&str> {
    let (_, last_section) = line.rsplit_once('/')?;

    let start = last_section.rfind('-').map_or(0, |i| i + 1);
    let end = last_section.rfind('.').unwrap_or(last_section.len());

    let candidate = last_section.get(start..end)?;
    if is_valid_hex(candidate) {
        Some(candidate)
    } else {
        None
    }
}
