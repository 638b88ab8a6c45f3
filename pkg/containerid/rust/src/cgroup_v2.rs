// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! cgroup-v2 / mountinfo line parser.
//!
//! cgroup-v2 hosts don't expose the container ID in `/proc/self/cgroup`,
//! but the `/etc/hostname` bind mount in `/proc/self/mountinfo` embeds the
//! full 64-character ID in its source path:
//!
//! ```text
//! 473 456 254:1 /docker/containers/dc64b574.../hostname /etc/hostname rw,relatime - ext4 /dev/vda1 rw
//! ```
//!
//! The grammar is runtime-agnostic (docker, containerd, podman, minikube
//! variants): two path segments, then the 64-character token, then one more
//! segment before the `hostname`-bearing suffix.

use std::sync::LazyLock;

use regex::Regex;

use crate::hex::is_valid_hex;

/// Matches a 64-character cgroup token flanked by path separators, with at
/// least two path segments before it. The token charset is the cgroup node
/// charset, wider than hex; the candidate still has to pass the strict hex
/// gate below.
static CONTAINER_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a compile-time constant
    let pattern = Regex::new(r".*/.+/([A-Za-z0-9_.-]{64})/.*$").unwrap();
    pattern
});

/// Extracts a container ID candidate from one mountinfo line.
///
/// Only lines containing the literal `hostname` are considered.
pub(crate) fn extract_v2(line: &str) -> Option<&str> {
    if !line.contains("hostname") {
        return None;
    }

    let candidate = CONTAINER_ID_PATTERN
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str())?;

    if is_valid_hex(candidate) {
        Some(candidate)
    } else {
        None
    }
}
