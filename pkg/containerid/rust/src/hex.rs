// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

/// Returns true iff `s` is a non-empty lowercase hex string.
///
/// This is the final gate applied to every container ID candidate before it
/// is returned, regardless of which strategy produced it. Runtimes emit IDs
/// as lowercase hex, so uppercase digits are rejected.
pub(crate) fn is_valid_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
