// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Container identity detection for telemetry resource tagging.
//!
//! Recovers the canonical container ID of the current process by probing,
//! in order, the Kubernetes API server (when running inside a pod), the
//! legacy cgroup-v1 control file, and the cgroup-v2 mountinfo file. The
//! result is a single optional resource attribute keyed `container.id`.
//!
//! Detection is a fresh, idempotent probe on every call; nothing is cached
//! and absence of a container context is a normal, non-error outcome.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

mod cgroup_v1;
mod cgroup_v2;
mod detector;
mod errors;
mod hex;
mod kubernetes;
mod trust;

// Re-export the public API
pub use detector::{
    CONTAINER_ID_ATTRIBUTE, ContainerIdentity, ContainerIdentityDetector, ParseMode,
};
pub use errors::TrustError;
pub use kubernetes::{
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVICE_ACCOUNT_DIR, DEFAULT_STATUS_SETTLE_DELAY,
    KubernetesConfig,
};
pub use trust::TrustedCertificateSet;
