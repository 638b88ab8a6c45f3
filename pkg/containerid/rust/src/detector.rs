// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Container identity detection.
//!
//! Strategies are tried in a fixed priority order (Kubernetes, cgroup-v1,
//! cgroup-v2/mountinfo); the first valid container ID wins. Every strategy
//! failure is a normal outcome, not an error: running on bare metal simply
//! yields the empty identity.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;

use crate::cgroup_v1::extract_v1;
use crate::cgroup_v2::extract_v2;
use crate::kubernetes::{self, KubernetesConfig};

const CGROUP_PATH: &str = "/proc/self/cgroup";
const MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Resource attribute key under which the container ID is reported.
pub const CONTAINER_ID_ATTRIBUTE: &str = "container.id";

/// Extraction strategy for one probe invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    CgroupV1,
    CgroupV2,
    Kubernetes,
}

/// The detected runtime-environment identity: at most one validated
/// container ID. Immutable once produced; a fresh value is created on every
/// [`ContainerIdentityDetector::detect`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerIdentity {
    container_id: Option<String>,
}

impl ContainerIdentity {
    pub(crate) fn with_id(container_id: String) -> Self {
        Self {
            container_id: Some(container_id),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.container_id.is_none()
    }

    /// The resource attributes this identity contributes, for merging into
    /// a telemetry resource.
    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.container_id
            .as_deref()
            .map(|id| (CONTAINER_ID_ATTRIBUTE, id))
            .into_iter()
    }
}

/// Detects the container ID of the current process.
pub struct ContainerIdentityDetector {
    cgroup_path: PathBuf,
    mountinfo_path: PathBuf,
    kubernetes: Option<KubernetesConfig>,
}

impl ContainerIdentityDetector {
    /// Detector over the standard proc paths. `kubernetes` carries the pod
    /// context when the deployment provides one (see
    /// [`KubernetesConfig::from_env`]); `None` skips that strategy.
    pub fn new(kubernetes: Option<KubernetesConfig>) -> Self {
        Self {
            cgroup_path: PathBuf::from(CGROUP_PATH),
            mountinfo_path: PathBuf::from(MOUNTINFO_PATH),
            kubernetes,
        }
    }

    /// Detector with overridden control-file paths.
    pub fn with_paths(
        cgroup_path: PathBuf,
        mountinfo_path: PathBuf,
        kubernetes: Option<KubernetesConfig>,
    ) -> Self {
        Self {
            cgroup_path,
            mountinfo_path,
            kubernetes,
        }
    }

    /// Runs the strategies in priority order and returns the first valid
    /// result. Never fails: I/O and network problems are logged and treated
    /// as "no candidate from this strategy".
    pub fn detect(&self) -> ContainerIdentity {
        for mode in [ParseMode::Kubernetes, ParseMode::CgroupV1, ParseMode::CgroupV2] {
            if let Some(container_id) = self.extract(mode) {
                return ContainerIdentity::with_id(container_id);
            }
        }
        ContainerIdentity::empty()
    }

    /// Runs a single strategy, returning its validated container ID if any.
    /// [`ParseMode::Kubernetes`] yields `None` when no pod context was
    /// provided.
    pub fn extract(&self, mode: ParseMode) -> Option<String> {
        match mode {
            ParseMode::Kubernetes => {
                let config = self.kubernetes.as_ref()?;
                kubernetes::probe(config)
            }
            ParseMode::CgroupV1 => scan_file(&self.cgroup_path, extract_v1),
            ParseMode::CgroupV2 => scan_file(&self.mountinfo_path, extract_v2),
        }
    }
}

/// Scans a control file line by line, returning the first candidate the
/// extractor accepts. Read errors are swallowed; a missing file is the
/// normal case outside a container.
fn scan_file(path: &Path, extract: fn(&str) -> Option<&str>) -> Option<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            debug!("could not open {}: {err}", path.display());
            return None;
        }
    };

    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                debug!("could not read {}: {err}", path.display());
                return None;
            }
        };
        if let Some(candidate) = extract(&line) {
            return Some(candidate.to_string());
        }
    }

    None
}
