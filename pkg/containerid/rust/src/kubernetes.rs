// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Kubernetes control-plane probe.
//!
//! When the process runs inside a pod, the API server knows the container
//! ID authoritatively. The probe authenticates with the mounted service
//! account credentials, fetches the pod status and picks the entry matching
//! the configured container name.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;

use crate::hex::is_valid_hex;
use crate::trust::TrustedCertificateSet;

/// Environment variables set by Kubernetes inside a pod. All of
/// `KUBERNETES_SERVICE_HOST`, `KUBERNETES_SERVICE_PORT`, `HOSTNAME` and a
/// container name must be present and non-empty for the probe to activate.
const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";
const POD_HOSTNAME_ENV: &str = "HOSTNAME";
/// The container name is not set by Kubernetes itself; deployments inject it
/// via the downward API under either of these names.
const CONTAINER_NAME_ENV: &str = "CONTAINER_NAME";
const CONTAINER_NAME_FALLBACK_ENV: &str = "container.name";
/// Namespace override, captured at config load and used when the service
/// account namespace file is unreadable.
const POD_NAMESPACE_ENV: &str = "NAMESPACE";

/// Default mount point of the service account credentials inside a pod.
pub const DEFAULT_SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";
const CA_CERT_FILE: &str = "ca.crt";
const TOKEN_FILE: &str = "token";
const NAMESPACE_FILE: &str = "namespace";

/// Grace delay before the pod status request. The control plane may not
/// have written container statuses yet right after pod start; whether this
/// is strictly required is undocumented upstream, so it stays configurable
/// rather than removed.
pub const DEFAULT_STATUS_SETTLE_DELAY: Duration = Duration::from_secs(5);
/// Bound on the single request so an unreachable control plane cannot hang
/// telemetry initialization.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Inputs of one Kubernetes probe. Populated once from the environment at
/// startup via [`KubernetesConfig::from_env`]; the probe itself performs no
/// ambient lookups, so tests can construct this directly.
#[derive(Debug, Clone)]
pub struct KubernetesConfig {
    pub service_host: String,
    pub service_port: String,
    pub pod_hostname: String,
    pub container_name: String,
    /// Namespace to use when the service account namespace file cannot be
    /// read; populated from `NAMESPACE` by [`KubernetesConfig::from_env`].
    pub namespace_fallback: Option<String>,
    pub service_account_dir: PathBuf,
    pub status_settle_delay: Duration,
    pub request_timeout: Duration,
}

impl KubernetesConfig {
    /// Reads the pod context from the environment. Returns `None` unless
    /// every required variable is present and non-empty, in which case the
    /// probe is skipped entirely.
    pub fn from_env() -> Option<Self> {
        let service_host = non_empty_var(SERVICE_HOST_ENV)?;
        let service_port = non_empty_var(SERVICE_PORT_ENV)?;
        let pod_hostname = non_empty_var(POD_HOSTNAME_ENV)?;
        let container_name =
            non_empty_var(CONTAINER_NAME_ENV).or_else(|| non_empty_var(CONTAINER_NAME_FALLBACK_ENV))?;

        Some(Self {
            service_host,
            service_port,
            pod_hostname,
            container_name,
            namespace_fallback: non_empty_var(POD_NAMESPACE_ENV),
            service_account_dir: PathBuf::from(DEFAULT_SERVICE_ACCOUNT_DIR),
            status_settle_delay: DEFAULT_STATUS_SETTLE_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    pub fn ca_cert_path(&self) -> PathBuf {
        self.service_account_dir.join(CA_CERT_FILE)
    }

    pub fn token_path(&self) -> PathBuf {
        self.service_account_dir.join(TOKEN_FILE)
    }

    pub fn namespace_path(&self) -> PathBuf {
        self.service_account_dir.join(NAMESPACE_FILE)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn read_trimmed(path: &std::path::Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents.trim().to_string()),
        Err(err) => {
            debug!("could not read {}: {err}", path.display());
            None
        }
    }
}

// Pod status response model, reduced to the fields the probe consumes.

#[derive(Debug, Deserialize)]
struct Pod {
    status: Option<PodStatus>,
}

#[derive(Debug, Deserialize)]
struct PodStatus {
    #[serde(rename = "containerStatuses")]
    container_statuses: Option<Vec<ContainerStatus>>,
}

#[derive(Debug, Deserialize)]
struct ContainerStatus {
    name: Option<String>,
    #[serde(rename = "containerID")]
    container_id: Option<String>,
}

/// Performs one blocking pod status request and extracts the container ID
/// for the configured container name.
///
/// Every failure mode (unreadable credentials, TLS rejection, network
/// error, non-success status, malformed body, no matching container) is
/// logged and degrades to `None`; nothing escapes the probe boundary.
pub(crate) fn probe(config: &KubernetesConfig) -> Option<String> {
    let trust = match TrustedCertificateSet::from_file(&config.ca_cert_path()) {
        Ok(trust) => trust,
        Err(err) => {
            warn!("kubernetes probe skipped: {err}");
            return None;
        }
    };

    let token = read_trimmed(&config.token_path())?;
    let namespace =
        read_trimmed(&config.namespace_path()).or_else(|| config.namespace_fallback.clone())?;

    let client = match trust.https_client(config.request_timeout) {
        Ok(client) => client,
        Err(err) => {
            warn!("kubernetes probe skipped: {err}");
            return None;
        }
    };

    // Give the control plane time to update the container status.
    std::thread::sleep(config.status_settle_delay);

    let url = format!(
        "https://{}:{}/api/v1/namespaces/{}/pods/{}",
        config.service_host, config.service_port, namespace, config.pod_hostname
    );

    let response = match client
        .get(&url)
        .bearer_auth(&token)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
    {
        Ok(response) => response,
        Err(err) => {
            debug!("pod status request failed: {err}");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        debug!("pod status request returned {status}");
        return None;
    }

    let body = match response.text() {
        Ok(body) => body,
        Err(err) => {
            debug!("could not read pod status response: {err}");
            return None;
        }
    };

    container_id_from_pod_status(&body, &config.container_name)
}

/// Parses a pod status document and returns the validated container ID of
/// the status entry whose name matches `container_name`.
fn container_id_from_pod_status(body: &str, container_name: &str) -> Option<String> {
    let pod: Pod = match serde_json::from_str(body) {
        Ok(pod) => pod,
        Err(err) => {
            debug!("could not parse pod status response: {err}");
            return None;
        }
    };

    let raw = pod
        .status?
        .container_statuses?
        .into_iter()
        .find(|status| status.name.as_deref() == Some(container_name))?
        .container_id?;

    let container_id = strip_runtime_prefix(&raw);
    if is_valid_hex(container_id) {
        Some(container_id.to_string())
    } else {
        debug!("pod status container ID is not a valid hex identifier");
        None
    }
}

/// Strips the runtime prefix (`docker://`, `containerd://`, `cri-o://`)
/// the API server prepends to container IDs.
fn strip_runtime_prefix(id: &str) -> &str {
    id.find("://").map(|i| id.get(i + 3..).unwrap_or("")).unwrap_or(id)
}
