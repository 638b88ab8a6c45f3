// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! End-to-end detection over temp control files.

#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use containerid_detector::{ContainerIdentityDetector, KubernetesConfig, ParseMode};
use tempfile::{NamedTempFile, TempDir};

fn write_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn missing_path() -> PathBuf {
    PathBuf::from("/nonexistent/containerid-detector-test")
}

#[test]
fn detects_from_cgroup_v1_file() {
    let cgroup = write_file(
        "12:cpu:/\n\
         13:name=systemd:/podruntime/docker/kubepods/crio-e2cc29debdf85dde404998aa128997a819ff\n",
    );
    let detector = ContainerIdentityDetector::with_paths(
        cgroup.path().to_path_buf(),
        missing_path(),
        None,
    );

    let identity = detector.detect();
    assert_eq!(
        identity.container_id(),
        Some("e2cc29debdf85dde404998aa128997a819ff")
    );
}

#[test]
fn falls_back_to_mountinfo_when_cgroup_has_no_id() {
    let cgroup = write_file("0::/\n");
    let mountinfo = write_file(
        "929 920 254:1 /docker/volumes/minikube/_data/lib/docker/containers/0eaa6718003210b6520f7e82d14b4c8d4743057a958a503626240f8d1900bc33/hostname /etc/hostname rw,relatime - ext4 /dev/vda1 rw\n",
    );
    let detector = ContainerIdentityDetector::with_paths(
        cgroup.path().to_path_buf(),
        mountinfo.path().to_path_buf(),
        None,
    );

    let identity = detector.detect();
    assert_eq!(
        identity.container_id(),
        Some("0eaa6718003210b6520f7e82d14b4c8d4743057a958a503626240f8d1900bc33")
    );
}

#[test]
fn mountinfo_content_is_not_picked_up_by_the_v1_strategy() {
    // A mountinfo file sitting at the cgroup path yields nothing: the two
    // grammars do not overlap.
    let mountinfo_content =
        "929 920 254:1 /docker/volumes/minikube/_data/lib/docker/containers/0eaa6718003210b6520f7e82d14b4c8d4743057a958a503626240f8d1900bc33/hostname /etc/hostname rw,relatime - ext4 /dev/vda1 rw\n";
    let cgroup = write_file(mountinfo_content);
    let detector = ContainerIdentityDetector::with_paths(
        cgroup.path().to_path_buf(),
        missing_path(),
        None,
    );

    assert!(detector.detect().is_empty());
}

#[test]
fn strategies_only_accept_their_own_grammar() {
    let v1_line =
        "13:name=systemd:/podruntime/docker/kubepods/crio-e2cc29debdf85dde404998aa128997a819ff\n";
    let v2_line =
        "929 920 254:1 /docker/volumes/minikube/_data/lib/docker/containers/0eaa6718003210b6520f7e82d14b4c8d4743057a958a503626240f8d1900bc33/hostname /etc/hostname rw,relatime - ext4 /dev/vda1 rw\n";

    // Each control file holds the other strategy's content.
    let cgroup = write_file(v2_line);
    let mountinfo = write_file(v1_line);
    let swapped = ContainerIdentityDetector::with_paths(
        cgroup.path().to_path_buf(),
        mountinfo.path().to_path_buf(),
        None,
    );
    assert_eq!(swapped.extract(ParseMode::CgroupV1), None);
    assert_eq!(swapped.extract(ParseMode::CgroupV2), None);
    assert_eq!(swapped.extract(ParseMode::Kubernetes), None);

    let cgroup = write_file(v1_line);
    let mountinfo = write_file(v2_line);
    let matched = ContainerIdentityDetector::with_paths(
        cgroup.path().to_path_buf(),
        mountinfo.path().to_path_buf(),
        None,
    );
    assert_eq!(
        matched.extract(ParseMode::CgroupV1).as_deref(),
        Some("e2cc29debdf85dde404998aa128997a819ff")
    );
    assert_eq!(
        matched.extract(ParseMode::CgroupV2).as_deref(),
        Some("0eaa6718003210b6520f7e82d14b4c8d4743057a958a503626240f8d1900bc33")
    );
}

#[test]
fn bare_metal_yields_empty_identity() {
    let detector = ContainerIdentityDetector::with_paths(missing_path(), missing_path(), None);

    let identity = detector.detect();
    assert!(identity.is_empty());
    assert_eq!(identity.attributes().count(), 0);
}

#[test]
fn failed_kubernetes_probe_falls_back_to_cgroup_parsing() {
    // Service account directory without credentials: the probe fails closed
    // before any network activity and the cgroup strategy takes over.
    let empty_dir = TempDir::new().unwrap();
    let kubernetes = KubernetesConfig {
        service_host: "127.0.0.1".to_string(),
        service_port: "1".to_string(),
        pod_hostname: "demo".to_string(),
        container_name: "test2".to_string(),
        namespace_fallback: None,
        service_account_dir: empty_dir.path().to_path_buf(),
        status_settle_delay: Duration::ZERO,
        request_timeout: Duration::from_millis(200),
    };

    let cgroup = write_file(
        "13:name=systemd:/podruntime/docker/kubepods/crio-e2cc29debdf85dde404998aa128997a819ff\n",
    );
    let detector = ContainerIdentityDetector::with_paths(
        cgroup.path().to_path_buf(),
        missing_path(),
        Some(kubernetes),
    );

    let identity = detector.detect();
    assert_eq!(
        identity.container_id(),
        Some("e2cc29debdf85dde404998aa128997a819ff")
    );
}

#[test]
fn detection_is_idempotent() {
    let cgroup = write_file(
        "13:name=systemd:/podruntime/docker/kubepods/crio-dc679f8a8319c8cf7d38e1adf263bc08d23.stuff\n",
    );
    let detector = ContainerIdentityDetector::with_paths(
        cgroup.path().to_path_buf(),
        missing_path(),
        None,
    );

    let first = detector.detect();
    let second = detector.detect();
    assert_eq!(first, second);
    assert_eq!(
        first.container_id(),
        Some("dc679f8a8319c8cf7d38e1adf263bc08d23")
    );
}
