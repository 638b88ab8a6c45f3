// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::path::PathBuf;

use thiserror::Error;

/// Failures building the trusted certificate set or the HTTPS client that
/// validates against it. None of these propagate out of `detect()`; the
/// Kubernetes strategy logs them and degrades to "not found".
#[derive(Error, Debug)]
pub enum TrustError {
    #[error("could not read certificate file {path}: {source}")]
    CertificateFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificates found in {path}")]
    EmptyTrustSet { path: PathBuf },

    #[error("invalid certificate in {path}: {reason}")]
    InvalidCertificate { path: PathBuf, reason: String },

    #[error("could not build certificate verifier: {reason}")]
    VerifierBuild { reason: String },

    #[error("could not build HTTPS client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}
