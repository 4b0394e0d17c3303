// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors that can occur when talking to the secrets store or the function
/// platform.
///
/// Nothing is retried: transient failures are reported as such and the caller
/// decides what to do.
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Transient service failure: {0}")]
    Transient(String),
}

impl SecretsError {
    /// Maps a transport-level failure; connection and timeout problems are
    /// transient by definition.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        Self::Transient(err.to_string())
    }
}
