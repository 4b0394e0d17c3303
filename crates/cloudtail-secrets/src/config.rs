// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

use crate::error::SecretsError;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Connection settings for the secrets store.
#[derive(Debug, Clone)]
pub struct SecretsConfig {
    /// Secrets store base URL.
    pub base_url: String,
    /// API token attached to requests, if the environment provides one.
    pub api_token: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl SecretsConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, SecretsError> {
        let config = Self {
            base_url: env::var("CT_SECRETS_URL").unwrap_or_default(),
            api_token: env::var("CT_SECRETS_TOKEN").ok(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SecretsError> {
        if self.base_url.trim().is_empty() {
            return Err(SecretsError::InvalidConfig(
                "CT_SECRETS_URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Connection settings for the serverless function platform.
#[derive(Debug, Clone)]
pub struct FunctionPlatformConfig {
    /// Function platform base URL.
    pub base_url: String,
    /// API token attached to requests, if the environment provides one.
    pub api_token: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl FunctionPlatformConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, SecretsError> {
        let config = Self {
            base_url: env::var("CT_FUNCTIONS_URL").unwrap_or_default(),
            api_token: env::var("CT_FUNCTIONS_TOKEN").ok(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SecretsError> {
        if self.base_url.trim().is_empty() {
            return Err(SecretsError::InvalidConfig(
                "CT_FUNCTIONS_URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
