// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::config::SecretsConfig;
use crate::error::SecretsError;

#[derive(Deserialize)]
struct SecretValue {
    value: String,
}

#[derive(Deserialize)]
struct SecretList {
    secrets: Vec<SecretName>,
}

#[derive(Deserialize)]
struct SecretName {
    name: String,
}

/// Client for the cloud secrets store.
///
/// A direct wrapper over the store's HTTP API: one request per operation, no
/// caching, no retries.
#[derive(Debug, Clone)]
pub struct SecretsClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl SecretsClient {
    /// Creates a client configured from the ambient environment.
    pub fn from_env() -> Result<Self, SecretsError> {
        Self::new(SecretsConfig::from_env()?)
    }

    pub fn new(config: SecretsConfig) -> Result<Self, SecretsError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SecretsError::Transient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token,
        })
    }

    /// Returns the value of the secret with the given name.
    pub async fn get_secret(&self, name: &str) -> Result<String, SecretsError> {
        let url = format!("{}/v1/secrets/{name}", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.api_token {
            request = request.header("CT-API-TOKEN", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SecretsError::from_transport(&e))?;

        match response.status() {
            status if status.is_success() => {
                let secret: SecretValue = response
                    .json()
                    .await
                    .map_err(|e| SecretsError::Transient(e.to_string()))?;
                Ok(secret.value)
            }
            StatusCode::NOT_FOUND => Err(SecretsError::NotFound(name.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(SecretsError::AccessDenied(format!("secret {name}")))
            }
            status => Err(SecretsError::Transient(format!(
                "secret store returned {status}"
            ))),
        }
    }

    /// Returns every secret in the store as a name-to-value map.
    ///
    /// One list call, then one get per name. Fails on the first secret that
    /// cannot be fetched.
    pub async fn get_all_secrets(&self) -> Result<BTreeMap<String, String>, SecretsError> {
        let names = self.list_secret_names().await?;
        debug!("SECRETS | Store listed {} secret(s)", names.len());

        let mut secrets = BTreeMap::new();
        for name in names {
            let value = self.get_secret(&name).await?;
            secrets.insert(name, value);
        }
        Ok(secrets)
    }

    async fn list_secret_names(&self) -> Result<Vec<String>, SecretsError> {
        let url = format!("{}/v1/secrets", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.api_token {
            request = request.header("CT-API-TOKEN", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SecretsError::from_transport(&e))?;

        match response.status() {
            status if status.is_success() => {
                let list: SecretList = response
                    .json()
                    .await
                    .map_err(|e| SecretsError::Transient(e.to_string()))?;
                Ok(list.secrets.into_iter().map(|s| s.name).collect())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(SecretsError::AccessDenied("secret store".to_string()))
            }
            status => Err(SecretsError::Transient(format!(
                "secret store returned {status}"
            ))),
        }
    }
}
