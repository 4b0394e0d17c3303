// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::env;

use async_trait::async_trait;

use crate::client::SecretsClient;
use crate::error::SecretsError;

/// Default region assumed when the environment does not name one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// A configuration snapshot loaded for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Region the application runs in.
    pub region: String,
    /// Named configuration values.
    pub values: BTreeMap<String, String>,
}

/// The configuration capability application code depends on.
///
/// Implementations decide where configuration lives; the default one reads it
/// from the secrets store.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Loads the full configuration snapshot.
    async fn load(&self) -> Result<AppConfig, SecretsError>;

    /// Fetches one named configuration value.
    async fn secret(&self, name: &str) -> Result<String, SecretsError>;

    /// Fetches every configuration value.
    async fn secrets(&self) -> Result<BTreeMap<String, String>, SecretsError>;
}

/// [`ConfigSource`] backed by the secrets store.
pub struct SecretsConfigSource {
    client: SecretsClient,
    region: String,
}

impl SecretsConfigSource {
    pub fn new(client: SecretsClient, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// Creates a source configured from the ambient environment, falling back
    /// to [`DEFAULT_REGION`] when `CT_REGION` is not set.
    pub fn from_env() -> Result<Self, SecretsError> {
        let client = SecretsClient::from_env()?;
        let region = env::var("CT_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());
        Ok(Self::new(client, region))
    }
}

#[async_trait]
impl ConfigSource for SecretsConfigSource {
    async fn load(&self) -> Result<AppConfig, SecretsError> {
        let values = self.client.get_all_secrets().await?;
        Ok(AppConfig {
            region: self.region.clone(),
            values,
        })
    }

    async fn secret(&self, name: &str) -> Result<String, SecretsError> {
        self.client.get_secret(name).await
    }

    async fn secrets(&self) -> Result<BTreeMap<String, String>, SecretsError> {
        self.client.get_all_secrets().await
    }
}
