// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use tracing::info;

use crate::config::FunctionPlatformConfig;
use crate::error::SecretsError;

/// Client updating the runtime configuration of deployed functions.
#[derive(Debug, Clone)]
pub struct FunctionConfigClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl FunctionConfigClient {
    /// Creates a client configured from the ambient environment.
    pub fn from_env() -> Result<Self, SecretsError> {
        Self::new(FunctionPlatformConfig::from_env()?)
    }

    pub fn new(config: FunctionPlatformConfig) -> Result<Self, SecretsError> {
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

    /// Updates the function's runtime environment variables to carry the
    /// given region.
    ///
    /// Failures are returned to the caller; whether they are fatal is the
    /// application's decision, not this client's.
    pub async fn set_environment(
        &self,
        function_name: &str,
        region: &str,
    ) -> Result<(), SecretsError> {
        let url = format!("{}/v1/functions/{function_name}/configuration", self.base_url);
        let payload = json!({
            "environment": {
                "variables": {
                    "CT_REGION": region,
                }
            }
        });

        let mut request = self.client.patch(&url).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.header("CT-API-TOKEN", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SecretsError::from_transport(&e))?;

        match response.status() {
            status if status.is_success() => {
                info!("FUNCTIONS | Environment updated for function {function_name}");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(SecretsError::NotFound(function_name.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SecretsError::AccessDenied(
                format!("function {function_name}"),
            )),
            status => Err(SecretsError::Transient(format!(
                "function platform returned {status}"
            ))),
        }
    }
}
