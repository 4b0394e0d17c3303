// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Accessors for the cloud secrets store and the serverless function platform.
//!
//! Thin request/response wrappers: [`client::SecretsClient`] fetches secrets
//! by name or enumerates the whole store, [`env::FunctionConfigClient`]
//! updates a deployed function's runtime environment, and
//! [`source::ConfigSource`] is the capability the rest of the application
//! depends on for configuration. Credentials come from the ambient cloud
//! environment; nothing here caches or retries.

#![deny(clippy::all)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(unreachable_pub)]

/// Secrets store client
pub mod client;

/// Service endpoints and credentials, resolved from the environment
pub mod config;

/// Function runtime-environment accessor
pub mod env;

/// Error taxonomy for the secrets and function-configuration services
pub mod error;

/// The configuration capability application code depends on
pub mod source;

pub use client::SecretsClient;
pub use config::{FunctionPlatformConfig, SecretsConfig};
pub use env::FunctionConfigClient;
pub use error::SecretsError;
pub use source::{AppConfig, ConfigSource, SecretsConfigSource};
