// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use alloy_primitives::Address;
use bazaar_sdk::ExchangeDomain;
use bazaar_settlement::{SettlementConfig, SettlementConfigError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Logging configuration constants
/// Default log level (can be overridden by RUST_LOG environment variable)
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log directory component name
pub const LOG_COMPONENT_NAME: &str = "matching";

/// Default console output enabled (can be overridden by LOG_TO_CONSOLE environment variable)
pub const DEFAULT_LOG_TO_CONSOLE: bool = false;

/// Prefix of environment overrides, e.g. `MATCHING_DOMAIN__CHAIN_ID=5`
pub const ENV_PREFIX: &str = "MATCHING";

/// Error types for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Failed to load configuration: {0}")]
	Load(#[from] config::ConfigError),
	#[error("Invalid settlement configuration: {0}")]
	Settlement(#[from] SettlementConfigError),
	#[error("Invalid configuration: {0}")]
	Invalid(String),
}

/// Typed-data signing domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
	pub name: String,
	pub version: String,
	pub chain_id: u64,
	pub verifying_contract: Address,
}

impl Default for DomainConfig {
	fn default() -> Self {
		let domain = ExchangeDomain::default();
		Self {
			name: domain.name,
			version: domain.version,
			chain_id: domain.chain_id,
			verifying_contract: domain.verifying_contract,
		}
	}
}

impl DomainConfig {
	pub fn to_domain(&self) -> ExchangeDomain {
		ExchangeDomain {
			name: self.name.clone(),
			version: self.version.clone(),
			chain_id: self.chain_id,
			verifying_contract: self.verifying_contract,
		}
	}
}

/// Exchange configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
	pub domain: DomainConfig,
	/// Party whose match allowances relayed orders must carry
	pub matching_authorizer: Address,
	pub settlement: SettlementConfig,
}

impl Default for ExchangeConfig {
	fn default() -> Self {
		Self {
			domain: DomainConfig::default(),
			matching_authorizer: Address::ZERO,
			settlement: SettlementConfig::default(),
		}
	}
}

impl ExchangeConfig {
	/// Load configuration from environment variables
	pub fn from_env() -> Result<Self, ConfigError> {
		let cfg = config::Config::builder()
			.add_source(environment())
			.build()?;

		let config: Self = cfg.try_deserialize()?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from file, with environment overrides
	pub fn from_file(path: &str) -> Result<Self, ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(environment())
			.build()?;

		let config: Self = cfg.try_deserialize()?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		self.settlement.validate()?;
		if self.domain.name.is_empty() {
			return Err(ConfigError::Invalid("domain name is empty".to_string()));
		}
		Ok(())
	}
}

fn environment() -> config::Environment {
	config::Environment::with_prefix(ENV_PREFIX)
		.prefix_separator("_")
		.separator("__")
		.try_parsing(true)
}
