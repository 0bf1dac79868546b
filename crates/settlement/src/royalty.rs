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

//! Royalty schedules for traded assets

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use bazaar_sdk::{AssetError, AssetType, Part};
use thiserror::Error;

/// Default cap on the total royalty share of one asset, 50%
pub const DEFAULT_MAX_ROYALTY_BPS: u64 = 5_000;

/// Error types for royalty lookups
#[derive(Debug, Error)]
pub enum RoyaltyError {
	#[error("Royalties of {total} bps exceed the cap of {max} bps")]
	CapExceeded { total: u64, max: u64 },
	#[error("Asset error: {0}")]
	Asset(#[from] AssetError),
}

/// Source of royalty schedules
///
/// Returns the `(recipient, bps)` parts owed on a sale of `asset_type`.
/// An asset with no schedule has no royalties.
pub trait RoyaltyProvider {
	fn royalties(&self, asset_type: &AssetType) -> Result<Vec<Part>, RoyaltyError>;
}

/// Provider for deployments without royalties
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRoyalties;

impl RoyaltyProvider for NoRoyalties {
	fn royalties(&self, _asset_type: &AssetType) -> Result<Vec<Part>, RoyaltyError> {
		Ok(Vec::new())
	}
}

/// Fixed royalty registry
///
/// Schedules are registered per token contract or per individual token.
/// A token-level schedule replaces the contract-level one.
#[derive(Debug, Clone)]
pub struct StaticRoyaltyRegistry {
	by_contract: HashMap<Address, Vec<Part>>,
	by_token: HashMap<(Address, U256), Vec<Part>>,
	max_total_bps: u64,
}

impl Default for StaticRoyaltyRegistry {
	fn default() -> Self {
		Self {
			by_contract: HashMap::new(),
			by_token: HashMap::new(),
			max_total_bps: DEFAULT_MAX_ROYALTY_BPS,
		}
	}
}

impl StaticRoyaltyRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_max_total_bps(mut self, max_total_bps: u64) -> Self {
		self.max_total_bps = max_total_bps;
		self
	}

	pub fn max_total_bps(&self) -> u64 {
		self.max_total_bps
	}

	pub fn set_contract_royalties(&mut self, token: Address, parts: Vec<Part>) {
		self.by_contract.insert(token, parts);
	}

	pub fn set_token_royalties(&mut self, token: Address, token_id: U256, parts: Vec<Part>) {
		self.by_token.insert((token, token_id), parts);
	}
}

impl RoyaltyProvider for StaticRoyaltyRegistry {
	fn royalties(&self, asset_type: &AssetType) -> Result<Vec<Part>, RoyaltyError> {
		let Some(token) = asset_type.token_contract()? else {
			return Ok(Vec::new());
		};

		let parts = asset_type
			.token_id()
			.and_then(|id| self.by_token.get(&(token, id)))
			.or_else(|| self.by_contract.get(&token))
			.cloned()
			.unwrap_or_default();

		let total = parts
			.iter()
			.fold(0u64, |acc, part| acc.saturating_add(part.value));
		if total > self.max_total_bps {
			return Err(RoyaltyError::CapExceeded {
				total,
				max: self.max_total_bps,
			});
		}

		Ok(parts)
	}
}
