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
use bazaar_sdk::BPS_DENOMINATOR;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for settlement configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettlementConfigError {
	#[error("Protocol fee of {0} bps exceeds 100%")]
	FeeAboveDenominator(u64),
	#[error("Protocol fee configured without a fee receiver")]
	MissingFeeReceiver,
}

/// Settlement configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
	/// Protocol fee in basis points of the fee-side value
	pub protocol_fee_bps: u64,
	/// Account receiving the protocol fee
	pub fee_receiver: Address,
}

impl Default for SettlementConfig {
	fn default() -> Self {
		Self {
			protocol_fee_bps: 0,
			fee_receiver: Address::ZERO,
		}
	}
}

impl SettlementConfig {
	pub fn new(protocol_fee_bps: u64, fee_receiver: Address) -> Self {
		Self {
			protocol_fee_bps,
			fee_receiver,
		}
	}

	pub fn validate(&self) -> Result<(), SettlementConfigError> {
		if self.protocol_fee_bps > BPS_DENOMINATOR {
			return Err(SettlementConfigError::FeeAboveDenominator(
				self.protocol_fee_bps,
			));
		}
		if self.protocol_fee_bps > 0 && self.fee_receiver.is_zero() {
			return Err(SettlementConfigError::MissingFeeReceiver);
		}
		Ok(())
	}
}
