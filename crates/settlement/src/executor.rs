// Copyright 2025 chenjjiaa
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

//! Transfer legs and the executor that moves them

use std::collections::HashSet;

use alloy_primitives::{Address, U256};
use bazaar_sdk::{Asset, AssetType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for transfer execution
#[derive(Debug, Error)]
pub enum ExecutionError {
	#[error("Transfer {index} rejected: {reason}")]
	Rejected { index: usize, reason: String },
}

/// Which way a leg flows relative to the match
///
/// Value leaving the left order's maker flows `ToTaker`; value leaving the
/// right order's maker flows `ToMaker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferDirection {
	ToMaker,
	ToTaker,
}

/// Purpose of a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferType {
	Protocol,
	Royalty,
	Origin,
	Payout,
}

/// A single asset movement produced by the waterfall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLeg {
	pub asset: Asset,
	pub from: Address,
	pub to: Address,
	pub direction: TransferDirection,
	pub transfer_type: TransferType,
}

/// Asset transfer executor
///
/// Receives every leg of a unit of work at once, after fills have been
/// committed. An error means none of the legs may be considered settled.
pub trait TransferExecutor {
	fn execute(&mut self, legs: &[TransferLeg]) -> Result<(), ExecutionError>;
}

/// In-memory executor that records legs instead of moving assets
///
/// Rejects a batch as a whole when any leg moves a non-fungible asset with a
/// value other than one, or leaves an account marked as failing.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
	executed: Vec<TransferLeg>,
	failing: HashSet<Address>,
	calls: usize,
}

impl RecordingExecutor {
	pub fn new() -> Self {
		Self::default()
	}

	/// Make every batch containing a leg sent by `account` fail
	pub fn fail_transfers_from(mut self, account: Address) -> Self {
		self.failing.insert(account);
		self
	}

	pub fn executed(&self) -> &[TransferLeg] {
		&self.executed
	}

	/// Number of `execute` calls, successful or not
	pub fn calls(&self) -> usize {
		self.calls
	}

	/// Total amount of `asset_type` sent by `account`
	pub fn sent_by(&self, account: Address, asset_type: &AssetType) -> U256 {
		self.total(asset_type, |leg| leg.from == account)
	}

	/// Total amount of `asset_type` received by `account`
	pub fn received_by(&self, account: Address, asset_type: &AssetType) -> U256 {
		self.total(asset_type, |leg| leg.to == account)
	}

	fn total(&self, asset_type: &AssetType, filter: impl Fn(&TransferLeg) -> bool) -> U256 {
		self.executed
			.iter()
			.filter(|leg| leg.asset.asset_type == *asset_type && filter(leg))
			.fold(U256::ZERO, |acc, leg| acc.saturating_add(leg.asset.value))
	}
}

impl TransferExecutor for RecordingExecutor {
	fn execute(&mut self, legs: &[TransferLeg]) -> Result<(), ExecutionError> {
		self.calls += 1;

		for (index, leg) in legs.iter().enumerate() {
			if self.failing.contains(&leg.from) {
				return Err(ExecutionError::Rejected {
					index,
					reason: format!("transfers from {} are failing", leg.from),
				});
			}
			if leg.asset.asset_type.is_non_fungible() && leg.asset.value != U256::from(1) {
				return Err(ExecutionError::Rejected {
					index,
					reason: format!("non-fungible transfer of {} units", leg.asset.value),
				});
			}
		}

		self.executed.extend_from_slice(legs);
		Ok(())
	}
}
