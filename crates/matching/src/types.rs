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

use alloy_primitives::{Address, Bytes, U256};
use bazaar_sdk::{Order, OrderDataError, OrderKey};
use bazaar_settlement::{ExecutionError, FeeSide, SettlementError, TransferLeg};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthError;
use crate::fill::{FillError, FillResult};
use crate::fills::FillStoreError;

/// Caller of an exchange operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
	/// Acting party; orders made by the sender need no signatures
	pub sender: Address,
	/// Current time (unix seconds) that validity windows are checked against
	pub now: u64,
}

impl CallContext {
	pub fn new(sender: Address, now: u64) -> Self {
		Self { sender, now }
	}
}

/// An order together with its authorization material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSubmission {
	pub order: Order,
	/// Maker's signature over the order's typed-data digest
	#[serde(default)]
	pub signature: Bytes,
	/// Deadline asserted by the match allowance
	#[serde(default)]
	pub match_before_timestamp: u64,
	/// Matching authorizer's signature over the match allowance
	#[serde(default)]
	pub allowance_signature: Bytes,
}

impl MatchSubmission {
	/// Submission of an order by its own maker
	pub fn unsigned(order: Order) -> Self {
		Self {
			order,
			signature: Bytes::new(),
			match_before_timestamp: 0,
			allowance_signature: Bytes::new(),
		}
	}

	pub fn signed(order: Order, signature: Bytes) -> Self {
		Self {
			signature,
			..Self::unsigned(order)
		}
	}

	pub fn with_allowance(mut self, match_before_timestamp: u64, allowance_signature: Bytes) -> Self {
		self.match_before_timestamp = match_before_timestamp;
		self.allowance_signature = allowance_signature;
		self
	}
}

/// Result of one settled match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
	pub left_hash: OrderKey,
	pub right_hash: OrderKey,
	pub left_maker: Address,
	pub right_maker: Address,
	pub new_left_fill: U256,
	pub new_right_fill: U256,
	pub fill: FillResult,
	pub fee_side: FeeSide,
	pub legs: Vec<TransferLeg>,
}

/// Batch shape violations, detected before any match runs
#[derive(Debug, Error)]
pub enum ShapeError {
	#[error("Batch holds an odd number of orders: {0}")]
	OddOrderCount(usize),
	#[error("Length of {sequence} is {actual}, expected {expected}")]
	LengthMismatch {
		sequence: &'static str,
		expected: usize,
		actual: usize,
	},
}

/// Coarse classification of match failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
	Authenticity,
	Authorization,
	Temporal,
	Incompatibility,
	Arithmetic,
	Schema,
	Shape,
	Royalty,
	Execution,
	Storage,
}

/// Error types for exchange operations
#[derive(Debug, Error)]
pub enum MatchError {
	#[error("Authorization failed: {0}")]
	Auth(#[from] AuthError),
	#[error("Assets don't match: {0}")]
	AssetMismatch(&'static str),
	#[error("Taker restriction violated: order is reserved for {expected}, counter maker is {actual}")]
	TakerMismatch { expected: Address, actual: Address },
	#[error("Fill error: {0}")]
	Fill(#[from] FillError),
	#[error("Order data error: {0}")]
	OrderData(#[from] OrderDataError),
	#[error("Settlement error: {0}")]
	Settlement(#[from] SettlementError),
	#[error("Batch shape error: {0}")]
	Shape(#[from] ShapeError),
	#[error("Transfer execution failed, fills rolled back: {0}")]
	Execution(#[from] ExecutionError),
	#[error("Fill store error: {0}")]
	Storage(#[from] FillStoreError),
}

impl MatchError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			MatchError::Auth(e) => e.kind(),
			MatchError::AssetMismatch(_) | MatchError::TakerMismatch { .. } => {
				ErrorKind::Incompatibility
			}
			MatchError::Fill(_) => ErrorKind::Arithmetic,
			MatchError::OrderData(_) => ErrorKind::Schema,
			MatchError::Settlement(e) => match e {
				SettlementError::Royalty(_) => ErrorKind::Royalty,
				SettlementError::NoPayouts => ErrorKind::Schema,
				SettlementError::Overflow | SettlementError::FeesExceedValue { .. } => {
					ErrorKind::Arithmetic
				}
			},
			MatchError::Shape(_) => ErrorKind::Shape,
			MatchError::Execution(_) => ErrorKind::Execution,
			MatchError::Storage(_) => ErrorKind::Storage,
		}
	}
}
