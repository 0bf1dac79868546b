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

mod memory;
mod staged;

use alloy_primitives::U256;
use bazaar_sdk::OrderKey;
use thiserror::Error;

pub use memory::MemoryFillStore;
pub use staged::{FillChanges, StagedFills, UndoLog};

/// Error types for fill store operations
#[derive(Debug, Error)]
pub enum FillStoreError {
	#[error("Failed to write fill for order {key}: {reason}")]
	WriteFailed { key: OrderKey, reason: String },
}

/// Fill store trait - cumulative fill per order key
///
/// The fill of an order is the total amount of its take asset settled so
/// far. It is the only state the exchange keeps between calls.
///
/// Semantic constraints:
/// - A key that was never written reads as zero
/// - Values only grow through successful matches
/// - Records are never deleted by the exchange
///
/// The exchange writes to the store strictly before asking the executor to
/// move assets, and writes previous values back if the executor fails.
pub trait FillStore {
	/// Cumulative fill of `key`, zero if absent
	fn get(&self, key: &OrderKey) -> U256;

	/// Overwrite the cumulative fill of `key`
	fn set(&mut self, key: OrderKey, fill: U256) -> Result<(), FillStoreError>;
}
