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

use std::collections::HashMap;

use alloy_primitives::U256;
use bazaar_sdk::OrderKey;

use super::{FillStore, FillStoreError};

/// In-memory fill store
///
/// No durability; suitable for tests, the CLI and embedding in a process
/// that persists fills elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryFillStore {
	fills: HashMap<OrderKey, U256>,
	writes: usize,
}

impl MemoryFillStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of recorded orders
	pub fn len(&self) -> usize {
		self.fills.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fills.is_empty()
	}

	/// Number of successful `set` calls
	pub fn write_count(&self) -> usize {
		self.writes
	}
}

impl FillStore for MemoryFillStore {
	fn get(&self, key: &OrderKey) -> U256 {
		self.fills.get(key).copied().unwrap_or(U256::ZERO)
	}

	fn set(&mut self, key: OrderKey, fill: U256) -> Result<(), FillStoreError> {
		self.fills.insert(key, fill);
		self.writes += 1;
		Ok(())
	}
}
