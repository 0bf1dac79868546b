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

//! Staged fill overlay
//!
//! A unit of work reads through the overlay and writes into it. Nothing
//! reaches the underlying store until the changes are committed, and a
//! commit hands back an [`UndoLog`] that restores the previous values.

use std::collections::BTreeMap;

use alloy_primitives::U256;
use bazaar_sdk::OrderKey;
use tracing::warn;

use super::{FillStore, FillStoreError};

/// Overlay of uncommitted fills on top of a read-only store
pub struct StagedFills<'a, F: ?Sized> {
	base: &'a F,
	writes: BTreeMap<OrderKey, U256>,
}

impl<'a, F: FillStore + ?Sized> StagedFills<'a, F> {
	pub fn new(base: &'a F) -> Self {
		Self {
			base,
			writes: BTreeMap::new(),
		}
	}

	/// Detach the staged writes from the base store
	pub fn into_changes(self) -> FillChanges {
		FillChanges {
			writes: self.writes,
		}
	}
}

impl<F: FillStore + ?Sized> FillStore for StagedFills<'_, F> {
	fn get(&self, key: &OrderKey) -> U256 {
		match self.writes.get(key) {
			Some(fill) => *fill,
			None => self.base.get(key),
		}
	}

	fn set(&mut self, key: OrderKey, fill: U256) -> Result<(), FillStoreError> {
		self.writes.insert(key, fill);
		Ok(())
	}
}

/// Staged writes ready to be committed
#[derive(Debug, Default)]
pub struct FillChanges {
	writes: BTreeMap<OrderKey, U256>,
}

impl FillChanges {
	pub fn len(&self) -> usize {
		self.writes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.writes.is_empty()
	}

	/// Write every change to `store`
	///
	/// Either all writes land or, on the first failing write, the ones
	/// already applied are reverted before the error is returned.
	pub fn commit<F: FillStore + ?Sized>(self, store: &mut F) -> Result<UndoLog, FillStoreError> {
		let mut undo = UndoLog::default();
		for (key, fill) in self.writes {
			let previous = store.get(&key);
			if let Err(e) = store.set(key, fill) {
				if let Err(revert) = undo.rollback(store) {
					warn!("Failed to revert partial fill commit: {}", revert);
				}
				return Err(e);
			}
			undo.previous.push((key, previous));
		}
		Ok(undo)
	}
}

/// Previous values of committed fills
#[derive(Debug, Default)]
pub struct UndoLog {
	previous: Vec<(OrderKey, U256)>,
}

impl UndoLog {
	pub fn len(&self) -> usize {
		self.previous.len()
	}

	pub fn is_empty(&self) -> bool {
		self.previous.is_empty()
	}

	/// Restore the previous values, most recent write first
	pub fn rollback<F: FillStore + ?Sized>(self, store: &mut F) -> Result<(), FillStoreError> {
		for (key, fill) in self.previous.into_iter().rev() {
			store.set(key, fill)?;
		}
		Ok(())
	}
}
