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

mod sink;

use alloy_primitives::{Address, Bytes, U256};
use bazaar_sdk::{AssetClass, OrderKey};
use bazaar_settlement::{TransferDirection, TransferLeg, TransferType};
use serde::{Deserialize, Serialize};

pub use sink::{EventSink, MemoryEventSink};

use crate::types::MatchOutcome;

/// Events published by the exchange
///
/// Events are only emitted for work that was committed and executed. A
/// match is reported by one `Transfer` per executed leg, in execution
/// order, followed by its `Match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExchangeEvent {
	/// Two orders were matched
	Match {
		left_hash: OrderKey,
		right_hash: OrderKey,
		left_maker: Address,
		right_maker: Address,
		new_left_fill: U256,
		new_right_fill: U256,
	},

	/// An asset moved as part of a match
	Transfer {
		asset_class: AssetClass,
		asset_data: Bytes,
		asset_value: U256,
		from: Address,
		to: Address,
		transfer_direction: TransferDirection,
		transfer_type: TransferType,
	},
}

impl ExchangeEvent {
	pub fn is_match(&self) -> bool {
		matches!(self, ExchangeEvent::Match { .. })
	}

	pub fn is_transfer(&self) -> bool {
		matches!(self, ExchangeEvent::Transfer { .. })
	}

	/// Events reporting one match, in emission order
	pub fn for_outcome(outcome: &MatchOutcome) -> Vec<ExchangeEvent> {
		let mut events: Vec<ExchangeEvent> = outcome.legs.iter().map(ExchangeEvent::from).collect();
		events.push(ExchangeEvent::Match {
			left_hash: outcome.left_hash,
			right_hash: outcome.right_hash,
			left_maker: outcome.left_maker,
			right_maker: outcome.right_maker,
			new_left_fill: outcome.new_left_fill,
			new_right_fill: outcome.new_right_fill,
		});
		events
	}
}

impl From<&TransferLeg> for ExchangeEvent {
	fn from(leg: &TransferLeg) -> Self {
		ExchangeEvent::Transfer {
			asset_class: leg.asset.asset_type.asset_class,
			asset_data: leg.asset.asset_type.data.clone(),
			asset_value: leg.asset.value,
			from: leg.from,
			to: leg.to,
			transfer_direction: leg.direction,
			transfer_type: leg.transfer_type,
		}
	}
}

#[cfg(test)]
mod tests {
	use bazaar_sdk::{Asset, AssetType};

	use super::*;

	#[test]
	fn test_transfer_event_json_shape() {
		let leg = TransferLeg {
			asset: Asset::new(AssetType::native(), 5u64),
			from: Address::repeat_byte(1),
			to: Address::repeat_byte(2),
			direction: TransferDirection::ToMaker,
			transfer_type: TransferType::Royalty,
		};

		let json = serde_json::to_value(ExchangeEvent::from(&leg)).unwrap();
		assert_eq!(json["event"], "transfer");
		assert_eq!(json["assetClass"], "0xaaaebeba");
		assert_eq!(json["transferDirection"], "toMaker");
		assert_eq!(json["transferType"], "royalty");
	}
}
