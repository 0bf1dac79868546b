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

//! Order data schemas selected by `Order::data_type`

use alloy_primitives::{Bytes, aliases::U96};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{BPS_DENOMINATOR, DataType, Order, Part};

/// Known order data discriminators
pub mod data_type {
	use alloy_primitives::FixedBytes;

	use crate::types::DataType;

	/// No order data; `data` must be empty
	pub const DEFAULT: DataType = FixedBytes::new([0xff, 0xff, 0xff, 0xff]);
	/// Payouts and origin fees, `bytes4(keccak256("V1"))`
	pub const V1: DataType = FixedBytes::new([0x4c, 0x23, 0x42, 0x66]);
}

mod schema {
	alloy_sol_types::sol! {
		struct Part {
			address account;
			uint96 value;
		}

		struct DataV1 {
			Part[] payouts;
			Part[] originFees;
		}
	}
}

/// Error types for order data decoding
#[derive(Debug, Error)]
pub enum OrderDataError {
	#[error("Unknown order data type: 0x{0}")]
	UnknownDataType(String),
	#[error("Malformed order data: {0}")]
	Malformed(String),
	#[error("Default order data type must carry no data, got {0} bytes")]
	UnexpectedData(usize),
	#[error("Payouts sum to {0} bps, expected 10000")]
	PayoutsNotComplete(u64),
}

/// Decoded order data
///
/// `payouts` say where the value this order receives is delivered;
/// `origin_fees` are referrer fees charged on top of the traded value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
	pub payouts: Vec<Part>,
	pub origin_fees: Vec<Part>,
}

impl OrderData {
	pub fn new(payouts: Vec<Part>, origin_fees: Vec<Part>) -> Self {
		Self {
			payouts,
			origin_fees,
		}
	}

	/// ABI-encode as a V1 payload
	pub fn encode_v1(&self) -> Bytes {
		let data = schema::DataV1 {
			payouts: self.payouts.iter().map(to_schema_part).collect(),
			originFees: self.origin_fees.iter().map(to_schema_part).collect(),
		};
		data.abi_encode().into()
	}

	/// Decode raw order data according to its discriminator
	///
	/// No defaults are applied; see [`OrderData::parse`].
	pub fn decode(data_type: &DataType, data: &[u8]) -> Result<Self, OrderDataError> {
		if *data_type == data_type::V1 {
			let decoded = schema::DataV1::abi_decode(data)
				.map_err(|e| OrderDataError::Malformed(e.to_string()))?;
			return Ok(Self {
				payouts: decoded
					.payouts
					.iter()
					.map(from_schema_part)
					.collect::<Result<_, _>>()?,
				origin_fees: decoded
					.originFees
					.iter()
					.map(from_schema_part)
					.collect::<Result<_, _>>()?,
			});
		}

		if *data_type == data_type::DEFAULT {
			if !data.is_empty() {
				return Err(OrderDataError::UnexpectedData(data.len()));
			}
			return Ok(Self::default());
		}

		Err(OrderDataError::UnknownDataType(hex::encode(data_type)))
	}

	/// Decode an order's data and apply defaults
	///
	/// An order without payouts receives 100% at its maker. Payouts must
	/// account for exactly 10000 bps.
	pub fn parse(order: &Order) -> Result<Self, OrderDataError> {
		let mut data = Self::decode(&order.data_type, &order.data)?;
		if data.payouts.is_empty() {
			data.payouts = vec![Part::new(order.maker, BPS_DENOMINATOR)];
		}

		let total: u64 = data.payouts.iter().map(|p| p.value).sum();
		if total != BPS_DENOMINATOR {
			return Err(OrderDataError::PayoutsNotComplete(total));
		}

		Ok(data)
	}
}

fn to_schema_part(part: &Part) -> schema::Part {
	schema::Part {
		account: part.account,
		value: U96::from(part.value),
	}
}

fn from_schema_part(part: &schema::Part) -> Result<Part, OrderDataError> {
	let value = u64::try_from(part.value)
		.ok()
		.filter(|value| *value <= BPS_DENOMINATOR)
		.ok_or_else(|| {
			OrderDataError::Malformed(format!("share of {} bps exceeds 100%", part.value))
		})?;
	Ok(Part::new(part.account, value))
}
