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

use alloy_primitives::{Address, B256, Bytes, FixedBytes, U256, ruint::UintTryFrom};
use serde::{Deserialize, Serialize};

use crate::order_data::{OrderData, data_type};

/// 4-byte asset class discriminator (`bytes4(keccak256(name))`)
pub type AssetClass = FixedBytes<4>;

/// 4-byte discriminator selecting the schema of `Order::data`
pub type DataType = FixedBytes<4>;

/// Identity hash used for fill tracking
pub type OrderKey = B256;

/// 10000 basis points = 100%
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Asset type: a class discriminator plus an opaque class-specific reference
///
/// For token classes `data` is the ABI encoding of the token contract and,
/// for non-fungible and semi-fungible classes, the token id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetType {
	pub asset_class: AssetClass,
	pub data: Bytes,
}

/// An amount of a given asset type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
	pub asset_type: AssetType,
	pub value: U256,
}

impl Asset {
	pub fn new<T>(asset_type: AssetType, value: T) -> Self
	where
		U256: UintTryFrom<T>,
	{
		Self {
			asset_type,
			value: U256::from(value),
		}
	}
}

/// A signed offer to exchange `make_asset` for `take_asset`
///
/// The price is implied by the ratio of the two values. Orders are created
/// off-system and never mutated; the engine only tracks the cumulative fill
/// associated with their key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Signer and offering party
	pub maker: Address,
	/// What the maker gives
	pub make_asset: Asset,
	/// Restricted counterparty, or zero for anyone
	pub taker: Address,
	/// What the maker wants in return
	pub take_asset: Asset,
	/// Discriminator between otherwise identical orders; zero marks an
	/// immediate order that only its maker may submit
	pub salt: U256,
	/// Not valid before this timestamp (0 = unbounded)
	pub start: u64,
	/// Not valid after this timestamp (0 = unbounded)
	pub end: u64,
	/// Schema of `data`
	pub data_type: DataType,
	/// Schema-specific order data (payouts, origin fees)
	pub data: Bytes,
	/// Whether `take_asset` names a whole collection rather than one token
	#[serde(default)]
	pub collection_bid: bool,
}

impl Order {
	/// Create an order without a validity window or order data
	pub fn new<T>(
		maker: Address,
		make_asset: Asset,
		taker: Address,
		take_asset: Asset,
		salt: T,
	) -> Self
	where
		U256: UintTryFrom<T>,
	{
		Self {
			maker,
			make_asset,
			taker,
			take_asset,
			salt: U256::from(salt),
			start: 0,
			end: 0,
			data_type: data_type::DEFAULT,
			data: Bytes::new(),
			collection_bid: false,
		}
	}

	pub fn with_validity(mut self, start: u64, end: u64) -> Self {
		self.start = start;
		self.end = end;
		self
	}

	/// Attach V1 order data (payouts and origin fees)
	pub fn with_data(mut self, data: &OrderData) -> Self {
		self.data_type = data_type::V1;
		self.data = data.encode_v1();
		self
	}

	pub fn as_collection_bid(mut self) -> Self {
		self.collection_bid = true;
		self
	}

	/// Key of the fill record this order contributes to
	pub fn key(&self) -> OrderKey {
		crate::eip712::hash_key(self)
	}
}

/// A recipient and its share in basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
	pub account: Address,
	pub value: u64,
}

impl Part {
	pub fn new(account: Address, value: u64) -> Self {
		Self { account, value }
	}
}

/// Attestation by the matching authorizer that an order identity may be
/// matched before a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAllowance {
	pub order_key_hash: B256,
	pub match_before_timestamp: u64,
}
