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

//! Canonical hashing of orders and match allowances
//!
//! These are the wire encodings signatures are computed over. Field names,
//! field order and Solidity types must stay exactly as declared in
//! [`schema`], otherwise signatures produced by existing clients stop
//! verifying.
//!
//! # Order key
//!
//! The order key identifies the fill record of an order. It covers
//! `maker`, both asset *types*, `taker` and `salt`, and deliberately leaves
//! out `start`, `end`, `data_type`, `data` and `collection_bid`. Two orders
//! that only differ in those fields draw from the same fill record.

use std::borrow::Cow;

use alloy_primitives::{Address, B256, U256, keccak256};
use alloy_sol_types::{Eip712Domain, SolStruct, SolValue};
use serde::{Deserialize, Serialize};

use crate::types::{Asset, AssetType, MatchAllowance, Order, OrderKey};

mod schema {
	alloy_sol_types::sol! {
		struct AssetType {
			bytes4 assetClass;
			bytes data;
		}

		struct Asset {
			AssetType assetType;
			uint256 value;
		}

		struct Order {
			address maker;
			Asset makeAsset;
			address taker;
			Asset takeAsset;
			uint256 salt;
			uint256 start;
			uint256 end;
			bytes4 dataType;
			bytes data;
			bool collectionBid;
		}

		struct MatchAllowance {
			bytes32 orderKeyHash;
			uint256 matchBeforeTimestamp;
		}
	}
}

/// EIP-712 signing domain of the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeDomain {
	pub name: String,
	pub version: String,
	pub chain_id: u64,
	pub verifying_contract: Address,
}

impl Default for ExchangeDomain {
	fn default() -> Self {
		Self {
			name: "Bazaar".to_string(),
			version: "1".to_string(),
			chain_id: 1,
			verifying_contract: Address::ZERO,
		}
	}
}

impl ExchangeDomain {
	pub fn to_eip712(&self) -> Eip712Domain {
		Eip712Domain::new(
			Some(Cow::Owned(self.name.clone())),
			Some(Cow::Owned(self.version.clone())),
			Some(U256::from(self.chain_id)),
			Some(self.verifying_contract),
			None,
		)
	}
}

impl From<&AssetType> for schema::AssetType {
	fn from(asset_type: &AssetType) -> Self {
		Self {
			assetClass: asset_type.asset_class,
			data: asset_type.data.clone(),
		}
	}
}

impl From<&Asset> for schema::Asset {
	fn from(asset: &Asset) -> Self {
		Self {
			assetType: (&asset.asset_type).into(),
			value: asset.value,
		}
	}
}

impl From<&Order> for schema::Order {
	fn from(order: &Order) -> Self {
		Self {
			maker: order.maker,
			makeAsset: (&order.make_asset).into(),
			taker: order.taker,
			takeAsset: (&order.take_asset).into(),
			salt: order.salt,
			start: U256::from(order.start),
			end: U256::from(order.end),
			dataType: order.data_type,
			data: order.data.clone(),
			collectionBid: order.collection_bid,
		}
	}
}

impl From<&MatchAllowance> for schema::MatchAllowance {
	fn from(allowance: &MatchAllowance) -> Self {
		Self {
			orderKeyHash: allowance.order_key_hash,
			matchBeforeTimestamp: U256::from(allowance.match_before_timestamp),
		}
	}
}

/// EIP-712 struct hash of an asset type
pub fn hash_asset_type(asset_type: &AssetType) -> B256 {
	schema::AssetType::from(asset_type).eip712_hash_struct()
}

/// Compute the fill-tracking key of an order
///
/// `keccak256(abi.encode(maker, hash(makeAssetType), taker, hash(takeAssetType), salt))`
pub fn hash_key(order: &Order) -> OrderKey {
	let encoded = (
		order.maker,
		hash_asset_type(&order.make_asset.asset_type),
		order.taker,
		hash_asset_type(&order.take_asset.asset_type),
		order.salt,
	)
		.abi_encode();
	keccak256(encoded)
}

/// EIP-712 struct hash of an order (covers every field)
pub fn order_struct_hash(order: &Order) -> B256 {
	schema::Order::from(order).eip712_hash_struct()
}

/// Digest the maker signs to authorize an order
pub fn order_signing_hash(order: &Order, domain: &ExchangeDomain) -> B256 {
	schema::Order::from(order).eip712_signing_hash(&domain.to_eip712())
}

/// Digest the matching authorizer signs to issue a match allowance
pub fn match_allowance_signing_hash(allowance: &MatchAllowance, domain: &ExchangeDomain) -> B256 {
	schema::MatchAllowance::from(allowance).eip712_signing_hash(&domain.to_eip712())
}
