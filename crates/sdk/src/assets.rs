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

//! Asset classes and asset-type compatibility

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;
use thiserror::Error;

use crate::types::{AssetClass, AssetType};

/// Known asset class discriminators, each `bytes4(keccak256(name))`
pub mod asset_class {
	use alloy_primitives::FixedBytes;

	use crate::types::AssetClass;

	/// Native currency, `keccak256("ETH")`
	pub const ETH: AssetClass = FixedBytes::new([0xaa, 0xae, 0xbe, 0xba]);
	/// Wrapped native currency, `keccak256("WETH_UNWRAP")`
	pub const WETH_UNWRAP: AssetClass = FixedBytes::new([0xb0, 0x32, 0x73, 0x9d]);
	/// Fungible token, `keccak256("ERC20")`
	pub const ERC20: AssetClass = FixedBytes::new([0x8a, 0xe8, 0x5d, 0x84]);
	/// Non-fungible token, `keccak256("ERC721")`
	pub const ERC721: AssetClass = FixedBytes::new([0x73, 0xad, 0x21, 0x46]);
	/// Semi-fungible token, `keccak256("ERC1155")`
	pub const ERC1155: AssetClass = FixedBytes::new([0x97, 0x3b, 0xb6, 0x40]);
}

/// Error types for asset data decoding
#[derive(Debug, Error)]
pub enum AssetError {
	#[error("Malformed asset data for class 0x{class}: {reason}")]
	MalformedData { class: String, reason: String },
}

/// Size of one ABI word
const WORD: usize = 32;

impl AssetType {
	pub fn native() -> Self {
		Self {
			asset_class: asset_class::ETH,
			data: Bytes::new(),
		}
	}

	pub fn wrapped_native(token: Address) -> Self {
		Self::contract_level(asset_class::WETH_UNWRAP, token)
	}

	pub fn erc20(token: Address) -> Self {
		Self::contract_level(asset_class::ERC20, token)
	}

	pub fn erc721(token: Address, token_id: U256) -> Self {
		Self::token_level(asset_class::ERC721, token, token_id)
	}

	pub fn erc1155(token: Address, token_id: U256) -> Self {
		Self::token_level(asset_class::ERC1155, token, token_id)
	}

	/// Any token of an ERC721 collection, for use in collection bids
	pub fn erc721_collection(token: Address) -> Self {
		Self::contract_level(asset_class::ERC721, token)
	}

	/// Any token of an ERC1155 collection, for use in collection bids
	pub fn erc1155_collection(token: Address) -> Self {
		Self::contract_level(asset_class::ERC1155, token)
	}

	fn contract_level(asset_class: AssetClass, token: Address) -> Self {
		Self {
			asset_class,
			data: token.abi_encode().into(),
		}
	}

	fn token_level(asset_class: AssetClass, token: Address, token_id: U256) -> Self {
		Self {
			asset_class,
			data: (token, token_id).abi_encode().into(),
		}
	}

	pub fn is_native(&self) -> bool {
		self.asset_class == asset_class::ETH
	}

	/// Whether a unit of this asset is indivisible and unique
	pub fn is_non_fungible(&self) -> bool {
		self.asset_class == asset_class::ERC721
	}

	/// Whether this type references a whole collection rather than one token
	pub fn is_collection(&self) -> bool {
		is_token_class(&self.asset_class) && self.data.len() == WORD
	}

	/// Token contract referenced by this type (`None` for native currency)
	pub fn token_contract(&self) -> Result<Option<Address>, AssetError> {
		if self.is_native() {
			return Ok(None);
		}
		if self.data.len() < WORD {
			return Err(self.malformed(format!(
				"expected at least one word, got {} bytes",
				self.data.len()
			)));
		}
		let word = &self.data[..WORD];
		if word[..12].iter().any(|b| *b != 0) {
			return Err(self.malformed("address word has dirty high bytes".to_string()));
		}
		Ok(Some(Address::from_slice(&word[12..])))
	}

	/// Token id referenced by this type, for token-level ERC721/ERC1155 types
	pub fn token_id(&self) -> Option<U256> {
		if !is_token_class(&self.asset_class) || self.data.len() != 2 * WORD {
			return None;
		}
		Some(U256::from_be_slice(&self.data[WORD..]))
	}

	fn malformed(&self, reason: String) -> AssetError {
		AssetError::MalformedData {
			class: hex::encode(self.asset_class),
			reason,
		}
	}
}

fn is_token_class(class: &AssetClass) -> bool {
	*class == asset_class::ERC721 || *class == asset_class::ERC1155
}

/// Check whether two asset types denote the same asset
///
/// The class must be equal and, for token classes, the data (contract and
/// token id) must be equal too.
pub fn assets_compatible(a: &AssetType, b: &AssetType) -> bool {
	a.asset_class == b.asset_class && a.data == b.data
}

/// Resolve the concrete asset type exchanged when one order's make asset
/// meets the counter order's take asset
///
/// A collection bid's take asset matches any token of its collection, in
/// which case the concrete (make-side) type is the one that settles.
/// Returns `None` when the two types don't cross-match.
pub fn match_assets(
	make: &AssetType,
	counter_take: &AssetType,
	counter_collection_bid: bool,
) -> Option<AssetType> {
	if assets_compatible(make, counter_take) {
		return Some(make.clone());
	}

	if counter_collection_bid
		&& counter_take.is_collection()
		&& make.asset_class == counter_take.asset_class
		&& make.token_id().is_some()
		&& make.data[..WORD] == counter_take.data[..]
	{
		return Some(make.clone());
	}

	None
}
