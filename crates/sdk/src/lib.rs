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

//! Bazaar SDK - Order and asset model for the exchange
//!
//! This crate provides the value types both counterparties and the
//! settlement engine agree on, the canonical hashes of those types, and
//! signing utilities.
//!
//! The SDK is designed to be lightweight and embeddable:
//! - No background threads
//! - No runtime initialization
//! - No environment or configuration loading
//!
//! Everything that is signed or hashed here must be reproducible off-system
//! from the same encoding rules, so an external party can pre-compute an
//! order key or a typed-data digest.

pub mod assets;
pub mod eip712;
pub mod order_data;
pub mod signing;
pub mod types;

pub use assets::{AssetError, asset_class, assets_compatible, match_assets};
pub use eip712::{
	ExchangeDomain, hash_asset_type, hash_key, match_allowance_signing_hash, order_signing_hash,
	order_struct_hash,
};
pub use order_data::{OrderData, OrderDataError, data_type};
pub use signing::{
	SigningError, address_of, recover_signer, sign_digest, sign_match_allowance, sign_order,
};
pub use types::*;
