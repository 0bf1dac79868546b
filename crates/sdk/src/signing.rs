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

use alloy_primitives::{Address, B256, Bytes, Signature};
use k256::ecdsa::SigningKey;

use crate::eip712::{ExchangeDomain, match_allowance_signing_hash, order_signing_hash};
use crate::types::{MatchAllowance, Order};

/// Length of an `r || s || v` signature
pub const SIGNATURE_LENGTH: usize = 65;

/// Error types for signing operations
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
	#[error("Signing error: {0}")]
	Signing(String),
	#[error("Signature format error: {0}")]
	Format(String),
	#[error("Recovery error: {0}")]
	Recovery(String),
}

/// Address controlled by a secp256k1 key
pub fn address_of(key: &SigningKey) -> Address {
	Address::from_public_key(key.verifying_key())
}

/// Sign a 32-byte digest, producing a 65-byte `r || s || v` signature
/// with `v` in `{27, 28}`
pub fn sign_digest(digest: &B256, key: &SigningKey) -> Result<Bytes, SigningError> {
	let (signature, recovery_id) = key
		.sign_prehash_recoverable(digest.as_slice())
		.map_err(|e| SigningError::Signing(e.to_string()))?;

	let mut bytes = Vec::with_capacity(SIGNATURE_LENGTH);
	bytes.extend_from_slice(&signature.to_bytes());
	bytes.push(27 + recovery_id.to_byte());
	Ok(bytes.into())
}

/// Sign an order as its maker
pub fn sign_order(
	order: &Order,
	domain: &ExchangeDomain,
	key: &SigningKey,
) -> Result<Bytes, SigningError> {
	sign_digest(&order_signing_hash(order, domain), key)
}

/// Sign a match allowance as the matching authorizer
pub fn sign_match_allowance(
	allowance: &MatchAllowance,
	domain: &ExchangeDomain,
	key: &SigningKey,
) -> Result<Bytes, SigningError> {
	sign_digest(&match_allowance_signing_hash(allowance, domain), key)
}

/// Recover the address that produced `signature` over `digest`
pub fn recover_signer(digest: &B256, signature: &[u8]) -> Result<Address, SigningError> {
	if signature.len() != SIGNATURE_LENGTH {
		return Err(SigningError::Format(format!(
			"expected {} bytes, got {}",
			SIGNATURE_LENGTH,
			signature.len()
		)));
	}

	let signature =
		Signature::try_from(signature).map_err(|e| SigningError::Format(e.to_string()))?;
	signature
		.recover_address_from_prehash(digest)
		.map_err(|e| SigningError::Recovery(e.to_string()))
}
