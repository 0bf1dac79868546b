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

//! Order authorization
//!
//! Every order of a match is checked independently against the acting
//! party (`sender`) and the caller-supplied time.
//!
//! # Checks
//!
//! 1. **Authenticity**: an order submitted by its own maker needs no
//!    signature. Any other submitter must present the maker's signature over
//!    the order's typed-data digest. Orders with a zero salt can only be
//!    submitted by their maker.
//! 2. **Match allowance**: unless the sender is the maker, the matching
//!    authorizer must have signed a `MatchAllowance` for the order key with
//!    a deadline that has not passed.
//! 3. **Validity window**: `start <= now <= end`, zero meaning unbounded.
//!
//! # Signers
//!
//! An address with code is a contract wallet and validates signatures
//! itself through [`ContractWallets`]; any other address is an externally
//! owned account whose signature is checked by recovery. The
//! [`SignatureVerifier`] is chosen per signer.

use std::collections::HashMap;

use alloy_primitives::{Address, B256};
use bazaar_sdk::{
	ExchangeDomain, MatchAllowance, hash_key, match_allowance_signing_hash, order_signing_hash,
	recover_signer,
};
use thiserror::Error;
use tracing::debug;

use crate::types::{CallContext, ErrorKind, MatchSubmission};

/// Error types for order authorization
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
	#[error("Invalid order signature for externally owned signer {0}")]
	InvalidEoaSignature(Address),
	#[error("Invalid order signature for contract signer {0}")]
	InvalidContractSignature(Address),
	#[error("Order with zero salt must be submitted by its maker {0}")]
	ZeroSaltNotMaker(Address),
	#[error("Match allowance missing for order {0}")]
	MissingAllowance(B256),
	#[error("Match allowance for order {0} not signed by the matching authorizer")]
	AllowanceSignerMismatch(B256),
	#[error("Match allowance expired at {deadline}, now {now}")]
	AllowanceExpired { deadline: u64, now: u64 },
	#[error("Order not valid before {start}, now {now}")]
	OrderNotStarted { start: u64, now: u64 },
	#[error("Order expired at {end}, now {now}")]
	OrderExpired { end: u64, now: u64 },
}

impl AuthError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			AuthError::InvalidEoaSignature(_)
			| AuthError::InvalidContractSignature(_)
			| AuthError::ZeroSaltNotMaker(_) => ErrorKind::Authenticity,
			AuthError::MissingAllowance(_) | AuthError::AllowanceSignerMismatch(_) => {
				ErrorKind::Authorization
			}
			AuthError::AllowanceExpired { .. }
			| AuthError::OrderNotStarted { .. }
			| AuthError::OrderExpired { .. } => ErrorKind::Temporal,
		}
	}
}

/// Kind of signer a verifier handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerKind {
	ExternallyOwned,
	Contract,
}

/// Capability deciding whether `signature` over `digest` was made by `signer`
pub trait SignatureVerifier {
	fn kind(&self) -> SignerKind;

	fn verify(&self, signer: Address, digest: &B256, signature: &[u8]) -> bool;
}

/// Verifies secp256k1 signatures by recovering the signer address
#[derive(Debug, Default, Clone, Copy)]
pub struct EoaSignatureVerifier;

impl SignatureVerifier for EoaSignatureVerifier {
	fn kind(&self) -> SignerKind {
		SignerKind::ExternallyOwned
	}

	fn verify(&self, signer: Address, digest: &B256, signature: &[u8]) -> bool {
		match recover_signer(digest, signature) {
			Ok(recovered) => !signer.is_zero() && recovered == signer,
			Err(e) => {
				debug!(signer = %signer, "Signature recovery failed: {}", e);
				false
			}
		}
	}
}

/// Delegates validation to the signing contract
pub struct ContractSignatureVerifier<'a, W: ?Sized> {
	wallets: &'a W,
}

impl<'a, W: ContractWallets + ?Sized> ContractSignatureVerifier<'a, W> {
	pub fn new(wallets: &'a W) -> Self {
		Self { wallets }
	}
}

impl<W: ContractWallets + ?Sized> SignatureVerifier for ContractSignatureVerifier<'_, W> {
	fn kind(&self) -> SignerKind {
		SignerKind::Contract
	}

	fn verify(&self, signer: Address, digest: &B256, signature: &[u8]) -> bool {
		self.wallets.is_valid_signature(signer, digest, signature)
	}
}

/// Contract wallet capability
pub trait ContractWallets {
	/// Whether `account` is a contract
	fn has_code(&self, account: Address) -> bool;

	/// The contract's own verdict on `signature` over `digest`
	fn is_valid_signature(&self, wallet: Address, digest: &B256, signature: &[u8]) -> bool;
}

/// Environment without contract wallets
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContractWallets;

impl ContractWallets for NoContractWallets {
	fn has_code(&self, _account: Address) -> bool {
		false
	}

	fn is_valid_signature(&self, _wallet: Address, _digest: &B256, _signature: &[u8]) -> bool {
		false
	}
}

/// Contract wallets owned by externally owned accounts
///
/// A wallet accepts a signature when it recovers to the wallet's owner.
#[derive(Debug, Default, Clone)]
pub struct MemoryContractWallets {
	owners: HashMap<Address, Address>,
}

impl MemoryContractWallets {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn deploy(&mut self, wallet: Address, owner: Address) {
		self.owners.insert(wallet, owner);
	}
}

impl ContractWallets for MemoryContractWallets {
	fn has_code(&self, account: Address) -> bool {
		self.owners.contains_key(&account)
	}

	fn is_valid_signature(&self, wallet: Address, digest: &B256, signature: &[u8]) -> bool {
		self.owners
			.get(&wallet)
			.is_some_and(|owner| EoaSignatureVerifier.verify(*owner, digest, signature))
	}
}

/// Verdict of a signature check
enum Rejection {
	Eoa,
	Contract,
}

/// Per-order authorization verifier
pub struct Authorizer<'a, W: ?Sized> {
	domain: &'a ExchangeDomain,
	matching_authorizer: Address,
	wallets: &'a W,
}

impl<'a, W: ContractWallets + ?Sized> Authorizer<'a, W> {
	pub fn new(domain: &'a ExchangeDomain, matching_authorizer: Address, wallets: &'a W) -> Self {
		Self {
			domain,
			matching_authorizer,
			wallets,
		}
	}

	/// Verify one submitted order
	pub fn authorize(
		&self,
		ctx: &CallContext,
		submission: &MatchSubmission,
	) -> Result<(), AuthError> {
		let order = &submission.order;
		let sent_by_maker = ctx.sender == order.maker;

		if order.salt.is_zero() && !sent_by_maker {
			return Err(AuthError::ZeroSaltNotMaker(order.maker));
		}

		if !sent_by_maker {
			let digest = order_signing_hash(order, self.domain);
			self.check_signature(order.maker, &digest, &submission.signature)
				.map_err(|rejection| match rejection {
					Rejection::Eoa => AuthError::InvalidEoaSignature(order.maker),
					Rejection::Contract => AuthError::InvalidContractSignature(order.maker),
				})?;

			self.check_allowance(ctx, submission)?;
		}

		if order.start != 0 && ctx.now < order.start {
			return Err(AuthError::OrderNotStarted {
				start: order.start,
				now: ctx.now,
			});
		}
		if order.end != 0 && ctx.now > order.end {
			return Err(AuthError::OrderExpired {
				end: order.end,
				now: ctx.now,
			});
		}

		debug!(maker = %order.maker, sent_by_maker, "Order authorized");
		Ok(())
	}

	fn check_allowance(
		&self,
		ctx: &CallContext,
		submission: &MatchSubmission,
	) -> Result<(), AuthError> {
		let key = hash_key(&submission.order);
		if submission.allowance_signature.is_empty() {
			return Err(AuthError::MissingAllowance(key));
		}

		let allowance = MatchAllowance {
			order_key_hash: key,
			match_before_timestamp: submission.match_before_timestamp,
		};
		let digest = match_allowance_signing_hash(&allowance, self.domain);
		self.check_signature(
			self.matching_authorizer,
			&digest,
			&submission.allowance_signature,
		)
		.map_err(|_| AuthError::AllowanceSignerMismatch(key))?;

		if ctx.now > allowance.match_before_timestamp {
			return Err(AuthError::AllowanceExpired {
				deadline: allowance.match_before_timestamp,
				now: ctx.now,
			});
		}
		Ok(())
	}

	fn check_signature(
		&self,
		signer: Address,
		digest: &B256,
		signature: &[u8],
	) -> Result<(), Rejection> {
		let contract = ContractSignatureVerifier::new(self.wallets);
		let verifier: &dyn SignatureVerifier = if self.wallets.has_code(signer) {
			&contract
		} else {
			&EoaSignatureVerifier
		};

		if verifier.verify(signer, digest, signature) {
			return Ok(());
		}
		Err(match verifier.kind() {
			SignerKind::ExternallyOwned => Rejection::Eoa,
			SignerKind::Contract => Rejection::Contract,
		})
	}
}
