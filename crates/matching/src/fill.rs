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

//! Fill engine
//!
//! Computes how much of each order a match consumes. Fills are measured in
//! units of the order's take asset. The order whose remaining size binds is
//! driven to full fill at its own price; the counter order must accept at
//! least that rate.

use alloy_primitives::U256;
use bazaar_sdk::Order;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Error types for fill computation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FillError {
	#[error("Division by zero: order with a zero make or take value")]
	DivisionByZero,
	#[error("Unable to fill: match would transfer nothing")]
	UnableToFill,
	#[error("Rate mismatch: {side} order demands {demanded}, only {available} available")]
	RateMismatch {
		side: &'static str,
		demanded: U256,
		available: U256,
	},
	#[error("Rounding error exceeds 0.1%")]
	RoundingError,
	#[error("Arithmetic overflow")]
	Overflow,
}

/// Amounts exchanged by one match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillResult {
	/// What the left maker gives, in left make-asset units
	pub left_value: U256,
	/// What the right maker gives, in right make-asset units
	pub right_value: U256,
}

impl FillResult {
	/// Cumulative fills after this match, in each order's take units
	pub fn apply(&self, left_fill: U256, right_fill: U256) -> Result<(U256, U256), FillError> {
		let new_left = left_fill
			.checked_add(self.right_value)
			.ok_or(FillError::Overflow)?;
		let new_right = right_fill
			.checked_add(self.left_value)
			.ok_or(FillError::Overflow)?;
		Ok((new_left, new_right))
	}
}

/// Compute the amounts of a match between `left` and `right`
///
/// `left_fill` and `right_fill` are the cumulative fills recorded so far.
pub fn fill_order(
	left: &Order,
	right: &Order,
	left_fill: U256,
	right_fill: U256,
) -> Result<FillResult, FillError> {
	for value in [
		left.make_asset.value,
		left.take_asset.value,
		right.make_asset.value,
		right.take_asset.value,
	] {
		if value.is_zero() {
			return Err(FillError::DivisionByZero);
		}
	}

	let (left_make, left_take) = remaining(left, left_fill)?;
	let (right_make, right_take) = remaining(right, right_fill)?;

	let result = if right_take > left_make {
		fill_left(
			left_make,
			left_take,
			right.make_asset.value,
			right.take_asset.value,
		)?
	} else {
		fill_right(
			left.make_asset.value,
			left.take_asset.value,
			right_make,
			right_take,
		)?
	};

	if result.left_value.is_zero() || result.right_value.is_zero() {
		return Err(FillError::UnableToFill);
	}

	debug!(
		left_value = %result.left_value,
		right_value = %result.right_value,
		"Fill computed"
	);
	Ok(result)
}

/// Remaining `(make, take)` of an order with `fill` already consumed
fn remaining(order: &Order, fill: U256) -> Result<(U256, U256), FillError> {
	let take = order
		.take_asset
		.value
		.checked_sub(fill)
		.ok_or(FillError::Overflow)?;
	let make = partial_amount_floor(order.make_asset.value, order.take_asset.value, take)?;
	Ok((make, take))
}

/// Left order binds: it is filled completely
fn fill_left(
	left_make: U256,
	left_take: U256,
	right_make: U256,
	right_take: U256,
) -> Result<FillResult, FillError> {
	let demanded = partial_amount_floor(left_take, right_make, right_take)?;
	if demanded > left_make {
		return Err(FillError::RateMismatch {
			side: "right",
			demanded,
			available: left_make,
		});
	}
	Ok(FillResult {
		left_value: left_make,
		right_value: left_take,
	})
}

/// Right order binds: it is filled completely
fn fill_right(
	left_make: U256,
	left_take: U256,
	right_make: U256,
	right_take: U256,
) -> Result<FillResult, FillError> {
	let demanded = partial_amount_floor(right_take, left_make, left_take)?;
	if demanded > right_make {
		return Err(FillError::RateMismatch {
			side: "left",
			demanded,
			available: right_make,
		});
	}
	Ok(FillResult {
		left_value: right_take,
		right_value: demanded,
	})
}

/// `floor(numerator * target / denominator)`, rejecting results whose
/// rounding error is 0.1% or more
pub fn partial_amount_floor(
	numerator: U256,
	denominator: U256,
	target: U256,
) -> Result<U256, FillError> {
	if is_rounding_error_floor(numerator, denominator, target)? {
		return Err(FillError::RoundingError);
	}
	let product = numerator.checked_mul(target).ok_or(FillError::Overflow)?;
	Ok(product / denominator)
}

fn is_rounding_error_floor(
	numerator: U256,
	denominator: U256,
	target: U256,
) -> Result<bool, FillError> {
	if denominator.is_zero() {
		return Err(FillError::DivisionByZero);
	}
	if numerator.is_zero() || target.is_zero() {
		return Ok(false);
	}

	let remainder = target.mul_mod(numerator, denominator);
	let scaled = remainder
		.checked_mul(U256::from(1000))
		.ok_or(FillError::Overflow)?;
	let product = numerator.checked_mul(target).ok_or(FillError::Overflow)?;
	Ok(scaled >= product)
}
