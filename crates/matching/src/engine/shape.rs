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

use alloy_primitives::Bytes;
use bazaar_sdk::Order;

use crate::types::{MatchSubmission, ShapeError};

/// Check a flattened batch and zip it into submissions
///
/// `orders` holds `(left, right)` pairs back to back; the other sequences
/// run parallel to it.
pub(crate) fn into_submissions(
	orders: Vec<Order>,
	signatures: Vec<Bytes>,
	match_before_timestamps: Vec<u64>,
	allowance_signatures: Vec<Bytes>,
) -> Result<Vec<MatchSubmission>, ShapeError> {
	let expected = orders.len();
	if expected % 2 != 0 {
		return Err(ShapeError::OddOrderCount(expected));
	}

	for (sequence, actual) in [
		("signatures", signatures.len()),
		("match_before_timestamps", match_before_timestamps.len()),
		("allowance_signatures", allowance_signatures.len()),
	] {
		if actual != expected {
			return Err(ShapeError::LengthMismatch {
				sequence,
				expected,
				actual,
			});
		}
	}

	Ok(orders
		.into_iter()
		.zip(signatures)
		.zip(match_before_timestamps)
		.zip(allowance_signatures)
		.map(
			|(((order, signature), match_before_timestamp), allowance_signature)| MatchSubmission {
				order,
				signature,
				match_before_timestamp,
				allowance_signature,
			},
		)
		.collect())
}
