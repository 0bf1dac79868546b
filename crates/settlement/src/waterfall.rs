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

//! Fee waterfall
//!
//! The fee-side value `V` is split in this order, every share computed on
//! the full `V`:
//!
//! 1. protocol fee to the fee receiver
//! 2. royalties of the traded asset
//! 3. the remaining pool to the receiving order's payouts, the last payout
//!    recipient taking the exact remainder
//! 4. origin fees of the paying order, then of the counter order, paid on
//!    top of `V`
//!
//! The other side's asset only goes through step 3.

use alloy_primitives::{Address, U256};
use bazaar_sdk::{Asset, AssetClass, AssetType, BPS_DENOMINATOR, OrderData, Part, asset_class};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::SettlementConfig;
use crate::executor::{TransferDirection, TransferLeg, TransferType};
use crate::royalty::{RoyaltyError, RoyaltyProvider};

/// Error types for settlement planning
#[derive(Debug, Error)]
pub enum SettlementError {
	#[error("Arithmetic overflow in settlement")]
	Overflow,
	#[error("Fees of {fees} exceed the traded value {value}")]
	FeesExceedValue { fees: U256, value: U256 },
	#[error("Order has no payout recipients")]
	NoPayouts,
	#[error("Royalty error: {0}")]
	Royalty(#[from] RoyaltyError),
}

/// Which order pays in money and therefore carries the fees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeeSide {
	Left,
	Right,
	/// Neither make asset is money-like; no fees are charged
	Neither,
}

/// Money-like classes, strongest first
const FEE_SIDE_PRIORITY: [AssetClass; 4] = [
	asset_class::ETH,
	asset_class::WETH_UNWRAP,
	asset_class::ERC20,
	asset_class::ERC1155,
];

/// Pick the fee side from the classes of the two make assets
pub fn fee_side(left_make: &AssetClass, right_make: &AssetClass) -> FeeSide {
	for class in FEE_SIDE_PRIORITY {
		if *left_make == class {
			return FeeSide::Left;
		}
		if *right_make == class {
			return FeeSide::Right;
		}
	}
	FeeSide::Neither
}

/// One side of a resolved match
#[derive(Debug, Clone)]
pub struct MatchSide<'a> {
	pub maker: Address,
	/// Concrete asset and amount this side's maker gives in the match
	pub gives: Asset,
	/// Decoded order data, defaults applied
	pub data: &'a OrderData,
}

/// Transfers of one match, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementPlan {
	pub fee_side: FeeSide,
	pub legs: Vec<TransferLeg>,
}

impl SettlementPlan {
	/// Total amount of `asset_type` leaving `account`
	pub fn outlay(&self, account: Address, asset_type: &AssetType) -> U256 {
		self.legs
			.iter()
			.filter(|leg| leg.from == account && leg.asset.asset_type == *asset_type)
			.fold(U256::ZERO, |acc, leg| acc.saturating_add(leg.asset.value))
	}
}

/// Settlement planner
pub struct Waterfall<'a, R: ?Sized> {
	config: &'a SettlementConfig,
	royalties: &'a R,
}

impl<'a, R: RoyaltyProvider + ?Sized> Waterfall<'a, R> {
	pub fn new(config: &'a SettlementConfig, royalties: &'a R) -> Self {
		Self { config, royalties }
	}

	/// Compute the transfer legs of a match
	pub fn plan(
		&self,
		left: &MatchSide<'_>,
		right: &MatchSide<'_>,
	) -> Result<SettlementPlan, SettlementError> {
		let side = fee_side(
			&left.gives.asset_type.asset_class,
			&right.gives.asset_type.asset_class,
		);

		let mut legs = Vec::new();
		match side {
			FeeSide::Left => {
				self.pay_with_fees(left, right, TransferDirection::ToTaker, &mut legs)?;
				pay_out(right, left, TransferDirection::ToMaker, &mut legs)?;
			}
			FeeSide::Right => {
				self.pay_with_fees(right, left, TransferDirection::ToMaker, &mut legs)?;
				pay_out(left, right, TransferDirection::ToTaker, &mut legs)?;
			}
			FeeSide::Neither => {
				pay_out(left, right, TransferDirection::ToTaker, &mut legs)?;
				pay_out(right, left, TransferDirection::ToMaker, &mut legs)?;
			}
		}

		debug!(fee_side = ?side, legs = legs.len(), "Settlement planned");
		Ok(SettlementPlan {
			fee_side: side,
			legs,
		})
	}

	fn pay_with_fees(
		&self,
		payer: &MatchSide<'_>,
		receiver: &MatchSide<'_>,
		direction: TransferDirection,
		legs: &mut Vec<TransferLeg>,
	) -> Result<(), SettlementError> {
		let value = payer.gives.value;
		let asset_type = &payer.gives.asset_type;
		let transfer = |to: Address, amount: U256, transfer_type: TransferType| Transfer {
			asset_type,
			amount,
			from: payer.maker,
			to,
			direction,
			transfer_type,
		};

		let protocol_fee = bps_of(value, self.config.protocol_fee_bps)?;
		push(
			legs,
			transfer(self.config.fee_receiver, protocol_fee, TransferType::Protocol),
		);

		let mut deducted = protocol_fee;
		for part in self.royalties.royalties(&receiver.gives.asset_type)? {
			let amount = bps_of(value, part.value)?;
			deducted = deducted
				.checked_add(amount)
				.ok_or(SettlementError::Overflow)?;
			push(legs, transfer(part.account, amount, TransferType::Royalty));
		}

		let pool = value
			.checked_sub(deducted)
			.ok_or(SettlementError::FeesExceedValue {
				fees: deducted,
				value,
			})?;
		for (account, amount) in split(pool, &receiver.data.payouts)? {
			push(legs, transfer(account, amount, TransferType::Payout));
		}

		let mut outlay = value;
		for part in payer
			.data
			.origin_fees
			.iter()
			.chain(receiver.data.origin_fees.iter())
		{
			let amount = bps_of(value, part.value)?;
			outlay = outlay.checked_add(amount).ok_or(SettlementError::Overflow)?;
			push(legs, transfer(part.account, amount, TransferType::Origin));
		}

		debug!(payer = %payer.maker, value = %value, outlay = %outlay, "Fee side settled");
		Ok(())
	}
}

/// Deliver `giver`'s asset to `receiver`'s payouts without fees
fn pay_out(
	giver: &MatchSide<'_>,
	receiver: &MatchSide<'_>,
	direction: TransferDirection,
	legs: &mut Vec<TransferLeg>,
) -> Result<(), SettlementError> {
	for (account, amount) in split(giver.gives.value, &receiver.data.payouts)? {
		push(
			legs,
			Transfer {
				asset_type: &giver.gives.asset_type,
				amount,
				from: giver.maker,
				to: account,
				direction,
				transfer_type: TransferType::Payout,
			},
		);
	}
	Ok(())
}

/// Split `amount` by payout shares; the last recipient gets the remainder
fn split(amount: U256, payouts: &[Part]) -> Result<Vec<(Address, U256)>, SettlementError> {
	let (last, rest) = payouts.split_last().ok_or(SettlementError::NoPayouts)?;

	let mut shares = Vec::with_capacity(payouts.len());
	let mut remaining = amount;
	for part in rest {
		let share = bps_of(amount, part.value)?;
		remaining = remaining
			.checked_sub(share)
			.ok_or(SettlementError::Overflow)?;
		shares.push((part.account, share));
	}
	shares.push((last.account, remaining));
	Ok(shares)
}

/// `floor(value * bps / 10000)`
fn bps_of(value: U256, bps: u64) -> Result<U256, SettlementError> {
	value
		.checked_mul(U256::from(bps))
		.map(|scaled| scaled / U256::from(BPS_DENOMINATOR))
		.ok_or(SettlementError::Overflow)
}

struct Transfer<'t> {
	asset_type: &'t AssetType,
	amount: U256,
	from: Address,
	to: Address,
	direction: TransferDirection,
	transfer_type: TransferType,
}

/// Zero-amount transfers are dropped
fn push(legs: &mut Vec<TransferLeg>, transfer: Transfer<'_>) {
	if transfer.amount.is_zero() {
		return;
	}
	legs.push(TransferLeg {
		asset: Asset::new(transfer.asset_type.clone(), transfer.amount),
		from: transfer.from,
		to: transfer.to,
		direction: transfer.direction,
		transfer_type: transfer.transfer_type,
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::royalty::{NoRoyalties, StaticRoyaltyRegistry};

	const ETHER: u128 = 1_000_000_000_000_000_000;

	fn seller() -> Address {
		Address::repeat_byte(0x51)
	}

	fn buyer() -> Address {
		Address::repeat_byte(0xb1)
	}

	fn fee_receiver() -> Address {
		Address::repeat_byte(0xfe)
	}

	fn collection() -> Address {
		Address::repeat_byte(0x0c)
	}

	fn nft() -> AssetType {
		AssetType::erc721(collection(), U256::from(1))
	}

	fn to_maker(maker: Address) -> OrderData {
		OrderData::new(vec![Part::new(maker, BPS_DENOMINATOR)], vec![])
	}

	fn royalty_registry() -> StaticRoyaltyRegistry {
		let mut registry = StaticRoyaltyRegistry::new();
		registry.set_contract_royalties(
			collection(),
			vec![
				Part::new(Address::repeat_byte(0xa1), 100),
				Part::new(Address::repeat_byte(0xa2), 50),
			],
		);
		registry
	}

	fn amounts(plan: &SettlementPlan, transfer_type: TransferType) -> Vec<(Address, U256)> {
		plan.legs
			.iter()
			.filter(|leg| leg.transfer_type == transfer_type)
			.map(|leg| (leg.to, leg.asset.value))
			.collect()
	}

	#[test]
	fn test_fee_side_priority() {
		use bazaar_sdk::asset_class::*;

		assert_eq!(fee_side(&ETH, &ERC20), FeeSide::Left);
		assert_eq!(fee_side(&ERC721, &ETH), FeeSide::Right);
		assert_eq!(fee_side(&ERC20, &WETH_UNWRAP), FeeSide::Right);
		assert_eq!(fee_side(&ERC20, &ERC20), FeeSide::Left);
		assert_eq!(fee_side(&ERC721, &ERC1155), FeeSide::Right);
		assert_eq!(fee_side(&ERC721, &ERC721), FeeSide::Neither);
	}

	#[test]
	fn test_protocol_royalty_payout_split() {
		let config = SettlementConfig::new(100, fee_receiver());
		let registry = royalty_registry();
		let waterfall = Waterfall::new(&config, &registry);

		let seller_data = to_maker(seller());
		let buyer_data = to_maker(buyer());
		let left = MatchSide {
			maker: seller(),
			gives: Asset::new(nft(), 1u64),
			data: &seller_data,
		};
		let right = MatchSide {
			maker: buyer(),
			gives: Asset::new(AssetType::native(), ETHER),
			data: &buyer_data,
		};

		let plan = waterfall.plan(&left, &right).unwrap();
		assert_eq!(plan.fee_side, FeeSide::Right);

		let kinds: Vec<_> = plan.legs.iter().map(|leg| leg.transfer_type).collect();
		assert_eq!(
			kinds,
			vec![
				TransferType::Protocol,
				TransferType::Royalty,
				TransferType::Royalty,
				TransferType::Payout,
				TransferType::Payout,
			]
		);

		assert_eq!(
			amounts(&plan, TransferType::Protocol),
			vec![(fee_receiver(), U256::from(ETHER / 100))]
		);
		assert_eq!(
			amounts(&plan, TransferType::Royalty),
			vec![
				(Address::repeat_byte(0xa1), U256::from(ETHER / 100)),
				(Address::repeat_byte(0xa2), U256::from(ETHER / 200)),
			]
		);

		let payouts = amounts(&plan, TransferType::Payout);
		assert_eq!(payouts[0], (seller(), U256::from(ETHER / 1000 * 975)));
		assert_eq!(payouts[1], (buyer(), U256::from(1)));

		assert_eq!(plan.outlay(buyer(), &AssetType::native()), U256::from(ETHER));
		assert!(
			plan.legs
				.iter()
				.filter(|leg| leg.from == buyer())
				.all(|leg| leg.direction == TransferDirection::ToMaker)
		);
		assert!(
			plan.legs
				.iter()
				.filter(|leg| leg.from == seller())
				.all(|leg| leg.direction == TransferDirection::ToTaker)
		);
	}

	#[test]
	fn test_origin_fees_are_charged_on_top() {
		let config = SettlementConfig::new(100, fee_receiver());
		let registry = royalty_registry();
		let waterfall = Waterfall::new(&config, &registry);

		let origin_a = Address::repeat_byte(0x0a);
		let origin_b = Address::repeat_byte(0x0b);
		let seller_data = OrderData::new(
			vec![Part::new(seller(), BPS_DENOMINATOR)],
			vec![Part::new(origin_b, 50)],
		);
		let buyer_data = OrderData::new(
			vec![Part::new(buyer(), BPS_DENOMINATOR)],
			vec![Part::new(origin_a, 100)],
		);

		let left = MatchSide {
			maker: seller(),
			gives: Asset::new(nft(), 1u64),
			data: &seller_data,
		};
		let right = MatchSide {
			maker: buyer(),
			gives: Asset::new(AssetType::native(), ETHER),
			data: &buyer_data,
		};

		let plan = waterfall.plan(&left, &right).unwrap();

		// Paying order's origins come first
		assert_eq!(
			amounts(&plan, TransferType::Origin),
			vec![
				(origin_a, U256::from(ETHER / 100)),
				(origin_b, U256::from(ETHER / 200)),
			]
		);
		assert_eq!(
			plan.outlay(buyer(), &AssetType::native()),
			U256::from(ETHER / 1000 * 1015)
		);
		assert_eq!(
			amounts(&plan, TransferType::Payout)[0],
			(seller(), U256::from(ETHER / 1000 * 975))
		);
		assert_eq!(
			amounts(&plan, TransferType::Protocol),
			vec![(fee_receiver(), U256::from(ETHER / 100))]
		);
	}

	#[test]
	fn test_indivisible_asset_goes_to_last_payout() {
		let config = SettlementConfig::default();
		let waterfall = Waterfall::new(&config, &NoRoyalties);

		let first = Address::repeat_byte(0x01);
		let second = Address::repeat_byte(0x02);
		let seller_data = to_maker(seller());
		let buyer_data = OrderData::new(
			vec![Part::new(first, 7_500), Part::new(second, 2_500)],
			vec![],
		);

		let left = MatchSide {
			maker: seller(),
			gives: Asset::new(nft(), 1u64),
			data: &seller_data,
		};
		let right = MatchSide {
			maker: buyer(),
			gives: Asset::new(AssetType::native(), 1_000u64),
			data: &buyer_data,
		};

		let plan = waterfall.plan(&left, &right).unwrap();
		let nft_legs: Vec<_> = plan
			.legs
			.iter()
			.filter(|leg| leg.asset.asset_type == nft())
			.collect();
		assert_eq!(nft_legs.len(), 1);
		assert_eq!(nft_legs[0].to, second);
		assert_eq!(nft_legs[0].asset.value, U256::from(1));
	}

	#[test]
	fn test_remainder_goes_to_last_payout() {
		let config = SettlementConfig::default();
		let waterfall = Waterfall::new(&config, &NoRoyalties);

		let first = Address::repeat_byte(0x01);
		let second = Address::repeat_byte(0x02);
		let seller_data = OrderData::new(
			vec![Part::new(first, 3_333), Part::new(second, 6_667)],
			vec![],
		);
		let buyer_data = to_maker(buyer());

		let left = MatchSide {
			maker: seller(),
			gives: Asset::new(nft(), 1u64),
			data: &seller_data,
		};
		let right = MatchSide {
			maker: buyer(),
			gives: Asset::new(AssetType::native(), 10u64),
			data: &buyer_data,
		};

		let plan = waterfall.plan(&left, &right).unwrap();
		assert_eq!(
			amounts(&plan, TransferType::Payout)[..2],
			[(first, U256::from(3)), (second, U256::from(7))]
		);
	}

	#[test]
	fn test_nft_swap_has_no_fees() {
		let config = SettlementConfig::new(100, fee_receiver());
		let registry = royalty_registry();
		let waterfall = Waterfall::new(&config, &registry);

		let other_nft = AssetType::erc721(Address::repeat_byte(0x0d), U256::from(2));
		let seller_data = to_maker(seller());
		let buyer_data = to_maker(buyer());
		let left = MatchSide {
			maker: seller(),
			gives: Asset::new(nft(), 1u64),
			data: &seller_data,
		};
		let right = MatchSide {
			maker: buyer(),
			gives: Asset::new(other_nft.clone(), 1u64),
			data: &buyer_data,
		};

		let plan = waterfall.plan(&left, &right).unwrap();
		assert_eq!(plan.fee_side, FeeSide::Neither);
		assert_eq!(plan.legs.len(), 2);
		assert!(
			plan.legs
				.iter()
				.all(|leg| leg.transfer_type == TransferType::Payout)
		);
		assert_eq!(plan.legs[0].to, buyer());
		assert_eq!(plan.legs[1].asset.asset_type, other_nft);
		assert_eq!(plan.legs[1].to, seller());
	}

	#[test]
	fn test_fees_exceeding_value_rejected() {
		let config = SettlementConfig::new(100, fee_receiver());
		let mut registry = StaticRoyaltyRegistry::new().with_max_total_bps(BPS_DENOMINATOR);
		registry.set_contract_royalties(
			collection(),
			vec![Part::new(Address::repeat_byte(0xa1), 9_950)],
		);
		let waterfall = Waterfall::new(&config, &registry);

		let seller_data = to_maker(seller());
		let buyer_data = to_maker(buyer());
		let left = MatchSide {
			maker: seller(),
			gives: Asset::new(nft(), 1u64),
			data: &seller_data,
		};
		let right = MatchSide {
			maker: buyer(),
			gives: Asset::new(AssetType::native(), 10_000u64),
			data: &buyer_data,
		};

		assert!(matches!(
			waterfall.plan(&left, &right),
			Err(SettlementError::FeesExceedValue { .. })
		));
	}

	#[test]
	fn test_royalty_failure_aborts() {
		let config = SettlementConfig::default();
		let mut registry = StaticRoyaltyRegistry::new().with_max_total_bps(100);
		registry.set_contract_royalties(
			collection(),
			vec![Part::new(Address::repeat_byte(0xa1), 200)],
		);
		let waterfall = Waterfall::new(&config, &registry);

		let seller_data = to_maker(seller());
		let buyer_data = to_maker(buyer());
		let left = MatchSide {
			maker: buyer(),
			gives: Asset::new(AssetType::native(), 100u64),
			data: &buyer_data,
		};
		let right = MatchSide {
			maker: seller(),
			gives: Asset::new(nft(), 1u64),
			data: &seller_data,
		};

		assert!(matches!(
			waterfall.plan(&left, &right),
			Err(SettlementError::Royalty(RoyaltyError::CapExceeded { .. }))
		));
	}
}
