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

mod shape;

use alloy_primitives::{Bytes, U256};
use bazaar_sdk::{Asset, ExchangeDomain, Order, OrderData, OrderKey, match_assets};
use bazaar_settlement::{
	MatchSide, NoRoyalties, RoyaltyProvider, TransferExecutor, TransferLeg, Waterfall,
};
use tracing::{debug, info, warn};

use crate::{
	auth::{Authorizer, ContractWallets, NoContractWallets},
	config::{ConfigError, ExchangeConfig},
	event::{EventSink, ExchangeEvent},
	fill::fill_order,
	fills::{FillChanges, FillStore, StagedFills},
	types::{CallContext, MatchError, MatchOutcome, MatchSubmission},
};

/// The exchange: matches signed orders and settles them atomically
///
/// Every call is one unit of work:
/// 1. each pair is authorized, sized and planned against a staged overlay
///    of fills, later pairs seeing the fills of earlier ones
/// 2. the staged fills are committed
/// 3. the transfer executor receives every leg of the unit
/// 4. events are emitted
///
/// A failure before step 2 leaves nothing behind. A failure in step 3
/// restores the previous fills. Events only describe executed work.
pub struct Exchange<F, X, E> {
	config: ExchangeConfig,
	domain: ExchangeDomain,
	fills: F,
	executor: X,
	events: E,
	royalties: Box<dyn RoyaltyProvider>,
	wallets: Box<dyn ContractWallets>,
}

impl<F: FillStore, X: TransferExecutor, E: EventSink> Exchange<F, X, E> {
	/// Create an exchange without royalties or contract wallets
	pub fn new(
		config: ExchangeConfig,
		fills: F,
		executor: X,
		events: E,
	) -> Result<Self, ConfigError> {
		config.validate()?;
		let domain = config.domain.to_domain();

		Ok(Self {
			config,
			domain,
			fills,
			executor,
			events,
			royalties: Box::new(NoRoyalties),
			wallets: Box::new(NoContractWallets),
		})
	}

	pub fn with_royalties(mut self, royalties: impl RoyaltyProvider + 'static) -> Self {
		self.royalties = Box::new(royalties);
		self
	}

	pub fn with_contract_wallets(mut self, wallets: impl ContractWallets + 'static) -> Self {
		self.wallets = Box::new(wallets);
		self
	}

	pub fn config(&self) -> &ExchangeConfig {
		&self.config
	}

	pub fn domain(&self) -> &ExchangeDomain {
		&self.domain
	}

	pub fn fills(&self) -> &F {
		&self.fills
	}

	pub fn executor(&self) -> &X {
		&self.executor
	}

	pub fn events(&self) -> &E {
		&self.events
	}

	pub fn events_mut(&mut self) -> &mut E {
		&mut self.events
	}

	/// Cumulative fill recorded for an order key, in take-asset units
	pub fn get_order_fill(&self, order_key_hash: &OrderKey) -> U256 {
		self.fills.get(order_key_hash)
	}

	/// Match and settle one pair of orders
	pub fn match_orders(
		&mut self,
		ctx: &CallContext,
		left: MatchSubmission,
		right: MatchSubmission,
	) -> Result<MatchOutcome, MatchError> {
		let mut staged = StagedFills::new(&self.fills);
		let outcome = self.stage_pair(ctx, &mut staged, &left, &right)?;
		let changes = staged.into_changes();

		self.finalize(changes, std::slice::from_ref(&outcome))?;
		info!(
			left = %outcome.left_hash,
			right = %outcome.right_hash,
			legs = outcome.legs.len(),
			"Match settled"
		);
		Ok(outcome)
	}

	/// Match and settle several pairs atomically
	///
	/// `orders` holds `(left, right)` pairs back to back; `signatures`,
	/// `match_before_timestamps` and `allowance_signatures` run parallel to
	/// it. Shape is checked before any pair runs. Either every pair settles
	/// or none does.
	pub fn batch_match_orders(
		&mut self,
		ctx: &CallContext,
		orders: Vec<Order>,
		signatures: Vec<Bytes>,
		match_before_timestamps: Vec<u64>,
		allowance_signatures: Vec<Bytes>,
	) -> Result<Vec<MatchOutcome>, MatchError> {
		let submissions = shape::into_submissions(
			orders,
			signatures,
			match_before_timestamps,
			allowance_signatures,
		)
		.inspect_err(|e| warn!("Batch rejected: {}", e))?;

		if submissions.is_empty() {
			debug!("Empty batch");
			return Ok(Vec::new());
		}

		let mut staged = StagedFills::new(&self.fills);
		let mut outcomes = Vec::with_capacity(submissions.len() / 2);
		for (index, pair) in submissions.chunks_exact(2).enumerate() {
			let outcome = self
				.stage_pair(ctx, &mut staged, &pair[0], &pair[1])
				.inspect_err(|e| {
					warn!(pair = index, kind = ?e.kind(), "Batch rejected: {}", e)
				})?;
			outcomes.push(outcome);
		}
		let changes = staged.into_changes();

		self.finalize(changes, &outcomes)?;
		info!(
			pairs = outcomes.len(),
			legs = outcomes.iter().map(|o| o.legs.len()).sum::<usize>(),
			"Batch settled"
		);
		Ok(outcomes)
	}

	/// Authorize, size and plan one pair against the staged fills
	fn stage_pair(
		&self,
		ctx: &CallContext,
		staged: &mut StagedFills<'_, F>,
		left: &MatchSubmission,
		right: &MatchSubmission,
	) -> Result<MatchOutcome, MatchError> {
		let authorizer = Authorizer::new(
			&self.domain,
			self.config.matching_authorizer,
			self.wallets.as_ref(),
		);
		authorizer.authorize(ctx, left)?;
		authorizer.authorize(ctx, right)?;

		let (left, right) = (&left.order, &right.order);
		check_taker(left, right)?;
		check_taker(right, left)?;

		let left_gives = match_assets(
			&left.make_asset.asset_type,
			&right.take_asset.asset_type,
			right.collection_bid,
		)
		.ok_or(MatchError::AssetMismatch(
			"left make asset does not match right take asset",
		))?;
		let right_gives = match_assets(
			&right.make_asset.asset_type,
			&left.take_asset.asset_type,
			left.collection_bid,
		)
		.ok_or(MatchError::AssetMismatch(
			"right make asset does not match left take asset",
		))?;

		let left_data = OrderData::parse(left)?;
		let right_data = OrderData::parse(right)?;

		let left_key = left.key();
		let right_key = right.key();
		let left_fill = recorded_fill(staged, left, &left_key);
		let right_fill = recorded_fill(staged, right, &right_key);

		let fill = fill_order(left, right, left_fill, right_fill)?;
		let (new_left_fill, new_right_fill) = fill.apply(left_fill, right_fill)?;

		let plan = Waterfall::new(&self.config.settlement, self.royalties.as_ref()).plan(
			&MatchSide {
				maker: left.maker,
				gives: Asset::new(left_gives, fill.left_value),
				data: &left_data,
			},
			&MatchSide {
				maker: right.maker,
				gives: Asset::new(right_gives, fill.right_value),
				data: &right_data,
			},
		)?;

		// Immediate orders have no fill record
		if !left.salt.is_zero() {
			staged.set(left_key, new_left_fill)?;
		}
		if !right.salt.is_zero() {
			staged.set(right_key, new_right_fill)?;
		}

		debug!(
			left = %left_key,
			right = %right_key,
			new_left_fill = %new_left_fill,
			new_right_fill = %new_right_fill,
			"Pair staged"
		);

		Ok(MatchOutcome {
			left_hash: left_key,
			right_hash: right_key,
			left_maker: left.maker,
			right_maker: right.maker,
			new_left_fill,
			new_right_fill,
			fill,
			fee_side: plan.fee_side,
			legs: plan.legs,
		})
	}

	/// Commit staged fills, execute transfers and emit events
	fn finalize(&mut self, changes: FillChanges, outcomes: &[MatchOutcome]) -> Result<(), MatchError> {
		let undo = changes.commit(&mut self.fills)?;

		let legs: Vec<TransferLeg> = outcomes
			.iter()
			.flat_map(|outcome| outcome.legs.iter().cloned())
			.collect();
		if let Err(e) = self.executor.execute(&legs) {
			warn!(fills = undo.len(), "Transfer execution failed, rolling back: {}", e);
			undo.rollback(&mut self.fills)?;
			return Err(e.into());
		}

		for outcome in outcomes {
			for event in ExchangeEvent::for_outcome(outcome) {
				self.events.emit(event);
			}
		}
		Ok(())
	}
}

/// An order reserved for a taker only matches that taker's orders
fn check_taker(order: &Order, counter: &Order) -> Result<(), MatchError> {
	if !order.taker.is_zero() && order.taker != counter.maker {
		return Err(MatchError::TakerMismatch {
			expected: order.taker,
			actual: counter.maker,
		});
	}
	Ok(())
}

/// Zero-salt orders always start from an empty fill
fn recorded_fill<S: FillStore + ?Sized>(store: &S, order: &Order, key: &OrderKey) -> U256 {
	if order.salt.is_zero() {
		return U256::ZERO;
	}
	store.get(key)
}
