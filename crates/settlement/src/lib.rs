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

//! Bazaar Settlement - Fee waterfall for matched orders
//!
//! Given the amounts each side gives in a match, the waterfall decides which
//! side pays in money, splits that value into protocol fee, royalties and
//! payouts, adds origin fees on top, and delivers the other side's asset to
//! its payout recipients. The result is an ordered list of transfer legs that
//! a [`TransferExecutor`] carries out.
//!
//! Custody and transfer mechanics stay outside this crate.

pub mod config;
pub mod executor;
pub mod royalty;
pub mod waterfall;

pub use config::{SettlementConfig, SettlementConfigError};
pub use executor::{
	ExecutionError, RecordingExecutor, TransferDirection, TransferExecutor, TransferLeg,
	TransferType,
};
pub use royalty::{NoRoyalties, RoyaltyError, RoyaltyProvider, StaticRoyaltyRegistry};
pub use waterfall::{FeeSide, MatchSide, SettlementError, SettlementPlan, Waterfall, fee_side};
