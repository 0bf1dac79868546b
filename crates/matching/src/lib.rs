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

//! Bazaar Matching - Peer-to-peer order matching and settlement
//!
//! This crate matches two independently signed orders, sizes the trade
//! against their cumulative fills and settles it through the fee waterfall
//! in one atomic unit of work.
//!
//! Architecture:
//! - Authorization: maker signatures, match allowances, validity windows
//! - Fill engine: rounding-safe partial fills in take-asset units
//! - Fill store: the only state kept between calls, behind a narrow trait
//! - Exchange: staged fills, commit, transfer execution, events
//!
//! Each call is a serialized unit of work on `&mut Exchange`; there is no
//! internal scheduling.

pub mod auth;
pub mod config;
pub mod engine;
pub mod event;
pub mod fill;
pub mod fills;
pub mod logging;
pub mod types;

pub use auth::{
	AuthError, Authorizer, ContractSignatureVerifier, ContractWallets, EoaSignatureVerifier,
	MemoryContractWallets, NoContractWallets, SignatureVerifier, SignerKind,
};
pub use config::{ConfigError, DomainConfig, ExchangeConfig};
pub use engine::Exchange;
pub use event::{EventSink, ExchangeEvent, MemoryEventSink};
pub use fill::{FillError, FillResult, fill_order};
pub use fills::{FillChanges, FillStore, FillStoreError, MemoryFillStore, StagedFills, UndoLog};
pub use types::*;
