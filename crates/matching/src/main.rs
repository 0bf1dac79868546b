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

//! Exchange command-line entry point
//!
//! Runs one batch file against in-memory collaborators:
//! - Memory fill store
//! - Recording transfer executor
//! - Static royalty registry (from the batch file)
//! - Memory event sink, printed to stdout as JSON lines

use std::{fs, path::PathBuf};

use alloy_primitives::{Address, U256};
use anyhow::{Context, Result};
use bazaar_matching::{
	CallContext, Exchange, ExchangeConfig, MatchSubmission, MemoryEventSink, MemoryFillStore,
};
use bazaar_sdk::Part;
use bazaar_settlement::{RecordingExecutor, StaticRoyaltyRegistry, royalty::DEFAULT_MAX_ROYALTY_BPS};
use clap::Parser;
use serde::Deserialize;
use tracing::info;

/// Bazaar exchange batch runner
#[derive(Debug, Parser)]
#[command(name = "bazaar-matching", version)]
struct Cli {
	/// Batch file (JSON) with the sender, the time and the order pairs
	#[arg(long)]
	batch: PathBuf,

	/// Exchange configuration file; environment variables are used otherwise
	#[arg(long)]
	config: Option<String>,

	/// Override the batch file's current time (unix seconds)
	#[arg(long)]
	now: Option<u64>,
}

/// Contents of a batch file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchFile {
	sender: Address,
	#[serde(default)]
	now: u64,
	pairs: Vec<PairEntry>,
	#[serde(default)]
	royalties: Vec<RoyaltyEntry>,
	#[serde(default)]
	max_royalty_bps: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PairEntry {
	left: MatchSubmission,
	right: MatchSubmission,
}

/// Royalty schedule of a token contract, or of one token when `tokenId` is set
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoyaltyEntry {
	token: Address,
	#[serde(default)]
	token_id: Option<U256>,
	parts: Vec<Part>,
}

fn load_config(path: Option<&str>) -> Result<ExchangeConfig> {
	match path {
		Some(path) => ExchangeConfig::from_file(path)
			.with_context(|| format!("Failed to load configuration from {}", path)),
		None => ExchangeConfig::from_env()
			.context("Failed to load configuration from environment"),
	}
}

fn royalty_registry(batch: &BatchFile) -> StaticRoyaltyRegistry {
	let mut registry = StaticRoyaltyRegistry::new()
		.with_max_total_bps(batch.max_royalty_bps.unwrap_or(DEFAULT_MAX_ROYALTY_BPS));
	for entry in &batch.royalties {
		match entry.token_id {
			Some(token_id) => {
				registry.set_token_royalties(entry.token, token_id, entry.parts.clone())
			}
			None => registry.set_contract_royalties(entry.token, entry.parts.clone()),
		}
	}
	registry
}

fn main() -> Result<()> {
	bazaar_matching::logging::init_logging()?;

	let cli = Cli::parse();
	let config = load_config(cli.config.as_deref())?;

	let raw = fs::read_to_string(&cli.batch)
		.with_context(|| format!("Failed to read batch file {}", cli.batch.display()))?;
	let batch: BatchFile = serde_json::from_str(&raw)
		.with_context(|| format!("Failed to parse batch file {}", cli.batch.display()))?;

	info!(target: "server", "Starting Bazaar exchange batch");
	info!(target: "server", "Domain: {} v{} on chain {}", config.domain.name, config.domain.version, config.domain.chain_id);
	info!(target: "server", "Pairs: {}", batch.pairs.len());

	let registry = royalty_registry(&batch);
	let ctx = CallContext::new(batch.sender, cli.now.unwrap_or(batch.now));

	let mut exchange = Exchange::new(
		config,
		MemoryFillStore::new(),
		RecordingExecutor::new(),
		MemoryEventSink::new(),
	)
	.context("Invalid exchange configuration")?
	.with_royalties(registry);

	let mut orders = Vec::with_capacity(batch.pairs.len() * 2);
	let mut signatures = Vec::with_capacity(orders.capacity());
	let mut deadlines = Vec::with_capacity(orders.capacity());
	let mut allowances = Vec::with_capacity(orders.capacity());
	for pair in batch.pairs {
		for submission in [pair.left, pair.right] {
			orders.push(submission.order);
			signatures.push(submission.signature);
			deadlines.push(submission.match_before_timestamp);
			allowances.push(submission.allowance_signature);
		}
	}

	let outcomes = exchange
		.batch_match_orders(&ctx, orders, signatures, deadlines, allowances)
		.map_err(|e| {
			let kind = e.kind();
			anyhow::Error::new(e).context(format!("Batch failed ({:?} error)", kind))
		})?;

	for event in exchange.events_mut().drain() {
		println!(
			"{}",
			serde_json::to_string(&event).context("Failed to serialize event")?
		);
	}

	info!(target: "server", "Batch settled: {} matches, {} transfers", outcomes.len(), exchange.executor().executed().len());
	Ok(())
}
