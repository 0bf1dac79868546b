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

//! Logging initialization for the matching binary
//!
//! # Configuration
//!
//! - `RUST_LOG`: Log level filter (default: `info`)
//!   - Can be set per module: `RUST_LOG=bazaar_matching=debug,bazaar_settlement=info`
//!
//! - `LOG_DIR`: Root directory for log files (default: `{workspace_root}/logs`)
//!   - Log files are created in `{LOG_DIR}/matching/`
//!
//! - `LOG_TO_CONSOLE`: Also write to stderr (default: `false`)
//!   - `true`, `1` or `yes` enable it
//!
//! A `.env` file in the working directory is loaded first.
//!
//! # Log File Format
//!
//! - Rotation: one file per day (UTC), `matching.{date}.log`
//! - Format: RFC 3339 UTC timestamp, thread ID, level, target, message
//! - ANSI colors only on the console

use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::OnceLock,
};

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::{
	non_blocking::{NonBlocking, WorkerGuard},
	rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
	EnvFilter, Layer, Registry,
	fmt::{self, MakeWriter, time::UtcTime},
	layer::SubscriberExt,
	util::SubscriberInitExt,
};

use crate::config::{DEFAULT_LOG_LEVEL, DEFAULT_LOG_TO_CONSOLE, LOG_COMPONENT_NAME};

// Flushes the file writer until the process exits
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging settings resolved from the environment
#[derive(Debug, Clone)]
struct LogSettings {
	level: String,
	dir: PathBuf,
	console: bool,
}

impl LogSettings {
	fn from_env() -> Self {
		let root = env::var_os("LOG_DIR")
			.map(PathBuf::from)
			.unwrap_or_else(|| workspace_root().join("logs"));

		Self {
			level: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
			dir: root.join(LOG_COMPONENT_NAME),
			console: env::var("LOG_TO_CONSOLE")
				.map(|v| matches!(v.as_str(), "true" | "1" | "yes"))
				.unwrap_or(DEFAULT_LOG_TO_CONSOLE),
		}
	}

	fn filter(&self) -> EnvFilter {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
	}
}

/// First ancestor holding a workspace manifest, or the starting directory
fn workspace_root() -> PathBuf {
	let start = env::var_os("CARGO_MANIFEST_DIR")
		.map(PathBuf::from)
		.or_else(|| env::current_dir().ok())
		.unwrap_or_else(|| PathBuf::from("."));

	start
		.ancestors()
		.find(|dir| {
			fs::read_to_string(dir.join("Cargo.toml"))
				.is_ok_and(|manifest| manifest.contains("[workspace]"))
		})
		.map(Path::to_path_buf)
		.unwrap_or(start)
}

fn file_writer(dir: &Path) -> Result<NonBlocking> {
	fs::create_dir_all(dir)
		.with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

	let appender = RollingFileAppender::builder()
		.rotation(Rotation::DAILY)
		.filename_prefix(LOG_COMPONENT_NAME)
		.filename_suffix("log")
		.build(dir)
		.with_context(|| format!("Failed to create rolling file appender in {}", dir.display()))?;

	let (writer, guard) = tracing_appender::non_blocking(appender);
	// Already set when initialization is retried; the first writer keeps flushing
	FILE_GUARD.set(guard).ok();
	Ok(writer)
}

fn fmt_layer<W>(writer: W, ansi: bool) -> impl Layer<Registry> + Send + Sync
where
	W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
	fmt::layer()
		.with_writer(writer)
		.with_timer(UtcTime::rfc_3339())
		.with_thread_ids(true)
		.with_thread_names(false)
		.with_target(true)
		.with_ansi(ansi)
}

/// Initialize logging with file output and optional console output
pub fn init_logging() -> Result<()> {
	dotenv::dotenv().ok();

	let settings = LogSettings::from_env();
	let mut layers = vec![fmt_layer(file_writer(&settings.dir)?, false).boxed()];
	if settings.console {
		layers.push(fmt_layer(std::io::stderr, true).boxed());
	}

	Registry::default()
		.with(layers.with_filter(settings.filter()))
		.try_init()
		.context("Failed to install tracing subscriber")?;

	info!(target: "server", "Log level: {}", settings.level);
	info!(target: "server", "Log directory: {}", settings.dir.display());
	info!(target: "server", "Log file: {}.YYYY-MM-DD.log (daily rolling)", LOG_COMPONENT_NAME);
	if settings.console {
		info!(target: "server", "Console output: enabled");
	}
	Ok(())
}
