/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Settings;
use crate::controller::message::Message;
use crate::controller::runtime::Controller;
use crate::controller::state::RateField;
use crate::parsing::command::CommandParser;
use crate::parsing::filesystem::Filesystem;
use crate::pricing::conversion::PricedItem;
use crate::rates::fetcher::RateFetcher;
use crate::rates::retry::Backoff;
use crate::rates::source::{DolarApi, OfflineSource, RateSource};
use crate::reports::rate_reporter::RateReporter;
use crate::reports::screen::TerminalScreen;
use crate::storage::persister::Persister;
use crate::storage::store::{FileStore, MemoryStore, SnapshotStore};
use anyhow::{bail, Error};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;
mod controller;
mod error;
mod parsing;
mod pricing;
mod rates;
mod reports;
mod storage;
mod util;

#[derive(Parser)]
#[command(
	name = "payrate",
	version = "0.1",
	about = "Bolivar exchange rates and payment comparison"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	// -----------
	// -- FLAGS --
	// -----------
	/// Custom config file location (default: ~/.config/payrate/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Custom state file location (overrides the config file)
	#[arg(long)]
	state: Option<String>,

	/// Never contact the rate service
	#[arg(long)]
	offline: bool,

	/// Keep state in memory only; nothing is read or written
	#[arg(long)]
	ephemeral: bool,

	/// Dollar price when paying at the official rate
	#[arg(long)]
	official_usd: Option<String>,

	/// Dollar price when paying at the blended rate
	#[arg(long)]
	blended_usd: Option<String>,

	/// Override the official rate
	#[arg(long)]
	official_rate: Option<String>,

	/// Override the parallel rate
	#[arg(long)]
	parallel_rate: Option<String>,

	/// Pin the blended rate by hand
	#[arg(long)]
	blended_rate: Option<String>,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self, parser: &CommandParser) -> Result<(), Error> {
		for (flag, value) in self.numeric_flags() {
			if let Some(text) = value {
				if parser.number(text).is_none() {
					bail!("--{} expects a number, got '{}'", flag, text);
				}
			}
		}

		if self.command != Directive::Compare
			&& self.numeric_flags().iter().any(|(_, v)| v.is_some())
		{
			bail!("Rate and price flags only apply to the compare command");
		}

		Ok(())
	}

	fn numeric_flags(&self) -> [(&'static str, Option<&String>); 5] {
		[
			("official-rate", self.official_rate.as_ref()),
			("parallel-rate", self.parallel_rate.as_ref()),
			("blended-rate", self.blended_rate.as_ref()),
			("official-usd", self.official_usd.as_ref()),
			("blended-usd", self.blended_usd.as_ref()),
		]
	}

	/// Flag edits as messages, rates before prices so conversions use the
	/// final rates.
	fn edits(&self, parser: &CommandParser) -> Vec<Message> {
		let rates = [
			(RateField::Official, &self.official_rate),
			(RateField::Parallel, &self.parallel_rate),
			(RateField::Blended, &self.blended_rate),
		];
		let prices = [
			(PricedItem::Official, &self.official_usd),
			(PricedItem::Blended, &self.blended_usd),
		];

		let rate_edits = rates.into_iter().filter_map(|(field, text)| {
			text.as_ref()
				.map(|t| Message::SetRate(field, parser.number(t)))
		});
		let price_edits = prices.into_iter().filter_map(|(item, text)| {
			text.as_ref()
				.map(|t| Message::SetPrice(item, parser.number(t)))
		});

		rate_edits.chain(price_edits).collect()
	}
}

#[derive(ValueEnum, Clone, Copy, PartialEq)]
enum Directive {
	Run,     // interactive session
	Rates,   // fetch and print rates
	Compare, // fetch, apply flags, compare payment options
	Show,    // print saved inputs
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	init_tracing();

	let args = Cli::parse();
	let parser = CommandParser::new();
	args.validate(&parser)?;

	let fs = Filesystem::new();
	let config = fs.get_config(args.config.as_ref())?;
	let mut settings = Settings::resolve(config, fs.default_state_path());
	if let Some(state) = &args.state {
		settings.state_path = Some(PathBuf::from(state));
	}

	let fetcher = RateFetcher::new(
		source(&args, &settings),
		Backoff::new(settings.attempts, settings.initial_backoff),
	);
	let persister = Persister::new(store(&args, &settings), settings.debounce);
	let mut controller = Controller::new(fetcher, persister, TerminalScreen);
	controller.restore();

	match args.command {
		Directive::Run => {
			controller.run(BufReader::new(tokio::io::stdin())).await?;
		},
		Directive::Rates => {
			controller.dispatch(Message::Refresh).await;
			print!("{}", RateReporter::new(controller.state()).render());
		},
		Directive::Compare => {
			controller.dispatch(Message::Refresh).await;
			for edit in args.edits(&parser) {
				controller.dispatch(edit).await;
			}
			controller.dispatch(Message::Calculate).await;
			controller.render();
		},
		Directive::Show => controller.render(),
	}

	controller.finish();
	Ok(())
}

/// Diagnostics go to stderr so they never mix with reports; RUST_LOG
/// raises the level above the default of warnings only.
fn init_tracing() {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn source(args: &Cli, settings: &Settings) -> Box<dyn RateSource> {
	if args.offline {
		Box::new(OfflineSource)
	} else {
		Box::new(DolarApi::new(&settings.api_url))
	}
}

fn store(args: &Cli, settings: &Settings) -> Arc<dyn SnapshotStore> {
	match (&settings.state_path, args.ephemeral) {
		(Some(path), false) => Arc::new(FileStore::new(path.clone())),
		(None, false) => {
			warn!("no data directory found; state will not be saved");
			Arc::new(MemoryStore::new())
		},
		(_, true) => Arc::new(MemoryStore::new()),
	}
}
