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
use crate::controller::message::{Effect, Message};
use crate::controller::state::AppState;
use crate::controller::update::update;
use crate::error::AppError;
use crate::parsing::command::{Command, CommandParser, HELP};
use crate::rates::fetcher::RateFetcher;
use crate::reports::screen::Screen;
use crate::storage::persister::Persister;
use anyhow::Error;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

/// Owns the state and carries out the effects `update` asks for: saving,
/// fetching, and telling the screen.
pub struct Controller<S: Screen> {
	state: AppState,
	fetcher: Arc<RateFetcher>,
	persister: Persister,
	parser: CommandParser,
	screen: S,
}

impl<S: Screen> Controller<S> {
	pub fn new(fetcher: RateFetcher, persister: Persister, screen: S) -> Self {
		Self {
			state: AppState::default(),
			fetcher: Arc::new(fetcher),
			persister,
			parser: CommandParser::new(),
			screen,
		}
	}

	pub fn state(&self) -> &AppState {
		&self.state
	}

	/// Loads saved state, once, before anything is shown.
	pub fn restore(&mut self) {
		let snapshot = self.persister.load();
		if snapshot.is_some() {
			info!("restored saved state");
		}
		self.apply(Message::Restore(snapshot));
	}

	pub fn render(&mut self) {
		self.screen.render(&self.state);
	}

	/// Writes out anything still waiting on the debounce timer.
	pub fn finish(&mut self) {
		self.persister.flush();
	}

	/// Applies a message and every message that follows from it, awaiting
	/// rate fetches in place. For one-shot commands and tests.
	pub async fn dispatch(&mut self, message: Message) {
		let mut queue = VecDeque::from([message]);
		while let Some(message) = queue.pop_front() {
			for force in self.apply(message) {
				let outcome = self.fetcher.fetch().await;
				queue.push_back(Message::RatesFetched { outcome, force });
			}
		}
	}

	/// Interactive session: one command per input line, with rate fetches
	/// running in the background and reported back as messages. Ends at
	/// `quit` or end of input, flushing saved state.
	pub async fn run<R>(&mut self, input: R) -> Result<(), Error>
	where
		R: AsyncBufRead + Unpin,
	{
		let (tx, mut rx) = mpsc::unbounded_channel();
		let mut lines = input.lines();

		self.screen.info(HELP);
		self.dispatch_detached(Message::Refresh, &tx);
		self.render();

		loop {
			tokio::select! {
				biased;
				Some(message) = rx.recv() => {
					self.dispatch_detached(message, &tx);
					self.render();
				},
				line = lines.next_line() => {
					let Some(line) = line? else { break };
					if line.trim().is_empty() {
						continue;
					}
					match self.parser.command(&line) {
						Ok(Command::Quit) => break,
						Ok(Command::Help) => self.screen.info(HELP),
						Ok(command) => {
							if let Some(message) = Message::from_command(command) {
								self.dispatch_detached(message, &tx);
								self.render();
							}
						},
						Err(e) => self.screen.warn(&e.to_string()),
					}
				},
			}
		}

		self.finish();
		Ok(())
	}

	fn dispatch_detached(
		&mut self,
		message: Message,
		tx: &UnboundedSender<Message>,
	) {
		for force in self.apply(message) {
			let fetcher = self.fetcher.clone();
			let tx = tx.clone();
			tokio::spawn(async move {
				let outcome = fetcher.fetch().await;
				// the session may have ended while we were fetching
				let _ = tx.send(Message::RatesFetched { outcome, force });
			});
		}
	}

	/// Runs the transition and performs its synchronous effects. Returns
	/// the fetches it asked for, by `force` flag.
	fn apply(&mut self, message: Message) -> Vec<bool> {
		debug!(?message, "dispatch");
		let mut fetches = vec![];
		for effect in update(&mut self.state, message) {
			match effect {
				Effect::Persist => self.persister.save(self.state.snapshot()),
				Effect::Fetch { force } => fetches.push(force),
				Effect::Warn(warning) => {
					let error = AppError::from(warning);
					warn!(%error, "comparison not run");
					self.screen.warn(&error.to_string());
				},
			}
		}
		fetches
	}
}
