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
use crate::controller::state::{AppState, Panel, RateField};
use crate::pricing::analysis::analyze;
use crate::pricing::conversion::{update_conversions, PriceInput};
use crate::util::quant::Quant;

/// The single state transition of the calculator. Applies one message and
/// returns the side effects it calls for; nothing here does I/O.
pub fn update(state: &mut AppState, message: Message) -> Vec<Effect> {
	match message {
		Message::Restore(snapshot) => {
			if let Some(snapshot) = snapshot {
				state.apply_snapshot(&snapshot);
			}
			state.panel = Panel::Inputs;
			recompute(state, false);
			vec![]
		},
		Message::SetRate(field, value) => {
			let value = value.map(cents).unwrap_or_else(Quant::zero);
			match field {
				RateField::Official => state.rates.official = value,
				RateField::Parallel => state.rates.parallel = value,
				RateField::Blended => state.rates.set_manual_blend(value),
			}
			recompute(state, false);
			refresh_results(state);
			vec![Effect::Persist]
		},
		Message::AutoBlend => {
			state.rates.clear_manual_blend();
			convert(state);
			refresh_results(state);
			vec![Effect::Persist]
		},
		Message::SetPrice(item, value) => {
			state.item_mut(item).usd = value.map(cents);
			convert(state);
			refresh_results(state);
			vec![Effect::Persist]
		},
		Message::Calculate => {
			match analyze(&state.rates, &state.official_item, &state.blended_item)
			{
				Ok(analysis) => {
					state.analysis = Some(analysis);
					state.panel = Panel::Results;
					vec![]
				},
				Err(warning) => {
					state.panel = Panel::Inputs;
					vec![Effect::Warn(warning)]
				},
			}
		},
		Message::Edit => {
			state.panel = Panel::Inputs;
			// unforced: a blended rate pinned by hand stays pinned
			recompute(state, false);
			vec![Effect::Persist]
		},
		Message::Reset => {
			state.official_item = PriceInput::default();
			state.blended_item = PriceInput::default();
			state.rates.manual_blend_override = false;
			state.analysis = None;
			state.panel = Panel::Inputs;
			state.loading = true;
			vec![Effect::Persist, Effect::Fetch { force: true }]
		},
		Message::Refresh => {
			state.loading = true;
			vec![Effect::Fetch { force: false }]
		},
		Message::RatesFetched { outcome, force } => {
			state.loading = false;

			// on failure the rates already on screen stay as they are
			if let Ok(fetched) = outcome {
				if let Some(official) = fetched.official {
					state.rates.official = official.rounded(2);
				}
				if let Some(parallel) = fetched.parallel {
					state.rates.parallel = parallel.rounded(2);
				}
				if fetched.updated_at.is_some() {
					state.rates_updated_at = fetched.updated_at;
				}
			}

			if force {
				state.rates.manual_blend_override = false;
			}
			recompute(state, force);
			refresh_results(state);
			vec![Effect::Persist]
		},
	}
}

/// Entered values are kept to the cent.
fn cents(value: Quant) -> Quant {
	value.rounded(2)
}

/// Shown results always describe the current inputs. When they no longer
/// support a comparison, the inputs come back instead.
fn refresh_results(state: &mut AppState) {
	if state.panel != Panel::Results {
		return;
	}

	match analyze(&state.rates, &state.official_item, &state.blended_item) {
		Ok(analysis) => state.analysis = Some(analysis),
		Err(_) => {
			state.analysis = None;
			state.panel = Panel::Inputs;
		},
	}
}

/// Blended rate, then conversions.
fn recompute(state: &mut AppState, force_blend: bool) {
	state.rates.recalculate_blended(force_blend);
	convert(state);
}

fn convert(state: &mut AppState) {
	update_conversions(
		&state.rates,
		&mut state.official_item,
		&mut state.blended_item,
	);
}
