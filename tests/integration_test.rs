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
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs the binary offline against a state file in `dir`, with HOME
/// pointed there too so the default config is created in isolation.
fn payrate(dir: &Path, args: &[&str]) -> Output {
	let state = dir.join("state.json");
	Command::new(env!("CARGO_BIN_EXE_payrate"))
		.env("HOME", dir)
		.env("XDG_DATA_HOME", dir)
		.env_remove("RUST_LOG")
		.arg("--offline")
		.arg("--state")
		.arg(&state)
		.args(args)
		.output()
		.expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
	String::from_utf8_lossy(&output.stdout).into_owned()
}

const COMPARE: [&str; 9] = [
	"compare",
	"--official-rate",
	"36.50",
	"--parallel-rate",
	"41",
	"--official-usd",
	"100",
	"--blended-usd",
	"90",
];

#[test]
fn test_compare_recommends_official() {
	let dir = TempDir::new().unwrap();
	let output = payrate(dir.path(), &COMPARE);
	assert!(output.status.success());

	let report = stdout(&output);
	assert!(report.contains("Recommendation: Pay in bolivars at the official rate\n"));
	assert!(report.contains("  Saves 186.70 Bs ($ 5.12), 4.87% less\n"));
	assert!(report.contains(
		"Paying in USDT: transfer 89.02 USDT, the cheaper total at the parallel rate."
	));
}

#[test]
fn test_show_restores_saved_inputs() {
	let dir = TempDir::new().unwrap();
	assert!(payrate(dir.path(), &COMPARE).status.success());
	assert!(dir.path().join("state.json").exists());

	let output = payrate(dir.path(), &["show"]);
	assert!(output.status.success());

	let report = stdout(&output);
	assert!(report.contains("Official     36.50 Bs"));
	assert!(report.contains("Blended      42.63 Bs   average +10%"));
	assert!(report.contains("Official rate   $ 100.00   3,650.00 Bs"));
	assert!(!report.contains("Recommendation"));
}

#[test]
fn test_compare_without_prices_warns() {
	let dir = TempDir::new().unwrap();
	let output = payrate(dir.path(), &["compare", "--parallel-rate", "41"]);
	assert!(output.status.success());

	let report = stdout(&output);
	assert!(report.contains(
		"warning: enter a dollar price for the official-rate option"
	));
	assert!(!report.contains("Recommendation"));
}

#[test]
fn test_rejects_non_numeric_flags() {
	let dir = TempDir::new().unwrap();
	let output = payrate(dir.path(), &["compare", "--official-usd", "abc"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr)
		.contains("--official-usd expects a number"));
}

#[test]
fn test_price_flags_need_compare() {
	let dir = TempDir::new().unwrap();
	let output = payrate(dir.path(), &["show", "--official-usd", "100"]);
	assert!(!output.status.success());
}
