//! Scenario runner
//!
//! Runs every scenario under tests/scenarios, one category directory at a time,
//! and reports a per-category tally. A category with no scenarios counts as a
//! failure.
//!
//! Usage:
//!   cargo run --bin test-scenarios
//!   cargo run --bin test-scenarios -- persistence/
//!   cargo run --bin test-scenarios -- editing/drag_revert --verbose

use std::env;
use std::path::Path;
use std::process::ExitCode;

use rotation_board::testing::{
    Category, SCENARIOS_DIR, TestResult, discover, parser::parse_test_file, run_test,
};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    passed: usize,
    failed: usize,
    errors: usize,
}

impl Tally {
    fn total(&self) -> usize {
        self.passed + self.failed + self.errors
    }

    fn clean(&self) -> bool {
        self.total() > 0 && self.failed == 0 && self.errors == 0
    }
}

fn main() -> ExitCode {
    let mut verbose = false;
    let mut filter: Option<String> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            flag if flag.starts_with('-') => eprintln!("Ignoring unknown flag {}", flag),
            _ => filter = Some(arg),
        }
    }

    let categories = match discover(Path::new(SCENARIOS_DIR), filter.as_deref()) {
        Ok(categories) => categories,
        Err(e) => {
            println!("Cannot read {}: {}", SCENARIOS_DIR, e);
            return ExitCode::FAILURE;
        }
    };
    if categories.is_empty() {
        println!("No scenarios match '{}'", filter.as_deref().unwrap_or(""));
        return ExitCode::FAILURE;
    }

    let tallies: Vec<(&str, Tally)> = categories
        .iter()
        .map(|category| (category.name.as_str(), run_category(category, verbose)))
        .collect();

    println!("\nCategory         pass  fail  error");
    for (name, tally) in &tallies {
        let note = if tally.total() == 0 { "  (empty)" } else { "" };
        println!(
            "{:<16} {:>4}  {:>4}  {:>5}{}",
            name, tally.passed, tally.failed, tally.errors, note
        );
    }

    if tallies.iter().all(|(_, tally)| tally.clean()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_category(category: &Category, verbose: bool) -> Tally {
    println!("{}/", category.name);
    let mut tally = Tally::default();
    if category.scenarios.is_empty() {
        println!("  no scenarios");
        return tally;
    }

    for path in &category.scenarios {
        let id = category.scenario_id(path);
        let test = match parse_test_file(path) {
            Ok(test) => test,
            Err(message) => {
                println!("  {:.<44} ERROR\n    {}", id, message);
                tally.errors += 1;
                continue;
            }
        };

        match run_test(&test) {
            TestResult::Pass { steps } => {
                tally.passed += 1;
                println!("  {:.<44} PASS ({} steps)", id, steps);
            }
            TestResult::Fail { error } => {
                tally.failed += 1;
                println!("  {:.<44} FAIL", id);
                println!("    setup: {}", test.setup.summary());
                if verbose {
                    if let Some(description) = &test.description {
                        println!("    {}", description);
                    }
                    println!("    {}", error);
                } else {
                    println!("    {}", error.message);
                }
            }
            TestResult::Error { message } => {
                tally.errors += 1;
                println!("  {:.<44} ERROR", id);
                println!("    setup: {}", test.setup.summary());
                println!("    {}", message);
            }
        }
    }
    tally
}
