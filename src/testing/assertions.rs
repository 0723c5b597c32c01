//! Assertion checking for scenario expectations
//!
//! Check strings look like `path op value`, e.g. `current.rotation = 2`,
//! `seat.3.name = MB1`, `ServeStack.3.seat.1.z < -8`. Numbers compare with a
//! small tolerance; everything else compares as text.

use bevy::prelude::*;

use super::parser::StateAssertion;
use super::runner::ScenarioBoard;
use crate::editing::{DragOutcome, transition_arrows};
use crate::rotation::Situation;
use crate::selection::Slot;
use crate::validation::validate_positions;

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check every assertion against the board
pub fn check_state(assertion: &StateAssertion, board: &ScenarioBoard) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'path = value' or 'path > value'".to_string(),
            actual: check.clone(),
        })?;

        let actual = resolve(path, board).ok_or_else(|| AssertionError {
            message: format!("Unknown path '{}' in check after step {}", path, assertion.after_step),
            expected: "current.*, next.*, pending, dirty, seat.N.*, <Situation>.<rotation>.seat.N.*, \
                       settings.*, store.*, drag, arrows, valid, records"
                .to_string(),
            actual: path.to_string(),
        })?;

        compare(check, &actual, operator, expected_value.trim_matches('"'))?;
    }

    Ok(())
}

/// Look up the current value at `path` as text
fn resolve(path: &str, board: &ScenarioBoard) -> Option<String> {
    let parts: Vec<&str> = path.split('.').collect();
    let selection = board.selection.selection();

    match parts.as_slice() {
        ["current", field] => slot_field(selection.current, field),
        ["next", field] => slot_field(selection.next, field),
        ["pending"] => Some(board.selection.is_transition_pending().to_string()),
        ["dirty"] => Some(board.data.has_unsaved_changes().to_string()),
        ["dirty", situation, rotation] => {
            let situation: Situation = situation.parse().ok()?;
            Some(board.data.is_dirty(situation, rotation.parse().ok()?).to_string())
        }
        ["records"] => Some(board.data.len().to_string()),
        ["seat", seat, field] => seat_field(board, selection.current, seat, field),
        [situation, rotation, "seat", seat, field] => {
            let slot = Slot::new(rotation.parse().ok()?, situation.parse().ok()?);
            seat_field(board, slot, seat, field)
        }
        ["court", "front"] => Some(color_text(board.data.front_court_color())),
        ["court", "back"] => Some(color_text(board.data.back_court_color())),
        ["settings", "open"] => Some(board.session.is_open().to_string()),
        ["settings", "dirty"] => Some(board.session.is_dirty().to_string()),
        ["settings", "common", field] => {
            let common = board.session.common_values(&board.data);
            let Some(common) = common else {
                return Some("none".to_string());
            };
            let value = match *field {
                "name" => common.name,
                "arrow" => common.arrow_type.map(|a| format!("{:?}", a)),
                "segment" => common.segment_type.map(|s| format!("{:?}", s)),
                "height" => common.arrow_height.map(|h| h.to_string()),
                "length" => common.arrow_segment_length.map(|l| l.to_string()),
                "head_color" => common.arrow_head_color.map(color_text),
                "segment_color" => common.arrow_segment_color.map(color_text),
                _ => return None,
            };
            Some(value.unwrap_or_else(|| "none".to_string()))
        }
        ["store", "count"] => Some(
            board
                .store
                .0
                .keys_with_prefix("")
                .len()
                .to_string(),
        ),
        ["store", "has", key] => Some(board.store.0.has(key).to_string()),
        ["drag"] => Some(match board.last_drag {
            Some(DragOutcome::Committed) => "Committed".to_string(),
            Some(DragOutcome::Reverted(_)) => "Reverted".to_string(),
            None => "none".to_string(),
        }),
        ["arrows"] => Some(
            transition_arrows(&board.data, &selection)
                .iter()
                .filter(|a| a.is_some())
                .count()
                .to_string(),
        ),
        ["valid"] => {
            let slot = selection.current;
            let positions: [Vec3; 6] = std::array::from_fn(|i| {
                board.data.get_position(slot.situation, slot.rotation, i + 1)
            });
            Some(validate_positions(slot.rotation, &positions).to_string())
        }
        _ => None,
    }
}

fn slot_field(slot: Slot, field: &str) -> Option<String> {
    match field {
        "rotation" => Some(slot.rotation.to_string()),
        "situation" => Some(slot.situation.to_string()),
        _ => None,
    }
}

fn seat_field(board: &ScenarioBoard, slot: Slot, seat: &str, field: &str) -> Option<String> {
    let seat: usize = seat.parse().ok()?;
    let (s, r, d) = (slot.situation, slot.rotation, &board.data);
    Some(match field {
        "name" => d.get_player_name(s, r, seat),
        "x" => d.get_position(s, r, seat).x.to_string(),
        "y" => d.get_position(s, r, seat).y.to_string(),
        "z" => d.get_position(s, r, seat).z.to_string(),
        "arrow" => format!("{:?}", d.get_arrow_type(s, r, seat)),
        "segment" => format!("{:?}", d.get_segment_type(s, r, seat)),
        "head_color" => color_text(d.get_arrow_head_color(s, r, seat)),
        "segment_color" => color_text(d.get_arrow_segment_color(s, r, seat)),
        "height" => d.get_arrow_height(s, r, seat).to_string(),
        "length" => d.get_arrow_segment_length(s, r, seat).to_string(),
        _ => return None,
    })
}

/// "r,g,b" in sRGB, two decimals
fn color_text(color: Color) -> String {
    let c = color.to_srgba();
    format!("{:.2},{:.2},{:.2}", c.red, c.green, c.blue)
}

fn compare(check: &str, actual: &str, operator: &str, expected: &str) -> Result<(), AssertionError> {
    let numbers = actual.parse::<f32>().ok().zip(expected.parse::<f32>().ok());

    let pass = match (numbers, operator) {
        (Some((a, e)), ">=") => a >= e,
        (Some((a, e)), "<=") => a <= e,
        (Some((a, e)), ">") => a > e,
        (Some((a, e)), "<") => a < e,
        (Some((a, e)), "=") => (a - e).abs() < 0.01,
        (Some((a, e)), "!=") => (a - e).abs() >= 0.01,
        (None, "=") => actual == expected,
        (None, "!=") => actual != expected,
        (None, _) => {
            return Err(AssertionError {
                message: format!("Operator '{}' needs numbers: {}", operator, check),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        _ => true,
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {}", check),
            expected: format!("{} {}", operator, expected),
            actual: actual.to_string(),
        });
    }

    Ok(())
}
