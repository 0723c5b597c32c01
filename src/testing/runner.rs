//! Scenario execution engine

use bevy::prelude::*;

use crate::editing::{DragOutcome, SeatDrag, SettingsSession, marker_views};
use crate::formation::FormationData;
use crate::plugin::{BoardStore, RotationBoardPlugin};
use crate::rotation::{ArrowType, Formation, SegmentType, Situation};
use crate::selection::SelectionState;
use crate::settings::BoardSettings;
use crate::templates::{TemplateCatalog, parse_color, parse_vec3};

use super::assertions::{AssertionError, check_state};
use super::parser::{Step, TestDefinition};

/// Result of running a scenario
#[derive(Debug)]
pub enum TestResult {
    Pass { steps: usize },
    Fail { error: AssertionError },
    Error { message: String },
}

/// Board resources taken out of the App so steps can borrow them together
pub struct ScenarioBoard {
    pub catalog: TemplateCatalog,
    pub store: BoardStore,
    pub data: FormationData,
    pub selection: SelectionState,
    pub session: SettingsSession,
    pub last_drag: Option<DragOutcome>,
}

impl ScenarioBoard {
    fn from_app(app: &mut App) -> Option<Self> {
        let world = app.world_mut();
        Some(Self {
            catalog: world.remove_resource::<TemplateCatalog>()?,
            store: world.remove_resource::<BoardStore>()?,
            data: world.remove_resource::<FormationData>()?,
            selection: world.remove_resource::<SelectionState>()?,
            session: world.remove_resource::<SettingsSession>()?,
            last_drag: None,
        })
    }

    fn reload(&mut self) {
        self.data = FormationData::new(self.data.formation, &self.catalog, self.store.0.as_mut(), true);
    }

    fn run_step(&mut self, step: &Step) -> Result<(), String> {
        match step {
            Step::ClickRotation { rotation } => {
                self.selection.on_rotation_clicked(*rotation);
            }
            Step::ClickSituation { situation } => {
                self.selection.on_situation_clicked(situation.parse()?);
            }
            Step::Rotate => {
                self.selection.rotate();
            }
            Step::BackRotate => {
                self.selection.back_rotate();
            }
            Step::NextRotate => {
                self.selection.next_rotate();
            }
            Step::NextBackRotate => {
                self.selection.next_back_rotate();
            }
            Step::Drag { seat, x, z } => {
                let slot = self.selection.current();
                let markers = marker_views(&self.data, slot).map(|marker| marker.position);
                let start = self.data.get_position(slot.situation, slot.rotation, *seat);
                let mut drag = SeatDrag::begin(*seat, start);
                drag.update(Vec3::new(*x, 0.0, *z));
                self.last_drag = Some(drag.release(&mut self.data, slot, &markers));
            }
            Step::Set {
                situation,
                rotation,
                seat,
                field,
                value,
            } => {
                let situation: Situation = situation.parse()?;
                let (r, s, d) = (*rotation, *seat, &mut self.data);
                match field.as_str() {
                    "position" => d.set_position(situation, r, s, parse_value(value, parse_vec3)?),
                    "name" => d.set_player_name(situation, r, s, value),
                    "arrow" => d.set_arrow_type(situation, r, s, value.parse::<ArrowType>()?),
                    "segment" => d.set_segment_type(situation, r, s, value.parse::<SegmentType>()?),
                    "head_color" => d.set_arrow_head_color(situation, r, s, parse_value(value, parse_color)?),
                    "segment_color" => {
                        d.set_arrow_segment_color(situation, r, s, parse_value(value, parse_color)?)
                    }
                    "height" => d.set_arrow_height(situation, r, s, parse_float(value)?),
                    "length" => d.set_arrow_segment_length(situation, r, s, parse_float(value)?),
                    other => return Err(format!("Unknown field '{}'", other)),
                }
            }
            Step::ToggleSettings => {
                self.session.toggle(&mut self.data, self.store.0.as_mut());
            }
            Step::SelectPlayer { seat } => self.session.select_player(Some(*seat)),
            Step::SelectRotations { rotations } => {
                for rotation in crate::rotation::ROTATIONS {
                    self.session
                        .set_rotation_selected(rotation, rotations.contains(&rotation));
                }
            }
            Step::Apply { field, value } => {
                let (session, d) = (&mut self.session, &mut self.data);
                match field.as_str() {
                    "name" => session.apply_player_name(d, value),
                    "arrow" => session.apply_arrow_type(d, value.parse::<ArrowType>()?),
                    "segment" => session.apply_segment_type(d, value.parse::<SegmentType>()?),
                    "head_color" => session.apply_arrow_head_color(d, parse_value(value, parse_color)?),
                    "segment_color" => {
                        session.apply_arrow_segment_color(d, parse_value(value, parse_color)?)
                    }
                    "height" => session.apply_arrow_height(d, parse_float(value)?),
                    "length" => session.apply_arrow_segment_length(d, parse_float(value)?),
                    "front_court" => session.apply_front_court_color(d, parse_value(value, parse_color)?),
                    "back_court" => session.apply_back_court_color(d, parse_value(value, parse_color)?),
                    other => return Err(format!("Unknown field '{}'", other)),
                }
            }
            Step::Snapshot => self.data.snapshot(),
            Step::Save { force } => self.data.save(self.store.0.as_mut(), *force),
            Step::Revert => self.data.revert(),
            Step::RevertSettings => self.session.revert(&mut self.data),
            Step::FactoryReset => {
                self.session
                    .factory_reset(&mut self.data, &self.catalog, self.store.0.as_mut());
            }
            Step::Reload => self.reload(),
        }
        Ok(())
    }
}

fn parse_value<T>(value: &str, parse: fn(&str) -> Option<T>) -> Result<T, String> {
    parse(value).ok_or_else(|| format!("Invalid value '{}'", value))
}

fn parse_float(value: &str) -> Result<f32, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number '{}'", value))
}

/// Run a single scenario and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    let formation: Formation = match test.setup.formation.parse() {
        Ok(f) => f,
        Err(message) => return TestResult::Error { message },
    };
    let situation: Situation = match test.setup.situation.parse() {
        Ok(s) => s,
        Err(message) => return TestResult::Error { message },
    };

    let settings = BoardSettings {
        formation,
        initial_rotation: test.setup.rotation,
        initial_situation: situation,
        ..Default::default()
    };

    // Minimal app with the board plugin and a scratch store
    let mut app = App::new();
    app.add_plugins(RotationBoardPlugin {
        settings,
        in_memory: true,
    });

    let Some(mut board) = ScenarioBoard::from_app(&mut app) else {
        return TestResult::Error {
            message: "Board plugin did not insert its resources".to_string(),
        };
    };

    if !test.setup.overrides.is_empty() {
        for entry in &test.setup.overrides {
            board.store.0.set(&entry.key, &entry.value);
        }
        board.reload();
    }

    let mut assertions = test.expect.state.clone();
    assertions.sort_by_key(|a| a.after_step);
    let mut pending = assertions.iter().peekable();

    for index in 0..=test.steps.len() {
        while let Some(assertion) = pending.next_if(|a| a.after_step == index) {
            if let Err(error) = check_state(assertion, &board) {
                return TestResult::Fail { error };
            }
        }

        if let Some(step) = test.steps.get(index)
            && let Err(message) = board.run_step(step)
        {
            return TestResult::Error {
                message: format!("Step {} ({:?}): {}", index + 1, step, message),
            };
        }
    }

    if let Some(assertion) = pending.next() {
        return TestResult::Error {
            message: format!(
                "Check after step {} but the scenario has only {} steps",
                assertion.after_step,
                test.steps.len()
            ),
        };
    }

    TestResult::Pass {
        steps: test.steps.len(),
    }
}
