//! Rotation and situation selection
//!
//! Two slots are tracked: the one on display (`current`) and a pending target
//! (`next`). Clicking a rotation or situation button arms the target; clicking
//! the same button again commits it.

use bevy::prelude::*;

use crate::constants::SEAT_COUNT;
use crate::rotation::{ROTATIONS, Situation};

/// One (rotation, situation) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub rotation: u8,
    pub situation: Situation,
}

impl Slot {
    pub fn new(rotation: u8, situation: Situation) -> Self {
        Self {
            rotation,
            situation,
        }
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new(1, Situation::Rotation)
    }
}

/// Read-only view of the selection after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub current: Slot,
    pub next: Slot,
}

/// How a rotation or situation button should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonHighlight {
    Current,
    Next,
    Idle,
}

/// Current and pending slot for the board
#[derive(Resource, Debug, Clone, Default)]
pub struct SelectionState {
    current: Slot,
    next: Slot,
}

impl SelectionState {
    /// Start with nothing pending
    pub fn new(start: Slot) -> Self {
        Self {
            current: start,
            next: start,
        }
    }

    pub fn current(&self) -> Slot {
        self.current
    }

    pub fn next(&self) -> Slot {
        self.next
    }

    pub fn selection(&self) -> Selection {
        Selection {
            current: self.current,
            next: self.next,
        }
    }

    /// A transition is armed but not committed
    pub fn is_transition_pending(&self) -> bool {
        self.current != self.next
    }

    pub fn on_situation_clicked(&mut self, situation: Situation) -> Selection {
        if situation != self.next.situation {
            self.next.situation = situation;
        } else {
            self.current.situation = situation;
            self.current.rotation = self.next.rotation;
            self.next.situation = self.current.situation;
            debug!("Committed situation {}", situation);
        }
        self.selection()
    }

    /// Rotation buttons outside 1..=6 are ignored
    pub fn on_rotation_clicked(&mut self, rotation: u8) -> Selection {
        if !ROTATIONS.contains(&rotation) {
            warn!("Ignoring click on rotation {}", rotation);
            return self.selection();
        }
        if rotation != self.next.rotation {
            self.next.rotation = rotation;
        } else {
            self.current.rotation = rotation;
            self.current.situation = self.next.situation;
            self.next.rotation = self.current.rotation;
            debug!("Committed rotation {}", rotation);
        }
        self.selection()
    }

    /// Advance the displayed rotation, 6 wraps to 1
    pub fn rotate(&mut self) -> Selection {
        self.current.rotation = step_forward(self.current.rotation);
        self.next.rotation = self.current.rotation;
        self.selection()
    }

    /// Step the displayed rotation back, 1 wraps to 6
    pub fn back_rotate(&mut self) -> Selection {
        self.current.rotation = step_back(self.current.rotation);
        self.next.rotation = self.current.rotation;
        self.selection()
    }

    /// Advance only the pending rotation
    pub fn next_rotate(&mut self) -> Selection {
        self.next.rotation = step_forward(self.next.rotation);
        self.selection()
    }

    pub fn next_back_rotate(&mut self) -> Selection {
        self.next.rotation = step_back(self.next.rotation);
        self.selection()
    }

    /// Highlight per rotation button, rotation 1 first
    pub fn rotation_highlights(&self) -> [ButtonHighlight; SEAT_COUNT] {
        std::array::from_fn(|i| {
            let rotation = i as u8 + 1;
            highlight(rotation == self.current.rotation, rotation == self.next.rotation)
        })
    }

    /// Highlight per situation button, in `Situation::ALL` order
    pub fn situation_highlights(&self) -> [ButtonHighlight; 5] {
        Situation::ALL.map(|s| highlight(s == self.current.situation, s == self.next.situation))
    }
}

fn highlight(is_current: bool, is_next: bool) -> ButtonHighlight {
    if is_current {
        ButtonHighlight::Current
    } else if is_next {
        ButtonHighlight::Next
    } else {
        ButtonHighlight::Idle
    }
}

fn step_forward(rotation: u8) -> u8 {
    if rotation >= 6 { 1 } else { rotation + 1 }
}

fn step_back(rotation: u8) -> u8 {
    if rotation <= 1 { 6 } else { rotation - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_click_situation_commit() {
        let mut state = SelectionState::default();

        let after_first = state.on_situation_clicked(Situation::ServeStack);
        assert_eq!(after_first.next, Slot::new(1, Situation::ServeStack));
        assert_eq!(after_first.current, Slot::new(1, Situation::Rotation));
        assert!(state.is_transition_pending());

        let after_second = state.on_situation_clicked(Situation::ServeStack);
        assert_eq!(after_second.current, Slot::new(1, Situation::ServeStack));
        assert_eq!(after_second.next, after_second.current);
        assert!(!state.is_transition_pending());
    }

    #[test]
    fn test_rotation_commit_carries_pending_situation() {
        let mut state = SelectionState::default();
        state.on_situation_clicked(Situation::BaseDefense);
        state.on_rotation_clicked(4);
        let committed = state.on_rotation_clicked(4);

        assert_eq!(committed.current, Slot::new(4, Situation::BaseDefense));
        assert_eq!(committed.next.rotation, 4);
    }

    #[test]
    fn test_situation_commit_carries_pending_rotation() {
        let mut state = SelectionState::default();
        state.on_rotation_clicked(3);
        state.on_situation_clicked(Situation::ReadyToAttack);
        let committed = state.on_situation_clicked(Situation::ReadyToAttack);

        assert_eq!(committed.current, Slot::new(3, Situation::ReadyToAttack));
    }

    #[test]
    fn test_clicking_committed_slot_is_stable() {
        let mut state = SelectionState::default();
        let before = state.selection();
        state.on_situation_clicked(Situation::Rotation);
        state.on_rotation_clicked(1);
        assert_eq!(state.selection(), before);
    }

    #[test]
    fn test_out_of_range_rotation_ignored() {
        let mut state = SelectionState::default();
        state.on_rotation_clicked(0);
        state.on_rotation_clicked(7);
        assert_eq!(state.next(), Slot::default());
    }

    #[test]
    fn test_rotate_wraps() {
        let mut state = SelectionState::new(Slot::new(6, Situation::Rotation));
        assert_eq!(state.rotate().current.rotation, 1);
        assert_eq!(state.back_rotate().current.rotation, 6);
        assert_eq!(state.next().rotation, 6);
    }

    #[test]
    fn test_next_rotate_only_moves_next() {
        let mut state = SelectionState::default();
        let selection = state.next_back_rotate();
        assert_eq!(selection.next.rotation, 6);
        assert_eq!(selection.current.rotation, 1);
        assert_eq!(state.next_rotate().next.rotation, 1);
    }

    #[test]
    fn test_highlights() {
        let mut state = SelectionState::default();
        state.on_rotation_clicked(2);
        state.on_situation_clicked(Situation::ServeStack);

        let rotations = state.rotation_highlights();
        assert_eq!(rotations[0], ButtonHighlight::Current);
        assert_eq!(rotations[1], ButtonHighlight::Next);
        assert_eq!(rotations[2], ButtonHighlight::Idle);

        let situations = state.situation_highlights();
        assert_eq!(situations[Situation::Rotation.index()], ButtonHighlight::Current);
        assert_eq!(situations[Situation::ServeStack.index()], ButtonHighlight::Next);
    }
}
