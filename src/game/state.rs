// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;

use crate::board::{Board, Color};

/// Classification of a game state. Conclusive kinds end the game.
#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Regular,
    InCheck,
    Checkmated,
    Stalemated,
    AgreedDrawn,
}

impl StateKind {
    #[inline]
    pub fn is_conclusive(&self) -> bool {
        matches!(
            self,
            StateKind::Checkmated | StateKind::Stalemated | StateKind::AgreedDrawn
        )
    }
}

/// The game's state descriptor: what kind of state, whose state it is, and
/// the current round. The subject is the color to move; for `Checkmated`
/// that color is the loser, so the winner is `subject.opposite()`. Rounds
/// start at 1 and advance whenever the subject wraps from Black back to
/// White.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub kind: StateKind,
    pub subject: Color,
    pub round: u32,
}

impl GameState {
    pub fn initial() -> Self {
        Self {
            kind: StateKind::Regular,
            subject: Color::White,
            round: 1,
        }
    }

    /// Derives the descriptor for `subject` to move on `board`.
    pub fn derive(board: &mut Board, subject: Color, round: u32) -> Self {
        let in_check = board.is_in_check(subject);
        let can_move = !board.legal_moves(subject).is_empty();
        let kind = match (in_check, can_move) {
            (true, false) => StateKind::Checkmated,
            (false, false) => StateKind::Stalemated,
            (true, true) => StateKind::InCheck,
            (false, true) => StateKind::Regular,
        };
        Self {
            kind,
            subject,
            round,
        }
    }

    #[inline]
    pub fn is_conclusive(&self) -> bool {
        self.kind.is_conclusive()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (round {})", self.subject, self.kind, self.round)
    }
}
