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

use anyhow::Result;
use log::debug;
#[cfg(feature = "random")]
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;

use crate::board::{Board, Color, PlayerMove};
use crate::errors::ChessError;

use super::agent;

/// A participant in a game. The controller hands every player a copy of the
/// board and expects a raw [`PlayerMove`] back; a player never touches the
/// authoritative board. The variant tag doubles as the snapshot `kind`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "kind")]
pub enum Player {
    Human(HumanPlayer),
    #[cfg(feature = "random")]
    Random(RandomPlayer),
    Minimax(MinimaxPlayer),
}

impl Player {
    pub fn human(name: impl Into<String>, color: Color) -> Self {
        Self::Human(HumanPlayer {
            name: name.into(),
            color,
            score: 0,
            pending: None,
        })
    }

    #[cfg(feature = "random")]
    pub fn random(name: impl Into<String>, color: Color) -> Self {
        Self::Random(RandomPlayer {
            name: name.into(),
            color,
            score: 0,
        })
    }

    pub fn minimax(name: impl Into<String>, color: Color) -> Self {
        Self::minimax_with_depth(name, color, agent::MAX_DEPTH)
    }

    /// A minimax player with a non-default lookahead.
    pub fn minimax_with_depth(name: impl Into<String>, color: Color, depth: u32) -> Self {
        Self::Minimax(MinimaxPlayer {
            name: name.into(),
            color,
            score: 0,
            depth,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Human(p) => &p.name,
            #[cfg(feature = "random")]
            Self::Random(p) => &p.name,
            Self::Minimax(p) => &p.name,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Human(p) => p.color,
            #[cfg(feature = "random")]
            Self::Random(p) => p.color,
            Self::Minimax(p) => p.color,
        }
    }

    /// Capture points accumulated over the current timeline.
    pub fn score(&self) -> u32 {
        match self {
            Self::Human(p) => p.score,
            #[cfg(feature = "random")]
            Self::Random(p) => p.score,
            Self::Minimax(p) => p.score,
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human(_))
    }

    pub fn is_agent(&self) -> bool {
        !self.is_human()
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        *self.score_mut() += points;
    }

    pub(crate) fn sub_score(&mut self, points: u32) {
        let score = self.score_mut();
        *score = score.saturating_sub(points);
    }

    fn score_mut(&mut self) -> &mut u32 {
        match self {
            Self::Human(p) => &mut p.score,
            #[cfg(feature = "random")]
            Self::Random(p) => &mut p.score,
            Self::Minimax(p) => &mut p.score,
        }
    }

    /// Buffers a move request on a human player. The UI must register a
    /// move before the controller asks the human to produce one.
    pub fn register(&mut self, mv: PlayerMove) -> Result<()> {
        match self {
            Self::Human(p) => {
                p.pending = Some(mv);
                Ok(())
            }
            _ => Err(ChessError::IllegalOperation(
                "only human players accept registered moves".into(),
            )
            .into()),
        }
    }

    /// Produces the player's next raw move against a board copy. Agents
    /// poll `abort` at cooperative checkpoints and give up without a move
    /// when it is raised.
    pub(crate) fn next_move(&mut self, board: Board, abort: &AtomicBool) -> Result<PlayerMove> {
        match self {
            Self::Human(p) => p.pending.take().ok_or_else(|| {
                ChessError::IllegalOperation(format!("no move registered for {}", p.name)).into()
            }),
            #[cfg(feature = "random")]
            Self::Random(p) => p.choose(board),
            Self::Minimax(p) => p.search(board, abort),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HumanPlayer {
    name: String,
    color: Color,
    score: u32,
    #[serde(skip)]
    pending: Option<PlayerMove>,
}

/// Baseline agent: a uniformly random legal move.
#[cfg(feature = "random")]
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RandomPlayer {
    name: String,
    color: Color,
    score: u32,
}

#[cfg(feature = "random")]
impl RandomPlayer {
    fn choose(&self, mut board: Board) -> Result<PlayerMove> {
        let moves = board.legal_moves(self.color);
        let mv = moves.choose(&mut rand::thread_rng()).ok_or_else(|| {
            ChessError::IllegalOperation(format!("{} has no legal moves", self.name))
        })?;
        Ok(PlayerMove::new(mv.from(), mv.to(), self.color))
    }
}

/// Adversarial agent: depth-limited minimax with alpha-beta pruning.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MinimaxPlayer {
    name: String,
    color: Color,
    score: u32,
    depth: u32,
}

impl MinimaxPlayer {
    fn search(&self, board: Board, abort: &AtomicBool) -> Result<PlayerMove> {
        debug!("{} searching to depth {}", self.name, self.depth);
        let mv = agent::best_move(&board, self.color, self.depth, abort).ok_or_else(|| {
            ChessError::IllegalOperation(format!("{}'s search was cancelled", self.name))
        })?;
        debug!("{} chose {}", self.name, mv);
        Ok(PlayerMove::new(mv.from(), mv.to(), self.color))
    }
}
