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

use super::chessman::ChessmanId;
use super::material::Color;
use super::square::Square;

/// An internal move, fully resolved against the board it was generated for.
/// Moves own their squares and reference chessmen by identifier, so a move
/// can replay against any board copy that still holds the same chessmen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    Regular {
        piece_id: ChessmanId,
        from: Square,
        to: Square,
        will_check_opponent: bool,
    },
    /// Pawn-only initial advance by two ranks; arms the pawn's en-passant
    /// vulnerability for the next half-move.
    TwoSquareAdvance {
        piece_id: ChessmanId,
        from: Square,
        to: Square,
        will_check_opponent: bool,
    },
    Capture {
        piece_id: ChessmanId,
        from: Square,
        to: Square,
        captured_id: ChessmanId,
        will_check_opponent: bool,
    },
    /// Pawn-only capture onto an empty square; the captured pawn sits beside
    /// the moving pawn, on the same rank it started the half-move on.
    EnPassant {
        piece_id: ChessmanId,
        from: Square,
        to: Square,
        captured_id: ChessmanId,
        will_check_opponent: bool,
    },
    /// King moves two squares toward a rook; the rook lands on the other
    /// side of the king.
    Castling {
        king_id: ChessmanId,
        king_from: Square,
        king_to: Square,
        rook_id: ChessmanId,
        rook_from: Square,
        rook_to: Square,
        will_check_opponent: bool,
    },
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Regular { .. } => MoveKind::RegularMove,
            Move::TwoSquareAdvance { .. } => MoveKind::TwoSquareAdvance,
            Move::Capture { .. } => MoveKind::Capture,
            Move::EnPassant { .. } => MoveKind::EnPassantCapture,
            Move::Castling { .. } => MoveKind::Castling,
        }
    }

    /// The chessman performing the move; the king for castlings.
    pub fn piece_id(&self) -> ChessmanId {
        match self {
            Move::Regular { piece_id, .. }
            | Move::TwoSquareAdvance { piece_id, .. }
            | Move::Capture { piece_id, .. }
            | Move::EnPassant { piece_id, .. } => *piece_id,
            Move::Castling { king_id, .. } => *king_id,
        }
    }

    pub fn from(&self) -> Square {
        match self {
            Move::Regular { from, .. }
            | Move::TwoSquareAdvance { from, .. }
            | Move::Capture { from, .. }
            | Move::EnPassant { from, .. } => *from,
            Move::Castling { king_from, .. } => *king_from,
        }
    }

    pub fn to(&self) -> Square {
        match self {
            Move::Regular { to, .. }
            | Move::TwoSquareAdvance { to, .. }
            | Move::Capture { to, .. }
            | Move::EnPassant { to, .. } => *to,
            Move::Castling { king_to, .. } => *king_to,
        }
    }

    pub fn captured_id(&self) -> Option<ChessmanId> {
        match self {
            Move::Capture { captured_id, .. } | Move::EnPassant { captured_id, .. } => {
                Some(*captured_id)
            }
            _ => None,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured_id().is_some()
    }

    pub fn will_check_opponent(&self) -> bool {
        match self {
            Move::Regular {
                will_check_opponent,
                ..
            }
            | Move::TwoSquareAdvance {
                will_check_opponent,
                ..
            }
            | Move::Capture {
                will_check_opponent,
                ..
            }
            | Move::EnPassant {
                will_check_opponent,
                ..
            }
            | Move::Castling {
                will_check_opponent,
                ..
            } => *will_check_opponent,
        }
    }

    pub(crate) fn set_will_check_opponent(&mut self, value: bool) {
        match self {
            Move::Regular {
                will_check_opponent,
                ..
            }
            | Move::TwoSquareAdvance {
                will_check_opponent,
                ..
            }
            | Move::Capture {
                will_check_opponent,
                ..
            }
            | Move::EnPassant {
                will_check_opponent,
                ..
            }
            | Move::Castling {
                will_check_opponent,
                ..
            } => *will_check_opponent = value,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} to {}", self.kind(), self.from(), self.to())
    }
}

/// Wire-level move discriminator, also the tag in encoded snapshots.
#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    RegularMove,
    TwoSquareAdvance,
    Capture,
    EnPassantCapture,
    Castling,
}

/// The raw request a player hands to the controller: source and destination
/// squares plus the color making the request. The controller resolves it
/// into an internal [`Move`] against the piece's legal moves.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PlayerMove {
    pub from: Square,
    pub to: Square,
    pub color: Color,
}

impl PlayerMove {
    pub fn new(from: Square, to: Square, color: Color) -> Self {
        Self { from, to, color }
    }
}

impl fmt::Display for PlayerMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} to {}", self.color, self.from, self.to)
    }
}
