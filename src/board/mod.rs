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

//! Chess board with identifier-addressed pieces and invertible moves
//!
//! A _board_ holds the chessmen in play and the chessmen captured so far,
//! and provides the mechanisms the game layer builds on:
//!
//! [x] Standard chess rules, including castling, en passant and the
//!     two-square pawn advance
//! [x] Candidate-move generation per piece kind
//! [x] Legality filtering via hypothetical execution and self-check
//!     detection
//! [x] Check, checkmate and stalemate predicates
//! [x] Perfect move inversion: every executed move can be undone, restoring
//!     the board exactly
//! [x] Lazy successor enumeration for adversarial search
//! [ ] Pawn promotion (a pawn reaching its last rank is stuck for now)
//! [ ] Draw bookkeeping (threefold repetition, fifty-move rule,
//!     insufficient material)
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates of a single square on an 8-by-8
//!   board, a pair of `File` (`FileA` .. `FileH`) and `Rank` (`Rank1` ..
//!   `Rank8`), named `a1` .. `h8`. Directional stepping is parameterised by
//!   a `Quadrant` and a point-of-view `Color`, so the same expression walks
//!   "forward" for either side; stepping off the board yields `None`.
//!
//! * A `Chessman` is a piece with identity: its `Material` (color and
//!   `Piece` kind), its square, a move counter, and for pawns an en-passant
//!   vulnerability flag. Chessmen are addressed by `ChessmanId`, a random
//!   identifier assigned at construction, so moves recorded against one
//!   board replay against any copy of it.
//!
//! * A `Move` is a tagged, self-contained record of one legal action with
//!   enough information to execute and to undo itself: regular moves,
//!   two-square advances, captures, en-passant captures and castlings.
//!   `PlayerMove` is the raw from/to request a player submits before it is
//!   resolved into a `Move`.
//!
//! * The `Board` owns the chessmen and exposes queries (`piece_at`,
//!   `piece_with`, check predicates, attacked squares) and mutations
//!   (`place`, `vacate`, `capture`, `execute`, `undo`). It knows nothing
//!   about turns or players; that lives in the `game` module.

mod chessman;
mod material;
mod movegen;
mod moves;
mod position;
mod square;

pub use chessman::*;
pub use material::*;
pub use moves::*;
pub use position::*;
pub use square::*;
