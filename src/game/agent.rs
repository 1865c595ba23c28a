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

use log::trace;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::board::{Board, Color, Move};

/// Default lookahead for the minimax player.
pub const MAX_DEPTH: u32 = 4;

const CHECKMATE_WEIGHT: i64 = 1000;
// Stalemating yourself is weighted far worse than stalemating the opponent
// is rewarded, so the agent never trades a playable position for a draw.
const STALEMATE_SELF_WEIGHT: i64 = -5000;
const STALEMATE_OPPONENT_WEIGHT: i64 = 500;

/// Picks the best move for `me` on `board` by alpha-beta minimax of fixed
/// `depth`. Utility is the sum of captured piece values along the path,
/// signed by which side captured, with terminal bonuses for mate and
/// stalemate. Expansion order follows `Board::successors`, which is
/// deterministic for a given board.
///
/// Returns `None` when `abort` is raised mid-search (checked between node
/// expansions) or when `me` has no legal moves.
pub fn best_move(board: &Board, me: Color, depth: u32, abort: &AtomicBool) -> Option<Move> {
    let mut alpha = i64::MIN;
    let beta = i64::MAX;
    let mut best: Option<(Move, i64)> = None;
    for (mv, child) in board.successors(me) {
        if abort.load(Ordering::Relaxed) {
            trace!("search aborted at root");
            return None;
        }
        let acc = capture_delta(&mv, &child, me, me);
        let value = minimax(child, !me, depth.saturating_sub(1), acc, alpha, beta, me, abort)?;
        trace!("root {} valued {}", mv, value);
        if best.as_ref().map(|(_, b)| value > *b).unwrap_or(true) {
            best = Some((mv, value));
        }
        alpha = alpha.max(value);
    }
    best.map(|(mv, _)| mv)
}

#[allow(clippy::too_many_arguments)]
fn minimax(
    board: Board,
    to_move: Color,
    depth: u32,
    acc: i64,
    mut alpha: i64,
    mut beta: i64,
    me: Color,
    abort: &AtomicBool,
) -> Option<i64> {
    if abort.load(Ordering::Relaxed) {
        return None;
    }
    if depth == 0 {
        return Some(acc);
    }

    let maximizing = to_move == me;
    let mut best = None;
    for (mv, child) in board.successors(to_move) {
        let next_acc = acc + capture_delta(&mv, &child, to_move, me);
        let value = minimax(child, !to_move, depth - 1, next_acc, alpha, beta, me, abort)?;
        if maximizing {
            best = Some(best.map_or(value, |b: i64| b.max(value)));
            alpha = alpha.max(value);
        } else {
            best = Some(best.map_or(value, |b: i64| b.min(value)));
            beta = beta.min(value);
        }
        if beta <= alpha {
            break;
        }
    }
    match best {
        Some(value) => Some(value),
        // no successors: to_move is mated or stalemated right here
        None => Some(acc + terminal_weight(&board, to_move, me)),
    }
}

fn terminal_weight(board: &Board, to_move: Color, me: Color) -> i64 {
    let mated = board.is_in_check(to_move);
    match (mated, to_move == me) {
        (true, true) => -CHECKMATE_WEIGHT,
        (true, false) => CHECKMATE_WEIGHT,
        (false, true) => STALEMATE_SELF_WEIGHT,
        (false, false) => STALEMATE_OPPONENT_WEIGHT,
    }
}

/// Signed utility contribution of entering a node via `mv`: the captured
/// chessman's points, positive when `mover` is the searching side.
fn capture_delta(mv: &Move, child: &Board, mover: Color, me: Color) -> i64 {
    let Some(captured_id) = mv.captured_id() else {
        return 0;
    };
    let points = child
        .piece_with(captured_id)
        .map(|man| man.points() as i64)
        .unwrap_or(0);
    if mover == me {
        points
    } else {
        -points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Material;
    use crate::board::MoveKind;
    use crate::board::Chessman;
    use crate::board::Square::*;

    #[test]
    fn test_finds_mate_in_one() {
        let mut board = Board::empty();
        board.place(Chessman::new(Material::WK, A1));
        board.place(Chessman::new(Material::WR, E1));
        board.place(Chessman::new(Material::BK, H8));
        board.place(Chessman::new(Material::BP, G7));
        board.place(Chessman::new(Material::BP, H7));

        let abort = AtomicBool::new(false);
        let mv = best_move(&board, Color::White, 2, &abort).unwrap();
        assert_eq!(mv.from(), E1);
        assert_eq!(mv.to(), E8);
        assert!(mv.will_check_opponent());
    }

    #[test]
    fn test_takes_a_hanging_queen() {
        let mut board = Board::empty();
        board.place(Chessman::new(Material::WK, A2));
        board.place(Chessman::new(Material::WR, D1));
        board.place(Chessman::new(Material::BQ, D5));
        board.place(Chessman::new(Material::BK, H8));

        let abort = AtomicBool::new(false);
        let mv = best_move(&board, Color::White, 2, &abort).unwrap();
        assert_eq!(mv.kind(), MoveKind::Capture);
        assert_eq!(mv.to(), D5);
    }

    #[test]
    fn test_declines_a_poisoned_pawn() {
        // taking the d5 pawn loses the rook to the queen behind it
        let mut board = Board::empty();
        board.place(Chessman::new(Material::WK, A2));
        board.place(Chessman::new(Material::WR, D1));
        board.place(Chessman::new(Material::BP, D5));
        board.place(Chessman::new(Material::BQ, D8));
        board.place(Chessman::new(Material::BK, H8));

        let abort = AtomicBool::new(false);
        let mv = best_move(&board, Color::White, 2, &abort).unwrap();
        assert!(!(mv.kind() == MoveKind::Capture && mv.to() == D5));
    }

    #[test]
    fn test_abort_cancels_search() {
        let board = Board::standard();
        let abort = AtomicBool::new(true);
        assert!(best_move(&board, Color::White, 2, &abort).is_none());
    }

    #[test]
    fn test_no_moves_yields_none() {
        // stalemated side has nothing to search
        let mut board = Board::empty();
        board.place(Chessman::new(Material::WK, H1));
        board.place(Chessman::new(Material::BK, F2));
        board.place(Chessman::new(Material::BQ, G3));
        let abort = AtomicBool::new(false);
        assert!(best_move(&board, Color::White, 2, &abort).is_none());
    }

    #[test]
    fn test_deterministic_for_identical_boards() {
        let board = Board::standard();
        let abort = AtomicBool::new(false);
        let first = best_move(&board, Color::White, 2, &abort).unwrap();
        let second = best_move(&board, Color::White, 2, &abort).unwrap();
        assert_eq!(first, second);
    }
}
