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
use strum::IntoEnumIterator;

use crate::errors::ChessError;

use super::chessman::{Chessman, ChessmanId};
use super::material::{Color, Piece};
use super::moves::Move;
use super::position::Board;
use super::square::{Quadrant, Rank, Square};

use Piece::*;

impl Chessman {
    /// Geometrically valid moves for this chessman on `board`, ignoring
    /// own-king safety. Castlings are not candidates; the legality filter
    /// appends them for kings.
    pub fn candidate_moves(&self, board: &Board) -> Vec<Move> {
        match self.piece() {
            Rook => self.slide(board, |from, q| from.axial_step(1, q, self.color())),
            Bishop => self.slide(board, |from, q| from.radial_step(1, 1, q, self.color())),
            Queen => {
                let mut moves = self.slide(board, |from, q| from.axial_step(1, q, self.color()));
                moves.extend(self.slide(board, |from, q| from.radial_step(1, 1, q, self.color())));
                moves
            }
            Knight => self.knight_moves(board),
            King => self.king_moves(board),
            Pawn => self.pawn_moves(board),
        }
    }

    /// Walks outward one quadrant at a time: empty squares accumulate
    /// regular moves, the first enemy chessman a capture, an allied
    /// chessman stops the walk.
    fn slide<F>(&self, board: &Board, step: F) -> Vec<Move>
    where
        F: Fn(Square, Quadrant) -> Option<Square>,
    {
        let mut moves = Vec::new();
        for quadrant in Quadrant::iter() {
            let mut current = self.square();
            while let Some(next) = step(current, quadrant) {
                match board.piece_at(next) {
                    None => {
                        moves.push(self.regular_to(next));
                        current = next;
                    }
                    Some(target) if target.color() != self.color() => {
                        moves.push(self.capture_of(target, next));
                        break;
                    }
                    Some(_) => break,
                }
            }
        }
        moves
    }

    fn knight_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::new();
        for quadrant in Quadrant::iter() {
            for (df, dr) in [(1, 2), (2, 1)] {
                if let Some(to) = self.square().radial_step(df, dr, quadrant, self.color()) {
                    self.try_emit(board, to, &mut moves);
                }
            }
        }
        moves
    }

    fn king_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::new();
        for to in self.square().surrounding() {
            self.try_emit(board, to, &mut moves);
        }
        // Never step next to the opposing king; this keeps check detection
        // free of king-vs-king recursion.
        if let Some(enemy_king) = board.king_of(!self.color()) {
            let danger: Vec<Square> = enemy_king.square().surrounding().collect();
            moves.retain(|mv| !danger.contains(&mv.to()));
        }
        moves
    }

    fn pawn_moves(&self, board: &Board) -> Vec<Move> {
        let color = self.color();
        let from = self.square();
        // Promotion is not supported yet; a pawn on its last rank is stuck.
        if from.rank() == Rank::last_rank(color) {
            return Vec::new();
        }
        let mut moves = Vec::new();
        if let Some(one) = from.forward(1, color) {
            if board.piece_at(one).is_none() {
                moves.push(self.regular_to(one));
                if self.move_count() == 0 {
                    if let Some(two) = from.forward(2, color) {
                        if board.piece_at(two).is_none() {
                            moves.push(Move::TwoSquareAdvance {
                                piece_id: self.id(),
                                from,
                                to: two,
                                will_check_opponent: false,
                            });
                        }
                    }
                }
            }
        }
        // forward diagonals: quadrant I is right-forward, II left-forward
        for quadrant in [Quadrant::I, Quadrant::II] {
            let Some(diagonal) = from.radial_step(1, 1, quadrant, color) else {
                continue;
            };
            match board.piece_at(diagonal) {
                Some(target) if target.color() != color => {
                    moves.push(self.capture_of(target, diagonal));
                }
                Some(_) => {}
                None => {
                    let beside = Square::new(diagonal.file(), from.rank());
                    if let Some(target) = board.piece_at(beside) {
                        if target.color() != color
                            && target.piece().is_pawn()
                            && target.en_passant()
                        {
                            moves.push(Move::EnPassant {
                                piece_id: self.id(),
                                from,
                                to: diagonal,
                                captured_id: target.id(),
                                will_check_opponent: false,
                            });
                        }
                    }
                }
            }
        }
        moves
    }

    fn try_emit(&self, board: &Board, to: Square, moves: &mut Vec<Move>) {
        match board.piece_at(to) {
            None => moves.push(self.regular_to(to)),
            Some(target) if target.color() != self.color() => {
                moves.push(self.capture_of(target, to));
            }
            Some(_) => {}
        }
    }

    fn regular_to(&self, to: Square) -> Move {
        Move::Regular {
            piece_id: self.id(),
            from: self.square(),
            to,
            will_check_opponent: false,
        }
    }

    fn capture_of(&self, target: &Chessman, to: Square) -> Move {
        Move::Capture {
            piece_id: self.id(),
            from: self.square(),
            to,
            captured_id: target.id(),
            will_check_opponent: false,
        }
    }
}

impl Board {
    /// All legal moves for `color`, concatenated over its active chessmen.
    pub fn legal_moves(&mut self, color: Color) -> Vec<Move> {
        let ids: Vec<ChessmanId> = self.active_pieces_of(color).map(Chessman::id).collect();
        ids.into_iter()
            .flat_map(|id| {
                self.legal_moves_of(id)
                    .expect("Board::legal_moves - active chessman disappeared")
            })
            .collect()
    }

    /// Filters the chessman's candidate moves down to legal ones by
    /// executing each candidate, discarding those that leave the mover in
    /// check, marking those that check the opponent, and undoing. The board
    /// is restored exactly. Kings additionally receive their castlings.
    pub fn legal_moves_of(&mut self, id: ChessmanId) -> Result<Vec<Move>> {
        let man = self
            .active_pieces()
            .find(|man| man.id() == id)
            .cloned()
            .ok_or_else(|| ChessError::NotFound(format!("no active chessman {id}")))?;
        let mut legal = Vec::new();
        for mut mv in man.candidate_moves(self) {
            self.execute(&mv)?;
            let safe = !self.is_in_check(man.color());
            if safe && self.is_in_check(!man.color()) {
                mv.set_will_check_opponent(true);
            }
            self.undo(&mv)?;
            if safe {
                legal.push(mv);
            }
        }
        if man.piece().is_king() {
            legal.extend(self.castlings(&man)?);
        }
        Ok(legal)
    }

    /// Legal castlings for `king`: an unmoved, unchecked king, an unmoved
    /// rook on its initial corner 3 (king-side) or 4 (queen-side) squares
    /// along a rank, every square between them empty, and the two squares
    /// the king crosses unattacked.
    fn castlings(&mut self, king: &Chessman) -> Result<Vec<Move>> {
        let color = king.color();
        if king.move_count() != 0 || self.is_in_check(color) {
            return Ok(Vec::new());
        }
        let mut castlings = Vec::new();
        for quadrant in [Quadrant::I, Quadrant::III] {
            for distance in [3usize, 4] {
                let Some(rook_from) = king.square().axial_step(distance, quadrant, color) else {
                    continue;
                };
                let Some(rook) = self.piece_at(rook_from) else {
                    continue;
                };
                if rook.color() != color
                    || !rook.piece().is_rook()
                    || rook.move_count() != 0
                    || !rook.is_at_possible_initial_position()
                {
                    continue;
                }
                let rook_id = rook.id();
                let lane_clear = (1..distance).all(|d| {
                    let square = king
                        .square()
                        .axial_step(d, quadrant, color)
                        .expect("Board::castlings - lane square on board");
                    self.piece_at(square).is_none()
                });
                if !lane_clear {
                    continue;
                }
                let path_safe = (1..=2).all(|d| {
                    let square = king
                        .square()
                        .axial_step(d, quadrant, color)
                        .expect("Board::castlings - path square on board");
                    !self.is_square_attacked(square, color)
                });
                if !path_safe {
                    continue;
                }
                let king_to = king
                    .square()
                    .axial_step(2, quadrant, color)
                    .expect("Board::castlings - king destination on board");
                let rook_to = king
                    .square()
                    .axial_step(1, quadrant, color)
                    .expect("Board::castlings - rook destination on board");
                let mut mv = Move::Castling {
                    king_id: king.id(),
                    king_from: king.square(),
                    king_to,
                    rook_id,
                    rook_from,
                    rook_to,
                    will_check_opponent: false,
                };
                self.execute(&mv)?;
                let checks = self.is_in_check(!color);
                self.undo(&mv)?;
                mv.set_will_check_opponent(checks);
                castlings.push(mv);
            }
        }
        Ok(castlings)
    }
}
