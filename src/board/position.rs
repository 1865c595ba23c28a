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
use std::fmt;

use crate::errors::ChessError;

use super::chessman::{Chessman, ChessmanId};
use super::material::{Color, Material, Piece};
use super::moves::Move;
use super::square::{Rank, Square};

use Piece::*;

/// Container of the chessmen in play and the chessmen captured so far.
///
/// The board has no game-level awareness: no turn, no players, no history.
/// Invariants it maintains:
///
/// * no two active chessmen share a square;
/// * identifiers are unique across active and captured chessmen;
/// * capturing moves a chessman from active to captured, uncapturing
///   reverses it, and a captured chessman keeps its square, move count and
///   en-passant flag so that undoing a capture restores it exactly.
#[derive(Debug, Clone)]
pub struct Board {
    active: Vec<Chessman>,
    captured: Vec<Chessman>,
}

impl Board {
    pub fn empty() -> Self {
        Self {
            active: Vec::new(),
            captured: Vec::new(),
        }
    }

    /// Rebuilds a board from already-validated collections, for snapshot
    /// decoding. Callers guarantee the board invariants hold.
    pub(crate) fn from_collections(active: Vec<Chessman>, captured: Vec<Chessman>) -> Self {
        Self { active, captured }
    }

    /// The standard starting position, 32 freshly-identified chessmen.
    pub fn standard() -> Self {
        const BACK_RANK: [Piece; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            let back = Rank::back_rank(color);
            let pawns = Rank::pawn_rank(color);
            for (index, piece) in BACK_RANK.into_iter().enumerate() {
                let square = Square::from_index(back.to_index() * 8 + index);
                board.place(Chessman::new(Material::new(color, piece), square));
            }
            for index in 0..8 {
                let square = Square::from_index(pawns.to_index() * 8 + index);
                board.place(Chessman::new(Material::new(color, Pawn), square));
            }
        }
        board
    }

    /// Inserts a chessman. A chessman already occupying the target square is
    /// removed first (not captured).
    pub fn place(&mut self, man: Chessman) {
        self.vacate(man.square());
        self.active.push(man);
    }

    /// Removes the active chessman on `square`, if any. Not a capture.
    pub fn vacate(&mut self, square: Square) -> bool {
        match self.active.iter().position(|man| man.square() == square) {
            Some(index) => {
                self.active.remove(index);
                true
            }
            None => false,
        }
    }

    /// Moves an active chessman into the captured collection.
    pub fn capture(&mut self, id: ChessmanId) -> Result<()> {
        let index = self
            .active
            .iter()
            .position(|man| man.id() == id)
            .ok_or_else(|| ChessError::NotFound(format!("no active chessman {id}")))?;
        let man = self.active.remove(index);
        self.captured.push(man);
        Ok(())
    }

    /// Moves a captured chessman back into play on the square it held when
    /// it was captured.
    pub fn uncapture(&mut self, id: ChessmanId) -> Result<()> {
        let index = self
            .captured
            .iter()
            .position(|man| man.id() == id)
            .ok_or_else(|| ChessError::NotFound(format!("no captured chessman {id}")))?;
        let man = self.captured.remove(index);
        self.active.push(man);
        Ok(())
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Chessman> {
        self.active.iter().find(|man| man.square() == square)
    }

    /// Looks a chessman up by identifier across active and captured.
    pub fn piece_with(&self, id: ChessmanId) -> Option<&Chessman> {
        self.active
            .iter()
            .chain(self.captured.iter())
            .find(|man| man.id() == id)
    }

    pub fn active_pieces(&self) -> impl Iterator<Item = &Chessman> {
        self.active.iter()
    }

    pub fn active_pieces_of(&self, color: Color) -> impl Iterator<Item = &Chessman> {
        self.active.iter().filter(move |man| man.color() == color)
    }

    pub fn captured_pieces(&self) -> impl Iterator<Item = &Chessman> {
        self.captured.iter()
    }

    pub fn king_of(&self, color: Color) -> Option<&Chessman> {
        self.active
            .iter()
            .find(|man| man.color() == color && man.piece().is_king())
    }

    fn active_mut(&mut self, id: ChessmanId) -> Result<&mut Chessman> {
        self.active
            .iter_mut()
            .find(|man| man.id() == id)
            .ok_or_else(|| ChessError::NotFound(format!("no active chessman {id}")).into())
    }

    pub(crate) fn man_mut(&mut self, id: ChessmanId) -> Option<&mut Chessman> {
        self.active
            .iter_mut()
            .chain(self.captured.iter_mut())
            .find(|man| man.id() == id)
    }

    /// Clears the en-passant flag on every active pawn.
    pub(crate) fn disarm_en_passant(&mut self) {
        for man in self.active.iter_mut() {
            man.set_en_passant(false);
        }
    }

    fn advance(&mut self, id: ChessmanId, to: Square) -> Result<()> {
        let man = self.active_mut(id)?;
        man.set_square(to);
        man.record_move();
        Ok(())
    }

    fn retreat(&mut self, id: ChessmanId, from: Square) -> Result<()> {
        let man = self.active_mut(id)?;
        man.set_square(from);
        man.unrecord_move();
        Ok(())
    }

    /// Applies `mv` and returns the score delta: the captured chessman's
    /// point value for capture-like moves, zero otherwise.
    pub fn execute(&mut self, mv: &Move) -> Result<u32> {
        match mv {
            Move::Regular { piece_id, to, .. } => {
                self.advance(*piece_id, *to)?;
                Ok(0)
            }
            Move::TwoSquareAdvance { piece_id, to, .. } => {
                self.advance(*piece_id, *to)?;
                self.active_mut(*piece_id)?.set_en_passant(true);
                Ok(0)
            }
            Move::Capture {
                piece_id,
                to,
                captured_id,
                ..
            }
            | Move::EnPassant {
                piece_id,
                to,
                captured_id,
                ..
            } => {
                self.capture(*captured_id)?;
                self.advance(*piece_id, *to)?;
                let points = self
                    .piece_with(*captured_id)
                    .map(Chessman::points)
                    .unwrap_or(0);
                Ok(points)
            }
            Move::Castling {
                king_id,
                king_to,
                rook_id,
                rook_to,
                ..
            } => {
                self.advance(*king_id, *king_to)?;
                self.advance(*rook_id, *rook_to)?;
                Ok(0)
            }
        }
    }

    /// Reverts `mv`, restoring the board to its state before `execute`.
    /// Returns the score delta that `execute` reported.
    pub fn undo(&mut self, mv: &Move) -> Result<u32> {
        match mv {
            Move::Regular { piece_id, from, .. } => {
                self.retreat(*piece_id, *from)?;
                Ok(0)
            }
            Move::TwoSquareAdvance { piece_id, from, .. } => {
                self.active_mut(*piece_id)?.set_en_passant(false);
                self.retreat(*piece_id, *from)?;
                Ok(0)
            }
            Move::Capture {
                piece_id,
                from,
                captured_id,
                ..
            }
            | Move::EnPassant {
                piece_id,
                from,
                captured_id,
                ..
            } => {
                self.retreat(*piece_id, *from)?;
                self.uncapture(*captured_id)?;
                let points = self
                    .piece_with(*captured_id)
                    .map(Chessman::points)
                    .unwrap_or(0);
                Ok(points)
            }
            Move::Castling {
                king_id,
                king_from,
                rook_id,
                rook_from,
                ..
            } => {
                self.retreat(*rook_id, *rook_from)?;
                self.retreat(*king_id, *king_from)?;
                Ok(0)
            }
        }
    }

    /// True iff some opposing non-king chessman has a candidate capture of
    /// `color`'s king. Kings are excluded as attackers; king adjacency is
    /// prevented at candidate generation instead.
    pub fn is_in_check(&self, color: Color) -> bool {
        let king_id = match self.king_of(color) {
            Some(king) => king.id(),
            None => return false,
        };
        self.active_pieces_of(!color)
            .filter(|man| !man.piece().is_king())
            .flat_map(|man| man.candidate_moves(self))
            .any(|mv| mv.captured_id() == Some(king_id))
    }

    /// True iff `square` is empty and some chessman opposing `pov` has a
    /// candidate non-capture move onto it. Pawns never threaten empty
    /// squares this way since their captures are generated as captures;
    /// castling passage only cares about squares the king traverses.
    pub fn is_square_attacked(&self, square: Square, pov: Color) -> bool {
        if self.piece_at(square).is_some() {
            return false;
        }
        self.active_pieces_of(!pov)
            .filter(|man| !man.piece().is_pawn())
            .flat_map(|man| man.candidate_moves(self))
            .any(|mv| matches!(mv, Move::Regular { to, .. } if to == square))
    }

    pub fn is_checkmated(&mut self, color: Color) -> bool {
        self.is_in_check(color) && self.legal_moves(color).is_empty()
    }

    pub fn is_stalemated(&mut self, color: Color) -> bool {
        !self.is_in_check(color) && self.legal_moves(color).is_empty()
    }

    /// Lazily yields each legal move for `color` together with the board it
    /// produces, leaving `self` untouched.
    pub fn successors(&self, color: Color) -> impl Iterator<Item = (Move, Board)> + '_ {
        let moves = self.clone().legal_moves(color);
        moves.into_iter().map(move |mv| {
            let mut child = self.clone();
            child
                .execute(&mv)
                .expect("Board::successors - legal move must replay");
            (mv, child)
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let square = Square::from_index(rank * 8 + file);
                let glyph = self
                    .piece_at(square)
                    .map(|man| man.material().glyph())
                    .unwrap_or('.');
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::square::Square::*;
    use pretty_assertions::assert_eq;

    fn fingerprint(board: &Board) -> Vec<(ChessmanId, Square, u32, bool, bool)> {
        let mut all: Vec<_> = board
            .active_pieces()
            .map(|man| (man.id(), man.square(), man.move_count(), man.en_passant(), true))
            .chain(
                board
                    .captured_pieces()
                    .map(|man| (man.id(), man.square(), man.move_count(), man.en_passant(), false)),
            )
            .collect();
        all.sort_by_key(|entry| format!("{}", entry.0));
        all
    }

    #[test]
    fn test_standard_setup() {
        let board = Board::standard();
        assert_eq!(board.active_pieces().count(), 32);
        assert_eq!(board.captured_pieces().count(), 0);
        assert_eq!(board.piece_at(E1).unwrap().material(), Material::WK);
        assert_eq!(board.piece_at(D8).unwrap().material(), Material::BQ);
        assert_eq!(board.piece_at(A2).unwrap().material(), Material::WP);
        assert!(board.piece_at(E4).is_none());
        assert!(board
            .active_pieces()
            .all(|man| man.is_at_possible_initial_position()));
    }

    #[test]
    fn test_place_replaces_occupant() {
        let mut board = Board::empty();
        board.place(Chessman::new(Material::WP, E4));
        board.place(Chessman::new(Material::BQ, E4));
        assert_eq!(board.active_pieces().count(), 1);
        assert_eq!(board.piece_at(E4).unwrap().material(), Material::BQ);
    }

    #[test]
    fn test_vacate() {
        let mut board = Board::empty();
        board.place(Chessman::new(Material::WP, E4));
        assert!(board.vacate(E4));
        assert!(!board.vacate(E4));
        assert_eq!(board.active_pieces().count(), 0);
        assert_eq!(board.captured_pieces().count(), 0);
    }

    #[test]
    fn test_capture_and_uncapture() {
        let mut board = Board::empty();
        let pawn = Chessman::new(Material::BP, D5);
        let id = pawn.id();
        board.place(pawn);

        board.capture(id).unwrap();
        assert!(board.piece_at(D5).is_none());
        assert_eq!(board.captured_pieces().count(), 1);
        assert!(board.piece_with(id).is_some());

        board.uncapture(id).unwrap();
        assert_eq!(board.piece_at(D5).unwrap().id(), id);

        let err = board.uncapture(id).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChessError>(),
            Some(ChessError::NotFound(_))
        ));
    }

    #[test]
    fn test_capture_requires_active() {
        let mut board = Board::empty();
        let ghost = Chessman::new(Material::WN, B1);
        let err = board.capture(ghost.id()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChessError>(),
            Some(ChessError::NotFound(_))
        ));
    }

    #[test]
    fn test_execute_undo_regular_inversion() {
        let mut board = Board::standard();
        let before = fingerprint(&board);
        let id = board.piece_at(G1).unwrap().id();
        let mv = Move::Regular {
            piece_id: id,
            from: G1,
            to: F3,
            will_check_opponent: false,
        };
        assert_eq!(board.execute(&mv).unwrap(), 0);
        assert_eq!(board.piece_at(F3).unwrap().move_count(), 1);
        assert_eq!(board.undo(&mv).unwrap(), 0);
        assert_eq!(fingerprint(&board), before);
    }

    #[test]
    fn test_execute_undo_capture_inversion() {
        let mut board = Board::empty();
        let rook = Chessman::new(Material::WR, A1);
        let queen = Chessman::new(Material::BQ, A8);
        let (rook_id, queen_id) = (rook.id(), queen.id());
        board.place(rook);
        board.place(queen);
        let before = fingerprint(&board);

        let mv = Move::Capture {
            piece_id: rook_id,
            from: A1,
            to: A8,
            captured_id: queen_id,
            will_check_opponent: false,
        };
        assert_eq!(board.execute(&mv).unwrap(), 9);
        assert_eq!(board.piece_at(A8).unwrap().id(), rook_id);
        assert_eq!(board.captured_pieces().count(), 1);

        assert_eq!(board.undo(&mv).unwrap(), 9);
        assert_eq!(fingerprint(&board), before);
        assert_eq!(board.piece_at(A8).unwrap().id(), queen_id);
    }

    #[test]
    fn test_execute_undo_two_square_advance() {
        let mut board = Board::standard();
        let before = fingerprint(&board);
        let id = board.piece_at(E2).unwrap().id();
        let mv = Move::TwoSquareAdvance {
            piece_id: id,
            from: E2,
            to: E4,
            will_check_opponent: false,
        };
        board.execute(&mv).unwrap();
        assert!(board.piece_at(E4).unwrap().en_passant());
        board.undo(&mv).unwrap();
        assert_eq!(fingerprint(&board), before);
        assert!(!board.piece_at(E2).unwrap().en_passant());
    }

    #[test]
    fn test_execute_undo_castling() {
        let mut board = Board::empty();
        let king = Chessman::new(Material::WK, E1);
        let rook = Chessman::new(Material::WR, H1);
        let (king_id, rook_id) = (king.id(), rook.id());
        board.place(king);
        board.place(rook);
        let before = fingerprint(&board);

        let mv = Move::Castling {
            king_id,
            king_from: E1,
            king_to: G1,
            rook_id,
            rook_from: H1,
            rook_to: F1,
            will_check_opponent: false,
        };
        assert_eq!(board.execute(&mv).unwrap(), 0);
        assert_eq!(board.piece_at(G1).unwrap().id(), king_id);
        assert_eq!(board.piece_at(F1).unwrap().id(), rook_id);
        assert_eq!(board.piece_at(G1).unwrap().move_count(), 1);
        assert_eq!(board.piece_at(F1).unwrap().move_count(), 1);

        board.undo(&mv).unwrap();
        assert_eq!(fingerprint(&board), before);
        assert_eq!(board.piece_at(E1).unwrap().move_count(), 0);
        assert_eq!(board.piece_at(H1).unwrap().move_count(), 0);
    }

    #[test]
    fn test_move_count_tracks_execute_and_undo() {
        let mut board = Board::standard();
        let id = board.piece_at(B1).unwrap().id();
        let out = Move::Regular {
            piece_id: id,
            from: B1,
            to: C3,
            will_check_opponent: false,
        };
        let back = Move::Regular {
            piece_id: id,
            from: C3,
            to: B1,
            will_check_opponent: false,
        };
        for _ in 0..3 {
            board.execute(&out).unwrap();
            board.execute(&back).unwrap();
        }
        assert_eq!(board.piece_with(id).unwrap().move_count(), 6);
        board.undo(&back).unwrap();
        board.undo(&out).unwrap();
        assert_eq!(board.piece_with(id).unwrap().move_count(), 4);
    }

    #[test]
    fn test_check_detection() {
        let mut board = Board::empty();
        board.place(Chessman::new(Material::WK, E1));
        board.place(Chessman::new(Material::BR, E8));
        assert!(board.is_in_check(Color::White));
        assert!(!board.is_in_check(Color::Black));

        // interpose a pawn
        board.place(Chessman::new(Material::WP, E2));
        assert!(!board.is_in_check(Color::White));
        board.vacate(E2);

        // knights jump
        board.place(Chessman::new(Material::BN, D3));
        board.vacate(E8);
        assert!(board.is_in_check(Color::White));
    }

    #[test]
    fn test_square_attacked() {
        let mut board = Board::empty();
        board.place(Chessman::new(Material::BR, D8));
        assert!(board.is_square_attacked(D1, Color::White));
        assert!(!board.is_square_attacked(E1, Color::White));

        // occupied squares are never "attacked"
        board.place(Chessman::new(Material::WN, D1));
        assert!(!board.is_square_attacked(D1, Color::White));
    }

    #[test]
    fn test_pawns_do_not_attack_empty_squares() {
        let mut board = Board::empty();
        board.place(Chessman::new(Material::BP, D4));
        assert!(!board.is_square_attacked(C3, Color::White));
        assert!(!board.is_square_attacked(E3, Color::White));
    }

    #[test]
    fn test_display_renders_the_grid() {
        let rendered = Board::standard().to_string();
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows[0], "rnbqkbnr");
        assert_eq!(rows[1], "pppppppp");
        assert_eq!(rows[4], "........");
        assert_eq!(rows[7], "RNBQKBNR");
    }

    #[test]
    fn test_successors_leave_board_untouched() {
        let board = Board::standard();
        let children: Vec<_> = board.successors(Color::White).collect();
        assert_eq!(children.len(), 20);
        assert_eq!(board.active_pieces().count(), 32);
        for (mv, child) in &children {
            assert!(child.piece_with(mv.piece_id()).unwrap().square() == mv.to());
        }
    }
}
