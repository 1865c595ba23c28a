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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::material::{Color, Material, Piece};
use super::square::Square;

use Square::*;

/// Opaque identifier assigned to a chessman at construction. Moves refer to
/// chessmen by id rather than by reference, so a move recorded against one
/// board replays against any copy that still contains the same chessmen.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ChessmanId(Uuid);

impl ChessmanId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ChessmanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A piece on (or captured off) the board: kind, color, square, how many
/// times it has moved, and for pawns whether it just completed a two-square
/// advance and is vulnerable to en-passant capture.
#[derive(Debug, Clone)]
pub struct Chessman {
    id: ChessmanId,
    material: Material,
    square: Square,
    move_count: u32,
    en_passant: bool,
}

impl Chessman {
    pub fn new(material: Material, square: Square) -> Self {
        Self {
            id: ChessmanId::random(),
            material,
            square,
            move_count: 0,
            en_passant: false,
        }
    }

    /// Reconstructs a chessman with a known identity, for snapshot decoding.
    pub fn with_id(
        id: ChessmanId,
        material: Material,
        square: Square,
        move_count: u32,
        en_passant: bool,
    ) -> Self {
        Self {
            id,
            material,
            square,
            move_count,
            en_passant,
        }
    }

    #[inline]
    pub fn id(&self) -> ChessmanId {
        self.id
    }
    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }
    #[inline]
    pub fn color(&self) -> Color {
        self.material.color()
    }
    #[inline]
    pub fn piece(&self) -> Piece {
        self.material.piece()
    }
    #[inline]
    pub fn square(&self) -> Square {
        self.square
    }
    #[inline]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }
    #[inline]
    pub fn points(&self) -> u32 {
        self.material.points()
    }

    /// Whether this pawn just completed a two-square advance. Always false
    /// for other kinds.
    #[inline]
    pub fn en_passant(&self) -> bool {
        self.en_passant
    }

    pub(crate) fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    pub(crate) fn set_en_passant(&mut self, value: bool) {
        self.en_passant = value && self.piece().is_pawn();
    }

    pub(crate) fn record_move(&mut self) {
        self.move_count += 1;
    }

    pub(crate) fn unrecord_move(&mut self) {
        self.move_count = self.move_count.saturating_sub(1);
    }

    /// True if the current square is one of the squares a chessman of this
    /// kind and color starts a standard game from.
    pub fn is_at_possible_initial_position(&self) -> bool {
        INITIAL_SQUARES
            .get(&self.material)
            .map(|squares| squares.contains(&self.square))
            .unwrap_or(false)
    }
}

/// Two chessmen are equal iff they are the same kind of piece with the same
/// identifier, regardless of where they stand or how often they moved.
impl PartialEq for Chessman {
    fn eq(&self, other: &Self) -> bool {
        self.piece() == other.piece() && self.id == other.id
    }
}

impl Eq for Chessman {}

impl fmt::Display for Chessman {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.color(), self.piece(), self.square)
    }
}

pub(crate) static INITIAL_SQUARES: Lazy<HashMap<Material, Vec<Square>>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(Material::WR, vec![A1, H1]);
    map.insert(Material::WN, vec![B1, G1]);
    map.insert(Material::WB, vec![C1, F1]);
    map.insert(Material::WQ, vec![D1]);
    map.insert(Material::WK, vec![E1]);
    map.insert(Material::WP, vec![A2, B2, C2, D2, E2, F2, G2, H2]);
    map.insert(Material::BR, vec![A8, H8]);
    map.insert(Material::BN, vec![B8, G8]);
    map.insert(Material::BB, vec![C8, F8]);
    map.insert(Material::BQ, vec![D8]);
    map.insert(Material::BK, vec![E8]);
    map.insert(Material::BP, vec![A7, B7, C7, D7, E7, F7, G7, H7]);
    map
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let a = Chessman::new(Material::WN, B1);
        let b = Chessman::new(Material::WN, B1);
        assert_ne!(a, b);

        let mut moved = a.clone();
        moved.set_square(C3);
        moved.record_move();
        assert_eq!(a, moved);
    }

    #[test]
    fn test_move_count_floors_at_zero() {
        let mut man = Chessman::new(Material::WP, E2);
        man.unrecord_move();
        assert_eq!(man.move_count(), 0);
        man.record_move();
        man.record_move();
        man.unrecord_move();
        assert_eq!(man.move_count(), 1);
    }

    #[test]
    fn test_en_passant_only_for_pawns() {
        let mut pawn = Chessman::new(Material::WP, E2);
        pawn.set_en_passant(true);
        assert!(pawn.en_passant());

        let mut rook = Chessman::new(Material::WR, A1);
        rook.set_en_passant(true);
        assert!(!rook.en_passant());
    }

    #[test]
    fn test_initial_positions() {
        assert!(Chessman::new(Material::WR, A1).is_at_possible_initial_position());
        assert!(Chessman::new(Material::WR, H1).is_at_possible_initial_position());
        assert!(!Chessman::new(Material::WR, A2).is_at_possible_initial_position());
        assert!(Chessman::new(Material::BP, C7).is_at_possible_initial_position());
        assert!(!Chessman::new(Material::BP, C2).is_at_possible_initial_position());
        assert!(Chessman::new(Material::BK, E8).is_at_possible_initial_position());
    }
}
