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
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use strum_macros::EnumIter;

use crate::errors::ChessError;

use super::material::Color;

use Color::*;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

use Square::{
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
};

impl Square {
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::from_index(rank.to_index() * 8 + file.to_index())
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [Square; 64] = [
            A1, B1, C1, D1, E1, F1, G1, H1,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A8, B8, C8, D8, E8, F8, G8, H8,
        ];
        debug_assert!(index < 64);
        VALUES[index]
    }

    /// Parses `"[a-h][1-8]"` notation, case-insensitive.
    pub fn at(notation: &str) -> Result<Self> {
        Self::try_from_string(notation)
            .ok_or_else(|| ChessError::Format(format!("not a square: {notation:?}")).into())
    }

    #[inline]
    pub fn try_from_string(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let f = chars.next()?;
        let r = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::try_from_chars(f, r)
    }

    #[inline]
    pub fn try_from_chars(f: char, r: char) -> Option<Self> {
        let file = File::try_from_char(f)?;
        let rank = Rank::try_from_char(r)?;
        Some(Self::new(file, rank))
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub const fn file_index(&self) -> usize {
        self.to_index() % 8
    }
    #[inline]
    pub const fn rank_index(&self) -> usize {
        self.to_index() / 8
    }
    #[inline]
    pub const fn file(&self) -> File {
        File::from_index(self.file_index())
    }
    #[inline]
    pub const fn rank(&self) -> Rank {
        Rank::from_index(self.rank_index())
    }

    /// Color of the square itself, from file/rank parity. `a1` is dark,
    /// `h1` is light.
    #[inline]
    pub const fn square_color(&self) -> Color {
        if (self.file_index() + self.rank_index()) % 2 == 0 {
            Black
        } else {
            White
        }
    }

    /// Steps `delta` squares along one axial direction from `pov`'s
    /// perspective: quadrant I is right, II forward, III left, IV backward.
    /// White's forward increases the rank, Black's decreases it; left and
    /// right mirror the same way. Returns `None` off the board.
    pub fn axial_step(self, delta: usize, quadrant: Quadrant, pov: Color) -> Option<Self> {
        let delta = delta as isize;
        let (df, dr) = match quadrant {
            Quadrant::I => (delta, 0),
            Quadrant::II => (0, delta),
            Quadrant::III => (-delta, 0),
            Quadrant::IV => (0, -delta),
        };
        self.offset_by(df, dr, pov)
    }

    /// Steps into one of four Cartesian quadrants from `pov`'s perspective:
    /// I is `(+df, +dr)`, II `(-df, +dr)`, III `(-df, -dr)`, IV `(+df, -dr)`.
    /// Both axes flip when `pov` is Black. Returns `None` off the board.
    pub fn radial_step(self, df: usize, dr: usize, quadrant: Quadrant, pov: Color) -> Option<Self> {
        let (df, dr) = (df as isize, dr as isize);
        let (df, dr) = match quadrant {
            Quadrant::I => (df, dr),
            Quadrant::II => (-df, dr),
            Quadrant::III => (-df, -dr),
            Quadrant::IV => (df, -dr),
        };
        self.offset_by(df, dr, pov)
    }

    /// Checked-index form of [`Self::axial_step`]; fails with
    /// `InvalidArgument` when `quadrant` is outside `1..=4`.
    pub fn axial(self, delta: usize, quadrant: usize, pov: Color) -> Result<Option<Self>> {
        Ok(self.axial_step(delta, Quadrant::from_index(quadrant)?, pov))
    }

    /// Checked-index form of [`Self::radial_step`].
    pub fn radial(self, df: usize, dr: usize, quadrant: usize, pov: Color) -> Result<Option<Self>> {
        Ok(self.radial_step(df, dr, Quadrant::from_index(quadrant)?, pov))
    }

    #[inline]
    pub fn forward(self, delta: usize, pov: Color) -> Option<Self> {
        self.axial_step(delta, Quadrant::II, pov)
    }

    fn offset_by(self, df: isize, dr: isize, pov: Color) -> Option<Self> {
        let (df, dr) = match pov {
            White => (df, dr),
            Black => (-df, -dr),
        };
        let file = (self.file() + df)?;
        let rank = (self.rank() + dr)?;
        Some(Self::new(file, rank))
    }

    /// The up-to-eight squares surrounding this one.
    pub fn surrounding(self) -> impl Iterator<Item = Self> {
        const OFFSETS: [(isize, isize); 8] = [
            (-1, -1), (0, -1), (1, -1),
            (-1, 0), (1, 0),
            (-1, 1), (0, 1), (1, 1),
        ];
        OFFSETS
            .into_iter()
            .filter_map(move |(df, dr)| self.offset_by(df, dr, White))
    }

    pub fn notation(&self) -> String {
        format!("{}{}", self.file(), self.rank())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// One of four labelled sectors used to parameterise directional stepping,
/// so that piece-kind code can express a move pattern once for both colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Quadrant {
    I,
    II,
    III,
    IV,
}

impl Quadrant {
    /// Maps a 1-based index onto a quadrant; anything outside `1..=4` fails
    /// with `InvalidArgument`.
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            1 => Ok(Self::I),
            2 => Ok(Self::II),
            3 => Ok(Self::III),
            4 => Ok(Self::IV),
            _ => Err(ChessError::InvalidArgument(format!("quadrant {index} out of 1..=4")).into()),
        }
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize + 1
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum File {
    FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH,
}

use File::{FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH};

impl File {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [File; 8] = [
            FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH,
        ];
        debug_assert!(index < 8);
        VALUES[index]
    }
    #[inline]
    pub const fn try_from_char(c: char) -> Option<Self> {
        match c {
            'a' | 'A' => Some(FileA),
            'b' | 'B' => Some(FileB),
            'c' | 'C' => Some(FileC),
            'd' | 'D' => Some(FileD),
            'e' | 'E' => Some(FileE),
            'f' | 'F' => Some(FileF),
            'g' | 'G' => Some(FileG),
            'h' | 'H' => Some(FileH),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const VALUES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
        write!(f, "{}", VALUES[self.to_index()])
    }
}

impl Add<isize> for File {
    type Output = Option<Self>;
    fn add(self, rhs: isize) -> Self::Output {
        match self.to_index().checked_add_signed(rhs) {
            Some(i) if i < 8 => Some(Self::from_index(i)),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Rank {
    Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8,
}

use Rank::{Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8};

impl Rank {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [Rank; 8] = [
            Rank1, Rank2, Rank3, Rank4, Rank5, Rank6, Rank7, Rank8,
        ];
        debug_assert!(index < 8);
        VALUES[index]
    }
    #[inline]
    pub const fn try_from_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(Rank1),
            '2' => Some(Rank2),
            '3' => Some(Rank3),
            '4' => Some(Rank4),
            '5' => Some(Rank5),
            '6' => Some(Rank6),
            '7' => Some(Rank7),
            '8' => Some(Rank8),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    /// The rank a pawn of `color` starts from.
    #[inline]
    pub const fn pawn_rank(color: Color) -> Self {
        match color {
            White => Rank2,
            Black => Rank7,
        }
    }

    /// The rank a pawn of `color` would promote on.
    #[inline]
    pub const fn last_rank(color: Color) -> Self {
        match color {
            White => Rank8,
            Black => Rank1,
        }
    }

    #[inline]
    pub const fn back_rank(color: Color) -> Self {
        match color {
            White => Rank1,
            Black => Rank8,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_index() + 1)
    }
}

impl Add<isize> for Rank {
    type Output = Option<Self>;
    fn add(self, rhs: isize) -> Self::Output {
        match self.to_index().checked_add_signed(rhs) {
            Some(i) if i < 8 => Some(Self::from_index(i)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_notation_parsing() {
        assert_eq!(Square::at("e4").unwrap(), E4);
        assert_eq!(Square::at("E4").unwrap(), E4);
        assert_eq!(Square::at("a1").unwrap(), A1);
        assert_eq!(Square::at("H8").unwrap(), H8);
    }

    #[test]
    fn test_notation_rejects_garbage() {
        for bad in ["", "e", "e9", "i4", "e44", "44", "xx"] {
            let err = Square::at(bad).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ChessError>(),
                Some(ChessError::Format(_))
            ));
        }
    }

    #[test]
    fn test_notation_round_trip() {
        assert_eq!(Square::at(&E4.notation()).unwrap(), E4);
        assert_eq!(D5.to_string(), "d5");
    }

    #[test]
    fn test_square_color_parity() {
        assert_eq!(A1.square_color(), Color::Black);
        assert_eq!(H1.square_color(), Color::White);
        assert_eq!(A8.square_color(), Color::White);
        assert_eq!(H8.square_color(), Color::Black);
    }

    #[test]
    fn test_forward_is_color_symmetric() {
        assert_eq!(E2.forward(1, Color::White), Some(E3));
        assert_eq!(E2.forward(2, Color::White), Some(E4));
        assert_eq!(E7.forward(1, Color::Black), Some(E6));
        assert_eq!(E7.forward(2, Color::Black), Some(E5));
    }

    #[test]
    fn test_forward_off_board() {
        assert_eq!(E8.forward(1, Color::White), None);
        assert_eq!(E1.forward(1, Color::Black), None);
        assert_eq!(E2.forward(7, Color::White), None);
    }

    #[test]
    fn test_axial_right_and_left() {
        assert_eq!(E4.axial_step(1, Quadrant::I, Color::White), Some(F4));
        assert_eq!(E4.axial_step(1, Quadrant::III, Color::White), Some(D4));
        // Black's right is White's left
        assert_eq!(E4.axial_step(1, Quadrant::I, Color::Black), Some(D4));
        assert_eq!(E4.axial_step(1, Quadrant::III, Color::Black), Some(F4));
    }

    #[test]
    fn test_axial_zero_delta_is_identity() {
        for q in [Quadrant::I, Quadrant::II, Quadrant::III, Quadrant::IV] {
            assert_eq!(E4.axial_step(0, q, Color::White), Some(E4));
        }
    }

    #[test]
    fn test_radial_quadrants() {
        assert_eq!(E4.radial_step(1, 2, Quadrant::I, Color::White), Some(F6));
        assert_eq!(E4.radial_step(1, 2, Quadrant::II, Color::White), Some(D6));
        assert_eq!(E4.radial_step(1, 2, Quadrant::III, Color::White), Some(D2));
        assert_eq!(E4.radial_step(1, 2, Quadrant::IV, Color::White), Some(F2));
        // 180-degree flip for Black
        assert_eq!(E4.radial_step(1, 2, Quadrant::I, Color::Black), Some(D2));
    }

    #[test]
    fn test_quadrant_index_bounds() {
        assert!(Quadrant::from_index(1).is_ok());
        assert!(Quadrant::from_index(4).is_ok());
        for bad in [0, 5, 99] {
            let err = Quadrant::from_index(bad).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ChessError>(),
                Some(ChessError::InvalidArgument(_))
            ));
        }
        assert!(E4.axial(1, 5, Color::White).is_err());
        assert!(E4.radial(1, 1, 0, Color::White).is_err());
    }

    #[test]
    fn test_surrounding_corner_and_center() {
        assert_eq!(A1.surrounding().count(), 3);
        assert_eq!(E4.surrounding().count(), 8);
        assert!(E4.surrounding().any(|s| s == D5));
        assert!(!E4.surrounding().any(|s| s == E4));
    }
}
