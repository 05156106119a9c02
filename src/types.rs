// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::str::FromStr;

// TableIndex is implemented by every enum that is used to index a table (ranks, files, colors
// and piece kinds), so lookups don't have to sprinkle casts everywhere.
pub trait TableIndex {
    fn as_index(self) -> usize;
    fn from_index(idx: usize) -> Self;
}

impl<T> TableIndex for T
where
    T: FromPrimitive + ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_usize().expect("table index out of range")
    }

    fn from_index(idx: usize) -> T {
        <T as FromPrimitive>::from_usize(idx).expect("table index out of range")
    }
}

/// A square on the board, addressed by rank and file. Squares are numbered
/// rank-major starting from a1, so a1 is 0, h1 is 7 and a8 is 56. Iterating
/// squares in index order scans ranks then files, which is the order every
/// move enumeration in the engine follows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    pub fn new(index: usize) -> Square {
        debug_assert!(index < 64, "square index out of range: {}", index);
        Square(index as u8)
    }

    pub fn of(rank: Rank, file: File) -> Square {
        Square::new(rank.as_index() * 8 + file.as_index())
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn rank(self) -> Rank {
        Rank::from_index(self.index() >> 3)
    }

    pub fn file(self) -> File {
        File::from_index(self.index() & 7)
    }

    /// Returns the square `ranks` ranks and `files` files away from this one, or `None` if
    /// that would fall off the board.
    pub fn offset(self, ranks: i32, files: i32) -> Option<Square> {
        let rank = (self.index() >> 3) as i32 + ranks;
        let file = (self.index() & 7) as i32 + files;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square::new((rank * 8 + file) as usize))
        } else {
            None
        }
    }

    /// The same file on the opposite rank, as seen from the other side of the board.
    pub fn mirror(self) -> Square {
        Square(self.0 ^ 56)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

macro_rules! square_constants {
    ($($name:ident = $idx:expr),* $(,)?) => {
        impl Square {
            $(pub const $name: Square = Square($idx);)*
        }
    };
}

square_constants! {
    A1 = 0, B1 = 1, C1 = 2, D1 = 3, E1 = 4, F1 = 5, G1 = 6, H1 = 7,
    A2 = 8, B2 = 9, C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
    A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
    A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
    A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
    A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
    A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
    A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = ();

    fn from_str(s: &str) -> Result<Square, ()> {
        let mut chars = s.chars();
        let file = File::try_from(chars.next().ok_or(())?)?;
        let rank = Rank::try_from(chars.next().ok_or(())?)?;
        if chars.next().is_some() {
            return Err(());
        }

        Ok(Square::of(rank, file))
    }
}

// Squares travel over the wire in the same `e4` form they display in.
impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Square, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse()
            .map_err(|_| de::Error::custom(format!("invalid square `{}`", text)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'1' + self.as_index() as u8) as char)
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::from_index(value as usize - '1' as usize)),
            _ => Err(()),
        }
    }
}

pub static RANKS: [Rank; 8] = [
    Rank::One,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'a' + self.as_index() as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File::from_index(value as usize - 'a' as usize)),
            _ => Err(()),
        }
    }
}

pub static FILES: [File; 8] = [
    File::A,
    File::B,
    File::C,
    File::D,
    File::E,
    File::F,
    File::G,
    File::H,
];

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The rank this color's pawns start on.
    pub fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::Two,
            Color::Black => Rank::Seven,
        }
    }

    /// The rank this color's pawns promote on.
    pub fn promotion_rank(self) -> Rank {
        match self {
            Color::White => Rank::Eight,
            Color::Black => Rank::One,
        }
    }

    /// The rank this color's king and rooks start on.
    pub fn back_rank(self) -> Rank {
        match self {
            Color::White => Rank::One,
            Color::Black => Rank::Eight,
        }
    }

    /// Rank direction this color's pawns advance in.
    pub fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Upper-case letter used for this kind in algebraic notation.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parses a piece letter in either case.
    pub fn from_letter(c: char) -> Option<PieceKind> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_promotion_target(self) -> bool {
        match self {
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => true,
            PieceKind::Pawn | PieceKind::King => false,
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.letter().to_ascii_lowercase())
    }
}

pub static PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

bitflags! {
    pub struct CastleStatus: u8 {
        const NONE = 0;
        const WHITE_KINGSIDE = 0b0000_0001;
        const WHITE_QUEENSIDE = 0b0000_0010;
        const WHITE = Self::WHITE_KINGSIDE.bits | Self::WHITE_QUEENSIDE.bits;
        const BLACK_KINGSIDE = 0b0000_0100;
        const BLACK_QUEENSIDE = 0b0000_1000;
        const BLACK = Self::BLACK_KINGSIDE.bits | Self::BLACK_QUEENSIDE.bits;
    }
}

impl CastleStatus {
    pub fn kingside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_KINGSIDE,
            Color::Black => CastleStatus::BLACK_KINGSIDE,
        }
    }

    pub fn queenside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_QUEENSIDE,
            Color::Black => CastleStatus::BLACK_QUEENSIDE,
        }
    }

    pub fn both(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE,
            Color::Black => CastleStatus::BLACK,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }
}

// FEN letters: upper case is White, lower case is Black.
impl TryFrom<char> for Piece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let kind = PieceKind::from_letter(c).ok_or(())?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Piece::new(kind, color))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let letter = self.kind.letter();
        match self.color {
            Color::White => f.write_char(letter),
            Color::Black => f.write_char(letter.to_ascii_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_rank_and_file() {
        assert_eq!(Rank::One, Square::A1.rank());
        assert_eq!(File::H, Square::H1.file());
        assert_eq!(Rank::Eight, Square::E8.rank());
        assert_eq!(Square::E4, Square::of(Rank::Four, File::E));
    }

    #[test]
    fn square_offset_stays_on_board() {
        assert_eq!(Some(Square::F3), Square::E1.offset(2, 1));
        assert_eq!(None, Square::A1.offset(0, -1));
        assert_eq!(None, Square::H8.offset(1, 0));
        assert_eq!(Some(Square::A8), Square::A1.offset(7, 0));
    }

    #[test]
    fn square_parse_and_display() {
        assert_eq!(Ok(Square::E4), "e4".parse());
        assert_eq!(Ok(Square::H8), "h8".parse());
        assert!("i1".parse::<Square>().is_err());
        assert!("e9".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
        assert_eq!("c7", Square::C7.to_string());
    }

    #[test]
    fn square_mirror() {
        assert_eq!(Square::E8, Square::E1.mirror());
        assert_eq!(Square::B3, Square::B6.mirror());
    }

    #[test]
    fn scan_order_is_ranks_then_files() {
        let first: Vec<_> = Square::all().take(9).collect();
        assert_eq!(Square::A1, first[0]);
        assert_eq!(Square::H1, first[7]);
        assert_eq!(Square::A2, first[8]);
    }

    #[test]
    fn piece_letters() {
        assert_eq!(Ok(Piece::new(PieceKind::Knight, Color::White)), Piece::try_from('N'));
        assert_eq!(Ok(Piece::new(PieceKind::Queen, Color::Black)), Piece::try_from('q'));
        assert!(Piece::try_from('x').is_err());
        assert_eq!("k", Piece::new(PieceKind::King, Color::Black).to_string());
    }

    #[test]
    fn square_serializes_as_text() {
        assert_eq!("\"g7\"", serde_json::to_string(&Square::G7).unwrap());
        let sq: Square = serde_json::from_str("\"b2\"").unwrap();
        assert_eq!(Square::B2, sq);
    }

    #[test]
    fn castle_masks() {
        assert_eq!(CastleStatus::WHITE, CastleStatus::both(Color::White));
        assert!(CastleStatus::BLACK.contains(CastleStatus::queenside(Color::Black)));
        assert!(!CastleStatus::WHITE.contains(CastleStatus::kingside(Color::Black)));
    }
}
