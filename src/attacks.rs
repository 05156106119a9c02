// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Precomputed attack tables. Leapers (knights, kings, pawn captures) get a
//! square set per origin square; sliders get an ordered ray per origin square
//! and direction, walked until the first occupied square.
use crate::squareset::SquareSet;
use crate::types::{Color, Square, TableIndex, COLORS};

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// (rank, file) step of one square in this direction.
    pub fn as_vector(self) -> (i32, i32) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }
}

pub static ROOK_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

pub static BISHOP_DIRECTIONS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

pub static QUEEN_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

struct LeaperTable {
    table: [SquareSet; 64],
}

impl LeaperTable {
    fn new(offsets: &[(i32, i32)]) -> LeaperTable {
        let mut lt = LeaperTable {
            table: [SquareSet::empty(); 64],
        };

        for sq in Square::all() {
            lt.table[sq.index()] = offsets
                .iter()
                .filter_map(|&(ranks, files)| sq.offset(ranks, files))
                .collect();
        }

        lt
    }

    fn attacks(&self, sq: Square) -> SquareSet {
        self.table[sq.index()]
    }
}

struct PawnTable {
    table: [[SquareSet; 2]; 64],
}

impl PawnTable {
    fn new() -> PawnTable {
        let mut pt = PawnTable {
            table: [[SquareSet::empty(); 2]; 64],
        };

        for sq in Square::all() {
            for &color in COLORS.iter() {
                let forward = color.forward();
                pt.table[sq.index()][color.as_index()] = [-1, 1]
                    .iter()
                    .filter_map(|&files| sq.offset(forward, files))
                    .collect();
            }
        }

        pt
    }

    fn attacks(&self, sq: Square, color: Color) -> SquareSet {
        self.table[sq.index()][color.as_index()]
    }
}

struct RayTable {
    rays: Vec<Vec<Square>>,
}

impl RayTable {
    fn new() -> RayTable {
        let mut rays = Vec::with_capacity(64 * 8);
        for sq in Square::all() {
            for &dir in QUEEN_DIRECTIONS.iter() {
                let (ranks, files) = dir.as_vector();
                let mut ray = Vec::with_capacity(7);
                let mut cursor = sq;
                while let Some(next) = cursor.offset(ranks, files) {
                    ray.push(next);
                    cursor = next;
                }

                rays.push(ray);
            }
        }

        RayTable { rays }
    }

    /// Squares leaving `sq` in direction `dir`, nearest first.
    fn ray(&self, sq: Square, dir: Direction) -> &[Square] {
        &self.rays[sq.index() * 8 + dir.as_index()]
    }
}

lazy_static! {
    static ref KING_TABLE: LeaperTable = LeaperTable::new(&KING_OFFSETS);
    static ref KNIGHT_TABLE: LeaperTable = LeaperTable::new(&KNIGHT_OFFSETS);
    static ref PAWN_TABLE: PawnTable = PawnTable::new();
    static ref RAY_TABLE: RayTable = RayTable::new();
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_TABLE.attacks(sq)
}

pub fn king_attacks(sq: Square) -> SquareSet {
    KING_TABLE.attacks(sq)
}

/// The two diagonal squares a pawn of `color` standing on `sq` captures on.
pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    PAWN_TABLE.attacks(sq, color)
}

pub fn ray(sq: Square, dir: Direction) -> &'static [Square] {
    RAY_TABLE.ray(sq, dir)
}

/// Casts a ray in each of the given directions, stopping at (and including) the first square
/// for which `occupied` answers true.
pub fn slider_attacks<F>(sq: Square, directions: &[Direction], occupied: F) -> SquareSet
where
    F: Fn(Square) -> bool,
{
    let mut attacks = SquareSet::empty();
    for &dir in directions {
        for &target in ray(sq, dir) {
            attacks.insert(target);
            if occupied(target) {
                break;
            }
        }
    }

    attacks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_in_corner() {
        let attacks = knight_attacks(Square::A1);
        assert_eq!(2, attacks.len());
        assert!(attacks.contains(Square::B3));
        assert!(attacks.contains(Square::C2));
    }

    #[test]
    fn knight_in_center() {
        assert_eq!(8, knight_attacks(Square::E4).len());
    }

    #[test]
    fn king_on_edge() {
        let attacks = king_attacks(Square::E1);
        assert_eq!(5, attacks.len());
        assert!(!attacks.contains(Square::E1));
        assert!(attacks.contains(Square::F2));
    }

    #[test]
    fn pawn_attacks_by_color() {
        let white = pawn_attacks(Square::E4, Color::White);
        assert!(white.contains(Square::D5));
        assert!(white.contains(Square::F5));
        assert_eq!(2, white.len());

        let black = pawn_attacks(Square::A5, Color::Black);
        assert_eq!(1, black.len());
        assert!(black.contains(Square::B4));
    }

    #[test]
    fn rays_are_nearest_first() {
        let north = ray(Square::E4, Direction::North);
        assert_eq!(&[Square::E5, Square::E6, Square::E7, Square::E8], north);
        assert!(ray(Square::H8, Direction::NorthEast).is_empty());
    }

    #[test]
    fn slider_stops_at_blocker() {
        let blocker = Square::E6;
        let attacks = slider_attacks(Square::E4, &ROOK_DIRECTIONS, |sq| sq == blocker);
        assert!(attacks.contains(Square::E5));
        assert!(attacks.contains(Square::E6));
        assert!(!attacks.contains(Square::E7));
        assert!(attacks.contains(Square::A4));
        assert!(attacks.contains(Square::E1));
        assert_eq!(12, attacks.len());
    }
}
