// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Definitions of the `SquareSet` type, a set of squares on the chess board.
//! The move generator answers every "where can this piece go" and "what does
//! this piece attack" question with a square set, and the game hands the
//! same type to the UI for highlighting legal destinations.
//!
//! A square set is a single 64-bit integer, one bit per square, so the usual
//! set operations are bitwise operations.
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::FromIterator;
use std::ops;

use crate::types::{Square, FILES, RANKS};

#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SquareSet {
    bits: u64,
}

impl SquareSet {
    pub const fn empty() -> SquareSet {
        SquareSet { bits: 0 }
    }

    pub const fn from_bits(bits: u64) -> SquareSet {
        SquareSet { bits }
    }

    pub fn single(square: Square) -> SquareSet {
        SquareSet::from_bits(1u64 << square.index())
    }

    pub const fn bits(self) -> u64 {
        self.bits
    }

    pub fn contains(self, square: Square) -> bool {
        self.bits & (1u64 << square.index()) != 0
    }

    pub fn insert(&mut self, square: Square) {
        self.bits |= 1u64 << square.index();
    }

    pub fn remove(&mut self, square: Square) {
        self.bits &= !(1u64 << square.index());
    }

    pub const fn len(self) -> u32 {
        self.bits.count_ones()
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Squares in ascending index order: ranks from 1 to 8, files from a to h within a rank.
    pub fn iter(self) -> SquareSetIter {
        SquareSetIter { bits: self.bits }
    }

    pub fn first(self) -> Option<Square> {
        self.iter().next()
    }
}

impl fmt::Debug for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                if self.contains(Square::of(rank, file)) {
                    write!(f, " x ")?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

impl ops::BitOr for SquareSet {
    type Output = SquareSet;

    fn bitor(self, rhs: SquareSet) -> SquareSet {
        SquareSet::from_bits(self.bits | rhs.bits)
    }
}

impl ops::BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: SquareSet) {
        self.bits |= rhs.bits;
    }
}

impl ops::BitAnd for SquareSet {
    type Output = SquareSet;

    fn bitand(self, rhs: SquareSet) -> SquareSet {
        SquareSet::from_bits(self.bits & rhs.bits)
    }
}

impl ops::Sub for SquareSet {
    type Output = SquareSet;

    fn sub(self, rhs: SquareSet) -> SquareSet {
        SquareSet::from_bits(self.bits & !rhs.bits)
    }
}

pub struct SquareSetIter {
    bits: u64,
}

impl Iterator for SquareSetIter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }

        let next = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(Square::new(next as usize))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIter;

    fn into_iter(self) -> SquareSetIter {
        self.iter()
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> SquareSet {
        let mut set = SquareSet::empty();
        for square in iter {
            set.insert(square);
        }

        set
    }
}

// Serialized as a list of squares, which is what a board renderer wants for highlighting.
impl Serialize for SquareSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut set = SquareSet::default();
        assert!(!set.contains(Square::A1));

        set.insert(Square::A1);
        assert!(set.contains(Square::A1));
        assert_eq!(1, set.len());
    }

    #[test]
    fn remove() {
        let mut set = SquareSet::single(Square::H2);
        assert!(set.contains(Square::H2));
        set.remove(Square::H2);
        assert!(set.is_empty());
    }

    #[test]
    fn union_and_intersection() {
        let one: SquareSet = vec![Square::A2, Square::B2].into_iter().collect();
        let two: SquareSet = vec![Square::A2, Square::C2].into_iter().collect();

        let both = one | two;
        assert_eq!(3, both.len());

        let common = one & two;
        assert!(common.contains(Square::A2));
        assert!(!common.contains(Square::B2));
        assert!(!common.contains(Square::C2));

        let only_one = one - two;
        assert_eq!(Some(Square::B2), only_one.first());
        assert_eq!(1, only_one.len());
    }

    #[test]
    fn iterates_in_scan_order() {
        let set: SquareSet = vec![Square::H8, Square::B2, Square::A2, Square::H1]
            .into_iter()
            .collect();

        let squares: Vec<_> = set.iter().collect();
        assert_eq!(
            vec![Square::H1, Square::A2, Square::B2, Square::H8],
            squares
        );
    }

    #[test]
    fn empty_iter() {
        assert_eq!(0, SquareSet::empty().iter().count());
    }

    #[test]
    fn serializes_as_square_list() {
        let set: SquareSet = vec![Square::E3, Square::E4].into_iter().collect();
        assert_eq!(r#"["e3","e4"]"#, serde_json::to_string(&set).unwrap());
    }
}
