// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::movegen::{self, MoveVec, Promotions};
use crate::position::Position;

/// Counts the leaves of the legal move tree below `pos`, `depth` plies deep. Promotions count
/// once per piece. The subtrees of the root moves are counted in parallel.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveVec::new();
    movegen::legal_move_list(pos, Promotions::All, &mut moves);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .as_slice()
        .par_iter()
        .map(|&mov| {
            let mut child = pos.clone();
            child.apply_move(mov);
            count(&child, depth - 1)
        })
        .sum()
}

fn count(pos: &Position, depth: u32) -> u64 {
    let mut moves = MoveVec::new();
    movegen::legal_move_list(pos, Promotions::All, &mut moves);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|&mov| {
            let mut child = pos.clone();
            child.apply_move(mov);
            count(&child, depth - 1)
        })
        .sum()
}
