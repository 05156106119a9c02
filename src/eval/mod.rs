// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::position::Position;
use crate::types::Color;

mod piece_square;
mod score;

pub use piece_square::PieceSquareEvaluator;
pub use score::Score;

/// A static evaluation of a position, scored from the point of view of `perspective`: positive
/// scores are good for that color.
pub trait BoardEvaluator: Default {
    fn evaluate(&self, pos: &Position, perspective: Color) -> Score;
}
