// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::ops::Neg;

/// Score is the output of a board evaluation, in centipawns, relative to the player the search
/// is choosing a move for. A side with no legal moves scores one of the two forced values, which
/// lie outside anything material and position can add up to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Score(i32);

impl Score {
    /// The opponent has no legal move.
    pub const FORCED_WIN: Score = Score(99999);

    /// The searching side has no legal move.
    pub const FORCED_LOSS: Score = Score(-99999);

    /// Window bounds for alpha-beta; below and above every real score.
    pub const MIN: Score = Score(-1_000_000);
    pub const MAX: Score = Score(1_000_000);

    pub const fn new(centipawns: i32) -> Score {
        Score(centipawns)
    }

    pub const fn centipawns(self) -> i32 {
        self.0
    }

    pub fn is_forced(self) -> bool {
        self == Score::FORCED_WIN || self == Score::FORCED_LOSS
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_forced() {
            write!(f, "{}", self.0)
        } else if self.0 > 0 {
            write!(f, "#")
        } else {
            write!(f, "#-")
        }
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        Score(-self.0)
    }
}
