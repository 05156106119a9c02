// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::types::{PieceKind, Square};

/// A move from one square to another. Everything else about a move (whether it captures,
/// castles or takes en passant) is derived from the position it is applied to, so the only
/// extra piece of information carried is the piece a pawn promotes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    source: Square,
    destination: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(source: Square, destination: Square) -> Move {
        Move {
            source,
            destination,
            promotion: None,
        }
    }

    pub fn promotion(source: Square, destination: Square, kind: PieceKind) -> Move {
        Move {
            source,
            destination,
            promotion: Some(kind),
        }
    }

    pub fn source(self) -> Square {
        self.source
    }

    pub fn destination(self) -> Square {
        self.destination
    }

    pub fn promotion_piece(self) -> Option<PieceKind> {
        self.promotion
    }

    /// Parses coordinate notation (`e2e4`, `e7e8q`). Whether the move is legal is up to the
    /// caller to find out.
    pub fn from_uci(text: &str) -> Option<Move> {
        if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
            return None;
        }

        let source = text[0..2].parse().ok()?;
        let destination = text[2..4].parse().ok()?;
        match text[4..].chars().next() {
            None => Some(Move::new(source, destination)),
            Some(c) => {
                let kind = PieceKind::from_letter(c).filter(|k| k.is_promotion_target())?;
                Some(Move::promotion(source, destination, kind))
            }
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.source, self.destination)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind)?;
        }

        Ok(())
    }
}
