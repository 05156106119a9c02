// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Short algebraic notation for the move log. Identical pieces that can
//! reach the same square are not disambiguated.
use crate::position::Position;
use crate::types::{File, PieceKind, Square};

/// Describes the move `from -> to` as it would be played in `before`, without the promotion
/// suffix or check marker, which are only known once the move is resolved and applied.
pub fn describe(before: &Position, from: Square, to: Square) -> String {
    let piece = match before.piece_at(from) {
        Some(piece) => piece,
        None => return format!("{}", to),
    };

    if piece.kind == PieceKind::King && (from.file() as i32 - to.file() as i32).abs() == 2 {
        return if to.file() == File::G {
            "O-O".to_owned()
        } else {
            "O-O-O".to_owned()
        };
    }

    let is_pawn = piece.kind == PieceKind::Pawn;
    let is_capture = before.piece_at(to).is_some()
        || (is_pawn && before.en_passant_square() == Some(to) && from.file() != to.file());

    let mut san = String::new();
    if !is_pawn {
        san.push(piece.kind.letter());
    } else if is_capture {
        san.push_str(&from.file().to_string());
    }

    if is_capture {
        san.push('x');
    }

    san.push_str(&to.to_string());
    san
}

/// Completes a move description with its promotion suffix and a check (`+`) or mate (`#`)
/// marker.
pub fn annotate(
    partial: &str,
    promotion: Option<PieceKind>,
    in_check: bool,
    checkmate: bool,
) -> String {
    let mut san = partial.to_owned();
    if let Some(kind) = promotion {
        san.push('=');
        san.push(kind.letter());
    }

    if checkmate {
        san.push('#');
    } else if in_check {
        san.push('+');
    }

    san
}
