// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::eval::{BoardEvaluator, Score};
use crate::position::Position;
use crate::types::{Color, PieceKind, Square, TableIndex};

const PAWN_WEIGHT: i32 = 100;
const KNIGHT_WEIGHT: i32 = 320;
const BISHOP_WEIGHT: i32 = 330;
const ROOK_WEIGHT: i32 = 500;
const QUEEN_WEIGHT: i32 = 900;
const KING_WEIGHT: i32 = 20000;

// Piece-square tables, in centipawns, from White's side of the board: the first row is the
// first rank, so a1 is index 0. Black pieces read them through the rank mirror.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10,-20,-20, 10, 10,  5,
     5, -5,-10,  0,  0,-10, -5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5,  5, 10, 25, 25, 10,  5,  5,
    10, 10, 20, 30, 30, 20, 10, 10,
    50, 50, 50, 50, 50, 50, 50, 50,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  5,  5,  0,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     5, 10, 10, 10, 10, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  5,  5,  5,  5,  5,  0,-10,
     0,  0,  5,  5,  5,  5,  0, -5,
    -5,  0,  5,  5,  5,  5,  0, -5,
   -10,  0,  5,  5,  5,  5,  0,-10,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    20, 30, 10,  0,  0, 10, 30, 20,
    20, 20,  0,  0,  0,  0, 20, 20,
   -10,-20,-20,-20,-20,-20,-20,-10,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
];

static WEIGHTS: [i32; 6] = [
    PAWN_WEIGHT,
    KNIGHT_WEIGHT,
    BISHOP_WEIGHT,
    ROOK_WEIGHT,
    QUEEN_WEIGHT,
    KING_WEIGHT,
];

static TABLES: [&[i32; 64]; 6] = [
    &PAWN_TABLE,
    &KNIGHT_TABLE,
    &BISHOP_TABLE,
    &ROOK_TABLE,
    &QUEEN_TABLE,
    &KING_TABLE,
];

/// Material plus a positional bonus for where each piece stands.
#[derive(Default)]
pub struct PieceSquareEvaluator;

impl PieceSquareEvaluator {
    pub fn new() -> PieceSquareEvaluator {
        PieceSquareEvaluator
    }

    /// Material and table value of one piece, independent of whose side is asking.
    pub fn piece_value(kind: PieceKind, color: Color, square: Square) -> i32 {
        let square = match color {
            Color::White => square,
            Color::Black => square.mirror(),
        };

        WEIGHTS[kind.as_index()] + TABLES[kind.as_index()][square.index()]
    }
}

impl BoardEvaluator for PieceSquareEvaluator {
    fn evaluate(&self, pos: &Position, perspective: Color) -> Score {
        let total = Square::all()
            .filter_map(|sq| pos.piece_at(sq).map(|piece| (sq, piece)))
            .map(|(sq, piece)| {
                let value = PieceSquareEvaluator::piece_value(piece.kind, piece.color, sq);
                if piece.color == perspective {
                    value
                } else {
                    -value
                }
            })
            .sum();

        Score::new(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_balanced() {
        let pos = Position::from_start_position();
        let eval = PieceSquareEvaluator::new();
        assert_eq!(Score::new(0), eval.evaluate(&pos, Color::White));
        assert_eq!(Score::new(0), eval.evaluate(&pos, Color::Black));
    }

    #[test]
    fn extra_queen() {
        let pos = Position::from_fen("3qk3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let eval = PieceSquareEvaluator::new();

        // Both kings sit on e1/e8 (0 bonus); the queen on d8 reads the d1 entry (-5).
        assert_eq!(Score::new(-895), eval.evaluate(&pos, Color::White));
        assert_eq!(Score::new(895), eval.evaluate(&pos, Color::Black));
    }

    #[test]
    fn black_pieces_read_mirrored_tables() {
        assert_eq!(
            PieceSquareEvaluator::piece_value(PieceKind::Pawn, Color::White, Square::E4),
            PieceSquareEvaluator::piece_value(PieceKind::Pawn, Color::Black, Square::E5)
        );
        assert_eq!(
            150,
            PieceSquareEvaluator::piece_value(PieceKind::Pawn, Color::White, Square::A7)
        );
        assert_eq!(
            150,
            PieceSquareEvaluator::piece_value(PieceKind::Pawn, Color::Black, Square::A2)
        );
    }

    #[test]
    fn centralized_knight_is_better() {
        let rim = PieceSquareEvaluator::piece_value(PieceKind::Knight, Color::White, Square::A3);
        let center = PieceSquareEvaluator::piece_value(PieceKind::Knight, Color::White, Square::D4);
        assert!(center > rim);
    }
}
