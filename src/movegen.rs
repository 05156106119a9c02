// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation. Destinations are computed per piece as a `SquareSet`:
//! first the pseudo-legal set (the piece's movement pattern, ignoring
//! whether the mover's king ends up attacked), then the legal set, which
//! plays each candidate on a scratch copy of the position and drops the ones
//! that leave the king in check.
use arrayvec::ArrayVec;

use crate::attacks::{self, BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};
use crate::moves::Move;
use crate::position::Position;
use crate::squareset::SquareSet;
use crate::types::{Color, File, Piece, PieceKind, Rank, Square, PROMOTION_KINDS};

/// No position has more than 218 legal moves.
pub type MoveVec = ArrayVec<Move, 256>;

/// How pawn moves onto the last rank are expanded into `Move`s.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Promotions {
    /// One move per promotion piece.
    All,
    /// A single queen promotion.
    QueenOnly,
}

/// Squares the piece on `square` can move to by its movement pattern alone. Empty if the
/// square is empty or holds a piece of the other color.
pub fn pseudo_moves(pos: &Position, square: Square, color: Color) -> SquareSet {
    let piece = match pos.piece_at(square) {
        Some(piece) if piece.color == color => piece,
        _ => return SquareSet::empty(),
    };

    let own = |sq: Square| pos.piece_at(sq).map_or(false, |p| p.color == color);
    let own_pieces: SquareSet = Square::all().filter(|&sq| own(sq)).collect();
    let occupied = |sq: Square| pos.piece_at(sq).is_some();

    match piece.kind {
        PieceKind::Pawn => pawn_moves(pos, square, color),
        PieceKind::Knight => attacks::knight_attacks(square) - own_pieces,
        PieceKind::Bishop => {
            attacks::slider_attacks(square, &BISHOP_DIRECTIONS, occupied) - own_pieces
        }
        PieceKind::Rook => attacks::slider_attacks(square, &ROOK_DIRECTIONS, occupied) - own_pieces,
        PieceKind::Queen => {
            attacks::slider_attacks(square, &QUEEN_DIRECTIONS, occupied) - own_pieces
        }
        PieceKind::King => {
            let mut moves = attacks::king_attacks(square) - own_pieces;
            moves |= castle_moves(pos, square, color);
            moves
        }
    }
}

fn pawn_moves(pos: &Position, square: Square, color: Color) -> SquareSet {
    let mut moves = SquareSet::empty();
    let forward = color.forward();

    if let Some(one) = square.offset(forward, 0) {
        if pos.piece_at(one).is_none() {
            moves.insert(one);
            if square.rank() == color.pawn_rank() {
                if let Some(two) = square.offset(2 * forward, 0) {
                    if pos.piece_at(two).is_none() {
                        moves.insert(two);
                    }
                }
            }
        }
    }

    // The en-passant target only ever sits on the rank behind a pawn that just made a double
    // step, so it is only capturable by pawns of the side that didn't make it.
    let ep_rank = match color {
        Color::White => Rank::Six,
        Color::Black => Rank::Three,
    };

    for target in attacks::pawn_attacks(square, color) {
        match pos.piece_at(target) {
            Some(victim) if victim.color != color => moves.insert(target),
            None if pos.en_passant_square() == Some(target) && target.rank() == ep_rank => {
                moves.insert(target)
            }
            _ => {}
        }
    }

    moves
}

/// Castling destinations for a king on `square`. The king must stand on its home square,
/// not be in check, hold the right, and have its rook on the corner with nothing in between;
/// the square it crosses and the square it lands on must not be attacked.
fn castle_moves(pos: &Position, square: Square, color: Color) -> SquareSet {
    let mut moves = SquareSet::empty();
    let rank = color.back_rank();
    if square != Square::of(rank, File::E) {
        return moves;
    }

    let enemy = color.toggle();
    if pos.is_square_attacked(square, enemy) {
        return moves;
    }

    let rook = Some(Piece::new(PieceKind::Rook, color));
    let empty = |files: &[File]| {
        files
            .iter()
            .all(|&file| pos.piece_at(Square::of(rank, file)).is_none())
    };
    let safe = |files: &[File]| {
        files
            .iter()
            .all(|&file| !pos.is_square_attacked(Square::of(rank, file), enemy))
    };

    if pos.can_castle_kingside(color)
        && pos.piece_at(Square::of(rank, File::H)) == rook
        && empty(&[File::F, File::G])
        && safe(&[File::F, File::G])
    {
        moves.insert(Square::of(rank, File::G));
    }

    if pos.can_castle_queenside(color)
        && pos.piece_at(Square::of(rank, File::A)) == rook
        && empty(&[File::B, File::C, File::D])
        && safe(&[File::C, File::D])
    {
        moves.insert(Square::of(rank, File::C));
    }

    moves
}

/// Whether playing `from -> to` leaves the mover's king out of check. Promotions are played
/// as queens; the promotion piece never affects the mover's own king.
fn leaves_king_safe(pos: &Position, from: Square, to: Square, color: Color) -> bool {
    let mut scratch = pos.clone();
    scratch.apply_move(Move::new(from, to));
    !scratch.is_check(color)
}

/// Destinations of the piece on `square` that don't leave its own king in check.
pub fn legal_moves(pos: &Position, square: Square, color: Color) -> SquareSet {
    pseudo_moves(pos, square, color)
        .iter()
        .filter(|&to| leaves_king_safe(pos, square, to, color))
        .collect()
}

/// Whether `color` has at least one legal move. Stops at the first piece that has one.
pub fn has_any_legal_move(pos: &Position, color: Color) -> bool {
    pos.pieces(color)
        .any(|(sq, _)| !legal_moves(pos, sq, color).is_empty())
}

/// Pushes every legal move of the side to move onto `moves`, pieces in scan order and each
/// piece's destinations in scan order.
pub fn legal_move_list(pos: &Position, promotions: Promotions, moves: &mut MoveVec) {
    let color = pos.side_to_move();
    for (from, piece) in pos.pieces(color) {
        for to in legal_moves(pos, from, color) {
            if piece.kind == PieceKind::Pawn && to.rank() == color.promotion_rank() {
                match promotions {
                    Promotions::All => {
                        for &kind in &PROMOTION_KINDS {
                            moves.push(Move::promotion(from, to, kind));
                        }
                    }
                    Promotions::QueenOnly => moves.push(Move::promotion(from, to, PieceKind::Queen)),
                }
            } else {
                moves.push(Move::new(from, to));
            }
        }
    }
}

/// Whether `mov` is legal for the side to move.
pub fn is_legal(pos: &Position, mov: Move) -> bool {
    legal_moves(pos, mov.source(), pos.side_to_move()).contains(mov.destination())
}
