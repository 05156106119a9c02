// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{self, Write};

use crate::attacks::{self, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};
use crate::moves::Move;
use crate::types::{CastleStatus, Color, File, Piece, PieceKind, Rank, Square};
use crate::types::{FILES, RANKS};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedEnd,
    UnknownPiece(char),
    InvalidDigit,
    FileDoesNotSumToEight,
    WrongRankCount,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
    TrailingInput,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnexpectedEnd => write!(f, "FEN ended early"),
            FenParseError::UnknownPiece(c) => write!(f, "unknown piece `{}`", c),
            FenParseError::InvalidDigit => write!(f, "empty-square count must be 1-8"),
            FenParseError::FileDoesNotSumToEight => write!(f, "rank does not have eight files"),
            FenParseError::WrongRankCount => write!(f, "board does not have eight ranks"),
            FenParseError::InvalidSideToMove => write!(f, "side to move must be `w` or `b`"),
            FenParseError::InvalidCastle => write!(f, "invalid castling field"),
            FenParseError::InvalidEnPassant => write!(f, "invalid en-passant square"),
            FenParseError::TrailingInput => write!(f, "unexpected input after FEN"),
        }
    }
}

impl Error for FenParseError {}

/// A chess position: what stands where, whose turn it is, which castles are still available
/// and which square (if any) can be captured onto en passant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castle_status: CastleStatus,
    en_passant_square: Option<Square>,
}

//
// Board state getters
//

impl Position {
    /// An empty board with White to move and no castling rights.
    pub fn new() -> Position {
        Position {
            board: [None; 64],
            side_to_move: Color::White,
            castle_status: CastleStatus::NONE,
            en_passant_square: None,
        }
    }

    pub fn from_start_position() -> Position {
        Position::from_fen(START_FEN).expect("start position FEN is valid")
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.index()]
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn castle_status(&self) -> CastleStatus {
        self.castle_status
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::kingside(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status.contains(CastleStatus::queenside(color))
    }

    /// Every piece of the given color with its square, in scan order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|&(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }
}

//
// Move application and board manipulation
//

impl Position {
    pub fn set_piece(&mut self, square: Square, piece: Piece) {
        self.board[square.index()] = Some(piece);
    }

    /// Removes and returns whatever stands on the square.
    pub fn take_piece(&mut self, square: Square) -> Option<Piece> {
        self.board[square.index()].take()
    }

    /// Applies a move that the caller has already checked for legality and returns the piece
    /// it captured, if any. Castling is recognized by the king moving two files and en passant
    /// by a pawn moving diagonally onto the en-passant square. A pawn reaching its last rank
    /// becomes the move's promotion piece, or a queen if the move doesn't name one.
    pub fn apply_move(&mut self, mov: Move) -> Option<Piece> {
        let mover = self.side_to_move;
        let source = mov.source();
        let dest = mov.destination();
        let moving_piece = self
            .take_piece(source)
            .expect("invalid move: no piece at source square");

        // Capture first. En passant is the one capture where the victim is not on the
        // destination square; it sits beside the capturing pawn, on the destination's file.
        let is_en_passant = moving_piece.kind == PieceKind::Pawn
            && Some(dest) == self.en_passant_square
            && source.file() != dest.file();
        let captured = if is_en_passant {
            self.take_piece(Square::of(source.rank(), dest.file()))
        } else {
            self.take_piece(dest)
        };

        // A rook taken on its home corner takes its owner's castle on that side with it.
        if let Some(piece) = captured {
            if piece.kind == PieceKind::Rook {
                self.castle_status
                    .remove(corner_castle_mask(piece.color, dest));
            }
        }

        if moving_piece.kind == PieceKind::King && file_distance(source, dest) == 2 {
            let rank = source.rank();
            let (rook_from, rook_to) = if dest.file() == File::G {
                (Square::of(rank, File::H), Square::of(rank, File::F))
            } else {
                (Square::of(rank, File::A), Square::of(rank, File::D))
            };

            let rook = self
                .take_piece(rook_from)
                .expect("invalid move: castle without rook");
            self.set_piece(rook_to, rook);
        }

        let placed = if moving_piece.kind == PieceKind::Pawn && dest.rank() == mover.promotion_rank()
        {
            Piece::new(mov.promotion_piece().unwrap_or(PieceKind::Queen), mover)
        } else {
            moving_piece
        };
        self.set_piece(dest, placed);

        match moving_piece.kind {
            PieceKind::King => self.castle_status.remove(CastleStatus::both(mover)),
            PieceKind::Rook => self
                .castle_status
                .remove(corner_castle_mask(mover, source)),
            _ => {}
        }

        self.en_passant_square =
            if moving_piece.kind == PieceKind::Pawn && rank_distance(source, dest) == 2 {
                source.offset(mover.forward(), 0)
            } else {
                None
            };

        self.side_to_move = mover.toggle();
        captured
    }
}

//
// Board analysis (attack and check detection)
//

impl Position {
    /// Whether any piece of color `by` attacks the square. Pawns attack only their capture
    /// squares and kings only their neighbours; castling never attacks anything.
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        let holds = |sq: Square, kinds: &[PieceKind]| match self.piece_at(sq) {
            Some(piece) => piece.color == by && kinds.contains(&piece.kind),
            None => false,
        };

        // A pawn of `by` attacks this square from the squares a pawn of the other color
        // standing here would capture on.
        if attacks::pawn_attacks(square, by.toggle())
            .iter()
            .any(|sq| holds(sq, &[PieceKind::Pawn]))
        {
            return true;
        }

        if attacks::knight_attacks(square)
            .iter()
            .any(|sq| holds(sq, &[PieceKind::Knight]))
        {
            return true;
        }

        if attacks::king_attacks(square)
            .iter()
            .any(|sq| holds(sq, &[PieceKind::King]))
        {
            return true;
        }

        // Sliders: walk each ray out from the target and look at the first piece found.
        let first_on_ray = |dir| {
            attacks::ray(square, dir)
                .iter()
                .cloned()
                .find(|&sq| self.piece_at(sq).is_some())
        };

        let straight = [PieceKind::Rook, PieceKind::Queen];
        if ROOK_DIRECTIONS
            .iter()
            .filter_map(|&dir| first_on_ray(dir))
            .any(|sq| holds(sq, &straight))
        {
            return true;
        }

        let diagonal = [PieceKind::Bishop, PieceKind::Queen];
        BISHOP_DIRECTIONS
            .iter()
            .filter_map(|&dir| first_on_ray(dir))
            .any(|sq| holds(sq, &diagonal))
    }

    /// Whether the given color's king is attacked. A color with no king is never in check.
    pub fn is_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.is_square_attacked(king, color.toggle()),
            None => false,
        }
    }
}

//
// FEN input and output. Only the four position fields are kept; the move clocks of a full
// FEN string are accepted and ignored.
//

impl Position {
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        let mut fields = fen.as_ref().split_whitespace();
        let mut pos = Position::new();

        let placement = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenParseError::WrongRankCount);
        }

        for (row, &rank) in rows.iter().zip(RANKS.iter().rev()) {
            let mut file = 0;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip < 1 || skip > 8 {
                        return Err(FenParseError::InvalidDigit);
                    }

                    file += skip as usize;
                } else {
                    let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                    if file >= 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    pos.set_piece(Square::of(rank, FILES[file]), piece);
                    file += 1;
                }

                if file > 8 {
                    return Err(FenParseError::FileDoesNotSumToEight);
                }
            }

            if file != 8 {
                return Err(FenParseError::FileDoesNotSumToEight);
            }
        }

        pos.side_to_move = match fields.next() {
            Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(_) => return Err(FenParseError::InvalidSideToMove),
            None => return Err(FenParseError::UnexpectedEnd),
        };

        let castles = fields.next().ok_or(FenParseError::UnexpectedEnd)?;
        if castles != "-" {
            for c in castles.chars() {
                let flag = match c {
                    'K' => CastleStatus::WHITE_KINGSIDE,
                    'Q' => CastleStatus::WHITE_QUEENSIDE,
                    'k' => CastleStatus::BLACK_KINGSIDE,
                    'q' => CastleStatus::BLACK_QUEENSIDE,
                    _ => return Err(FenParseError::InvalidCastle),
                };
                pos.castle_status |= flag;
            }
        }

        pos.en_passant_square = match fields.next() {
            Some("-") => None,
            Some(text) => Some(
                text.parse::<Square>()
                    .map_err(|_| FenParseError::InvalidEnPassant)?,
            ),
            None => return Err(FenParseError::UnexpectedEnd),
        };

        // Halfmove and fullmove clocks, if present, must at least be numbers.
        for clock in fields.by_ref().take(2) {
            if clock.parse::<u32>().is_err() {
                return Err(FenParseError::TrailingInput);
            }
        }

        if fields.next().is_some() {
            return Err(FenParseError::TrailingInput);
        }

        Ok(pos)
    }

    /// The placement, side-to-move, castling and en-passant fields of FEN.
    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                match self.piece_at(Square::of(rank, file)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(&mut buf, "{}", empty_squares).unwrap();
                            empty_squares = 0;
                        }
                        write!(&mut buf, "{}", piece).unwrap();
                    }
                    None => empty_squares += 1,
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != Rank::One {
                buf.push('/');
            }
        }

        buf.push(' ');
        buf.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        buf.push(' ');
        if self.castle_status.is_empty() {
            buf.push('-');
        } else {
            for &(flag, c) in &[
                (CastleStatus::WHITE_KINGSIDE, 'K'),
                (CastleStatus::WHITE_QUEENSIDE, 'Q'),
                (CastleStatus::BLACK_KINGSIDE, 'k'),
                (CastleStatus::BLACK_QUEENSIDE, 'q'),
            ] {
                if self.castle_status.contains(flag) {
                    buf.push(c);
                }
            }
        }

        buf.push(' ');
        match self.en_passant_square {
            Some(sq) => write!(&mut buf, "{}", sq).unwrap(),
            None => buf.push('-'),
        }

        buf
    }
}

//
// Trait implementations
//

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                match self.piece_at(Square::of(rank, file)) {
                    Some(piece) => write!(f, " {} ", piece)?,
                    None => write!(f, " . ")?,
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::from_start_position()
    }
}

//
// Helper functions
//

/// The castle right tied to a rook standing on `square`, if that square is one of the
/// color's rook corners.
fn corner_castle_mask(color: Color, square: Square) -> CastleStatus {
    let rank = color.back_rank();
    if square == Square::of(rank, File::H) {
        CastleStatus::kingside(color)
    } else if square == Square::of(rank, File::A) {
        CastleStatus::queenside(color)
    } else {
        CastleStatus::NONE
    }
}

fn file_distance(a: Square, b: Square) -> usize {
    (a.file() as i32 - b.file() as i32).abs() as usize
}

fn rank_distance(a: Square, b: Square) -> usize {
    (a.rank() as i32 - b.rank() as i32).abs() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_smoke() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/K1r4k w - - 0 1").unwrap();
        assert!(pos.is_check(Color::White));
        assert!(!pos.is_check(Color::Black));
    }

    #[test]
    fn blocked_slider_does_not_check() {
        let pos = Position::from_fen("8/8/4q3/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(!pos.is_check(Color::White));
    }

    #[test]
    fn pawn_attacks_only_diagonally() {
        let pos = Position::from_fen("8/8/8/8/4p3/8/8/8 w - - 0 1").unwrap();
        assert!(pos.is_square_attacked(Square::D3, Color::Black));
        assert!(pos.is_square_attacked(Square::F3, Color::Black));
        assert!(!pos.is_square_attacked(Square::E3, Color::Black));
        assert!(!pos.is_square_attacked(Square::D5, Color::Black));
    }

    #[test]
    fn knight_and_king_attacks() {
        let pos = Position::from_fen("8/8/8/3n4/8/8/8/6K1 w - - 0 1").unwrap();
        assert!(pos.is_square_attacked(Square::E3, Color::Black));
        assert!(!pos.is_square_attacked(Square::D4, Color::Black));
        assert!(pos.is_square_attacked(Square::H2, Color::White));
        assert!(!pos.is_square_attacked(Square::H3, Color::White));
    }

    mod fen {
        use super::*;

        #[test]
        fn starting_position() {
            let pos = Position::from_start_position();
            assert_eq!(Color::White, pos.side_to_move());
            assert!(pos.can_castle_kingside(Color::White));
            assert!(pos.can_castle_queenside(Color::Black));
            assert_eq!(None, pos.en_passant_square());
            assert_eq!(
                Some(Piece::new(PieceKind::Queen, Color::White)),
                pos.piece_at(Square::D1)
            );
            assert_eq!(
                Some(Piece::new(PieceKind::King, Color::Black)),
                pos.piece_at(Square::E8)
            );
            assert_eq!(32, Square::all().filter(|&s| pos.piece_at(s).is_some()).count());
        }

        #[test]
        fn as_fen_round_trips() {
            let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b Kq e3";
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(fen, pos.as_fen());
        }

        #[test]
        fn clocks_are_optional() {
            let with = Position::from_fen("8/8/8/8/8/8/8/K6k w - - 3 40").unwrap();
            let without = Position::from_fen("8/8/8/8/8/8/8/K6k w - -").unwrap();
            assert_eq!(with, without);
        }

        #[test]
        fn empty() {
            assert_eq!(Err(FenParseError::UnexpectedEnd), Position::from_fen(""));
        }

        #[test]
        fn unknown_piece() {
            let err = Position::from_fen("8/8/8/8/8/8/8/7x w - - 0 1").unwrap_err();
            assert_eq!(FenParseError::UnknownPiece('x'), err);
        }

        #[test]
        fn invalid_digit() {
            let err = Position::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").unwrap_err();
            assert_eq!(FenParseError::InvalidDigit, err);
        }

        #[test]
        fn not_sum_to_8() {
            let err = Position::from_fen("pppp5/8/8/8/8/8/8/8 w - - 0 1").unwrap_err();
            assert_eq!(FenParseError::FileDoesNotSumToEight, err);
        }

        #[test]
        fn too_few_ranks() {
            let err = Position::from_fen("8/8/8/8/8/8/8 w - - 0 1").unwrap_err();
            assert_eq!(FenParseError::WrongRankCount, err);
        }

        #[test]
        fn bad_side_to_move() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 c - - 0 1").unwrap_err();
            assert_eq!(FenParseError::InvalidSideToMove, err);
        }

        #[test]
        fn bad_castle_status() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w a - 0 1").unwrap_err();
            assert_eq!(FenParseError::InvalidCastle, err);
        }

        #[test]
        fn bad_en_passant() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - 88 0 1").unwrap_err();
            assert_eq!(FenParseError::InvalidEnPassant, err);
        }

        #[test]
        fn trailing_input() {
            let err = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 1 extra").unwrap_err();
            assert_eq!(FenParseError::TrailingInput, err);
        }
    }

    mod apply {
        use super::*;

        #[test]
        fn opening_pawn_push() {
            let mut pos = Position::from_start_position();
            let captured = pos.apply_move(Move::new(Square::E2, Square::E3));

            assert_eq!(None, captured);
            assert_eq!(Color::Black, pos.side_to_move());
            assert_eq!(None, pos.piece_at(Square::E2));
            assert_eq!(
                Some(Piece::new(PieceKind::Pawn, Color::White)),
                pos.piece_at(Square::E3)
            );
            assert_eq!(None, pos.en_passant_square());
        }

        #[test]
        fn double_pawn_push_sets_ep() {
            let mut pos = Position::from_fen("8/8/8/8/8/8/4P3/8 w - - 0 1").unwrap();
            pos.apply_move(Move::new(Square::E2, Square::E4));
            assert_eq!(Some(Square::E3), pos.en_passant_square());

            let mut pos = Position::from_fen("8/3p4/8/8/8/8/8/8 b - - 0 1").unwrap();
            pos.apply_move(Move::new(Square::D7, Square::D5));
            assert_eq!(Some(Square::D6), pos.en_passant_square());
        }

        #[test]
        fn en_passant_reset() {
            let mut pos = Position::from_fen("8/8/8/8/4Pp2/8/8/8 b - e3 0 1").unwrap();
            pos.apply_move(Move::new(Square::F4, Square::F3));
            assert_eq!(Color::White, pos.side_to_move());
            assert_eq!(None, pos.en_passant_square());
        }

        #[test]
        fn en_passant_removes_bypassing_pawn() {
            let mut pos = Position::from_fen("8/8/8/8/4Pp2/8/8/8 b - e3 0 1").unwrap();
            let captured = pos.apply_move(Move::new(Square::F4, Square::E3));
            assert_eq!(Some(Piece::new(PieceKind::Pawn, Color::White)), captured);
            assert_eq!(None, pos.piece_at(Square::E4));
            assert_eq!(
                Some(Piece::new(PieceKind::Pawn, Color::Black)),
                pos.piece_at(Square::E3)
            );
        }

        #[test]
        fn kingside_castle_moves_rook() {
            let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
            pos.apply_move(Move::new(Square::E1, Square::G1));
            assert_eq!(PieceKind::King, pos.piece_at(Square::G1).unwrap().kind);
            assert_eq!(PieceKind::Rook, pos.piece_at(Square::F1).unwrap().kind);
            assert_eq!(None, pos.piece_at(Square::H1));
            assert!(!pos.can_castle_kingside(Color::White));
            assert!(!pos.can_castle_queenside(Color::White));
            assert!(pos.can_castle_kingside(Color::Black));
        }

        #[test]
        fn queenside_castle_moves_rook() {
            let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
            pos.apply_move(Move::new(Square::E8, Square::C8));
            assert_eq!(PieceKind::King, pos.piece_at(Square::C8).unwrap().kind);
            assert_eq!(PieceKind::Rook, pos.piece_at(Square::D8).unwrap().kind);
            assert_eq!(None, pos.piece_at(Square::A8));
            assert!(!pos.can_castle_queenside(Color::Black));
        }

        #[test]
        fn rook_move_loses_one_right() {
            let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
            pos.apply_move(Move::new(Square::A1, Square::A2));
            assert!(!pos.can_castle_queenside(Color::White));
            assert!(pos.can_castle_kingside(Color::White));
        }

        #[test]
        fn rook_captured_on_corner_loses_right() {
            let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
            pos.apply_move(Move::new(Square::H1, Square::H8));
            assert!(!pos.can_castle_kingside(Color::Black));
            assert!(pos.can_castle_queenside(Color::Black));
            assert!(!pos.can_castle_kingside(Color::White));
        }

        #[test]
        fn promotion_defaults_to_queen() {
            let mut pos = Position::from_fen("8/4P3/8/8/8/8/8/8 w - - 0 1").unwrap();
            pos.apply_move(Move::new(Square::E7, Square::E8));
            assert_eq!(
                Some(Piece::new(PieceKind::Queen, Color::White)),
                pos.piece_at(Square::E8)
            );
        }

        #[test]
        fn promotion_to_named_piece() {
            let mut pos = Position::from_fen("5n2/4P3/8/8/8/8/8/8 w - - 0 1").unwrap();
            let captured = pos.apply_move(Move::promotion(Square::E7, Square::F8, PieceKind::Knight));
            assert_eq!(PieceKind::Knight, captured.unwrap().kind);
            assert_eq!(
                Some(Piece::new(PieceKind::Knight, Color::White)),
                pos.piece_at(Square::F8)
            );
        }
    }
}
