// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use parlor::eval::PieceSquareEvaluator;
use parlor::movegen::{self, Promotions};
use parlor::search::Searcher;
use parlor::{Color, Move, MoveVec, Position, Square};

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
];

fn legal_moves_of(pos: &Position) -> MoveVec {
    let mut moves = MoveVec::new();
    movegen::legal_move_list(pos, Promotions::All, &mut moves);
    moves
}

fn assert_king_safe(pos: &Position, depth: u32) {
    if depth == 0 {
        return;
    }

    let mover = pos.side_to_move();
    for mov in legal_moves_of(pos) {
        let mut child = pos.clone();
        child.apply_move(mov);
        if child.is_check(mover) {
            println!("{}", pos);
            panic!("legal move {} leaves the {} king in check", mov, mover);
        }

        assert_king_safe(&child, depth - 1);
    }
}

#[test]
fn legal_moves_never_leave_king_in_check() {
    for fen in POSITIONS {
        let pos = Position::from_fen(fen).unwrap();
        assert_king_safe(&pos, 2);
    }
}

#[test]
fn pseudo_moves_outside_legal_set_leave_king_in_check() {
    for fen in POSITIONS {
        let pos = Position::from_fen(fen).unwrap();
        let mover = pos.side_to_move();
        for (from, _) in pos.pieces(mover) {
            let legal = movegen::legal_moves(&pos, from, mover);
            for to in movegen::pseudo_moves(&pos, from, mover) - legal {
                let mut child = pos.clone();
                child.apply_move(Move::new(from, to));
                assert!(
                    child.is_check(mover),
                    "{}{} was dropped but is safe in {}",
                    from,
                    to,
                    fen
                );
            }
        }
    }
}

#[test]
fn start_position_has_twenty_moves() {
    let pos = Position::from_start_position();
    assert_eq!(20, legal_moves_of(&pos).len());
    assert!(movegen::has_any_legal_move(&pos, Color::White));
}

#[test]
fn search_picks_legal_move_and_leaves_position() {
    for fen in POSITIONS {
        let pos = Position::from_fen(fen).unwrap();
        let snapshot = pos.clone();
        let mut searcher: Searcher<PieceSquareEvaluator> = Searcher::new();
        let result = searcher.search(&pos).unwrap();

        assert_eq!(snapshot, pos);
        assert!(
            movegen::is_legal(&pos, result.best_move),
            "search chose illegal move {} in {}",
            result.best_move,
            fen
        );
    }
}

#[test]
fn search_ties_go_to_first_move() {
    // Kc6, Kc7 and Kc8 score the same; c6 comes first in scan order.
    let pos = Position::from_fen("8/3K4/8/8/8/8/8/7k w - - 0 1").unwrap();
    let mut searcher: Searcher<PieceSquareEvaluator> = Searcher::with_depth(1);
    let result = searcher.search(&pos).unwrap();
    let first = legal_moves_of(&pos)[0];
    assert_eq!(first, result.best_move);
    assert_eq!(Move::new(Square::D7, Square::C6), result.best_move);
}
