// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate criterion;

use criterion::black_box;
use criterion::Criterion;
use parlor::eval::PieceSquareEvaluator;
use parlor::movegen::{self, Promotions};
use parlor::search::Searcher;
use parlor::{attacks, perft, Color, MoveVec, Position, Square};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("knight attacks f5", |b| {
        b.iter(|| attacks::knight_attacks(black_box(Square::F5)))
    });

    c.bench_function("position clone", |b| {
        let pos = Position::from_start_position();
        b.iter(|| black_box(&pos).clone())
    });

    c.bench_function("is check kiwipete", |b| {
        let pos = Position::from_fen(KIWIPETE).unwrap();
        b.iter(|| black_box(&pos).is_check(Color::White))
    });

    c.bench_function("legal moves start", |b| {
        let pos = Position::from_start_position();
        b.iter(|| {
            let mut moves = MoveVec::new();
            movegen::legal_move_list(black_box(&pos), Promotions::All, &mut moves);
            moves
        });
    });

    c.bench_function("legal moves kiwipete", |b| {
        let pos = Position::from_fen(KIWIPETE).unwrap();
        b.iter(|| {
            let mut moves = MoveVec::new();
            movegen::legal_move_list(black_box(&pos), Promotions::All, &mut moves);
            moves
        });
    });

    c.bench_function("search depth 2 start", |b| {
        let pos = Position::from_start_position();
        b.iter(|| {
            let mut searcher: Searcher<PieceSquareEvaluator> = Searcher::new();
            searcher.search(black_box(&pos))
        });
    });

    c.bench_function("perft 3 start", |b| {
        let pos = Position::from_start_position();
        b.iter(|| perft(black_box(&pos), 3))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
