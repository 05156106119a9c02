// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp;
use std::time::Instant;

use crate::eval::{BoardEvaluator, Score};
use crate::movegen::{self, MoveVec, Promotions};
use crate::moves::Move;
use crate::position::Position;
use crate::search::{DataRecorder, NullDataRecorder, Record};
use crate::types::Color;

/// Plies searched when no depth is configured: one move for the searching side and one reply.
pub const DEFAULT_DEPTH: u32 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    pub nodes_searched: u64,
    pub score: Score,
}

/// Fixed-depth minimax with alpha-beta pruning. Every node is a fresh copy of its parent with
/// one move applied, so the position handed to `search` is never touched.
///
/// Scores are always relative to the side to move at the root. A node whose side to move has
/// no legal moves is scored as forced, whether that side is mated or stalemated: a win if it is
/// the opponent, a loss if it is the searching side.
pub struct Searcher<E> {
    evaluator: E,
    depth: u32,
    nodes_searched: u64,
    searching_player: Color,
}

impl<E: BoardEvaluator> Searcher<E> {
    pub fn new() -> Searcher<E> {
        Searcher::with_depth(DEFAULT_DEPTH)
    }

    /// A searcher that looks `depth` plies ahead; anything below one ply is treated as one.
    pub fn with_depth(depth: u32) -> Searcher<E> {
        Searcher {
            evaluator: Default::default(),
            depth: cmp::max(depth, 1),
            nodes_searched: 0,
            searching_player: Color::White,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Picks a move for the side to move in `pos`, or `None` if it has no legal move.
    pub fn search(&mut self, pos: &Position) -> Option<SearchResult> {
        self.search_recorded(pos, &NullDataRecorder)
    }

    /// Like `search`, additionally handing the search's statistics to `recorder`.
    pub fn search_recorded(
        &mut self,
        pos: &Position,
        recorder: &dyn DataRecorder,
    ) -> Option<SearchResult> {
        let start = Instant::now();
        self.nodes_searched = 0;
        self.searching_player = pos.side_to_move();

        let mut moves = MoveVec::new();
        movegen::legal_move_list(pos, Promotions::QueenOnly, &mut moves);

        let mut best: Option<(Move, Score)> = None;
        let mut alpha = Score::MIN;
        for &mov in moves.iter() {
            let mut child = pos.clone();
            child.apply_move(mov);
            let score = self.minimax(&child, self.depth - 1, alpha, Score::MAX, false);
            debug!("candidate {} scored {}", mov, score);

            // Strictly better only, so the first of several equal moves is kept.
            let improves = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };

            if improves {
                best = Some((mov, score));
            }

            alpha = cmp::max(alpha, score);
        }

        let (best_move, score) = best?;
        let elapsed = start.elapsed();
        recorder.record(
            pos,
            &Record {
                depth: self.depth,
                candidates: moves.len() as u32,
                nodes: self.nodes_searched,
                best_move: best_move.to_string(),
                score: score.centipawns(),
                elapsed_ms: elapsed.as_secs() * 1000 + u64::from(elapsed.subsec_millis()),
                ..Record::default()
            },
        );

        info!(
            "search chose {} ({}) after {} nodes",
            best_move, score, self.nodes_searched
        );
        Some(SearchResult {
            best_move,
            nodes_searched: self.nodes_searched,
            score,
        })
    }

    fn minimax(
        &mut self,
        pos: &Position,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Score {
        if depth == 0 {
            self.nodes_searched += 1;
            return self.evaluator.evaluate(pos, self.searching_player);
        }

        let mut moves = MoveVec::new();
        movegen::legal_move_list(pos, Promotions::QueenOnly, &mut moves);
        if moves.is_empty() {
            self.nodes_searched += 1;
            return if maximizing {
                Score::FORCED_LOSS
            } else {
                Score::FORCED_WIN
            };
        }

        let mut best = if maximizing { Score::MIN } else { Score::MAX };
        for &mov in moves.iter() {
            let mut child = pos.clone();
            child.apply_move(mov);
            let score = self.minimax(&child, depth - 1, alpha, beta, !maximizing);
            if maximizing {
                best = cmp::max(best, score);
                alpha = cmp::max(alpha, best);
            } else {
                best = cmp::min(best, score);
                beta = cmp::min(beta, best);
            }

            if alpha >= beta {
                break;
            }
        }

        best
    }
}

impl<E: BoardEvaluator> Default for Searcher<E> {
    fn default() -> Searcher<E> {
        Searcher::new()
    }
}
