// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The chess engine behind the parlor's chess table: board model, legal move
//! generation, the game state machine with promotion and undo, move-log
//! notation and a shallow alpha-beta opponent.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod attacks;
pub mod config;
pub mod console;
pub mod eval;
pub mod game;
pub mod movegen;
mod moves;
pub mod notation;
mod perft;
mod position;
pub mod search;
mod squareset;
mod types;

pub use config::{ConfigError, GameConfig};
pub use game::{
    AiTicket, Game, GameStatus, MoveOutcome, MoveRecord, PendingPromotion, Phase, Rejection,
    StatusReport,
};
pub use movegen::{MoveVec, Promotions};
pub use moves::Move;
pub use perft::perft;
pub use position::{FenParseError, Position, START_FEN};
pub use squareset::{SquareSet, SquareSetIter};
pub use types::{CastleStatus, Color, File, Piece, PieceKind, Rank, Square};
