// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A line-oriented driver for a `Game`. Each input line is one command and
//! each command gets exactly one JSON line back, except that a move handing
//! the turn to the engine is followed by a second line for the engine's
//! reply. The JSON is the payload a chat room would broadcast.
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;

use crate::config::GameConfig;
use crate::game::{Game, MoveOutcome, MoveRecord, Rejection, StatusReport};
use crate::moves::Move;
use crate::squareset::SquareSet;
use crate::types::{PieceKind, Square};

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Ok(Event),
    Rejected { reason: Rejection, message: String },
    Error { message: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Moved(MoveOutcome),
    PromotionPending { from: Square, to: Square },
    Undone { status: StatusReport },
    Moves { from: Square, destinations: SquareSet },
    Status(StatusReport),
    Board { board: String },
    Fen { fen: String },
    History { moves: Vec<MoveRecord> },
    NewGame { status: StatusReport },
}

impl From<Result<Event, Rejection>> for Reply {
    fn from(result: Result<Event, Rejection>) -> Reply {
        match result {
            Ok(event) => Reply::Ok(event),
            Err(reason) => Reply::Rejected {
                reason,
                message: reason.to_string(),
            },
        }
    }
}

pub struct ConsoleSession {
    game: Game,
    config: GameConfig,
}

impl ConsoleSession {
    pub fn new(config: GameConfig, game: Game) -> ConsoleSession {
        ConsoleSession { game, config }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn run<R, W>(&mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        self.play_engine_turn(&mut writer)?;
        for maybe_line in reader.lines() {
            let line = maybe_line?;
            let components: Vec<_> = line.split_whitespace().collect();
            let reply: Reply = match components.split_first() {
                None => continue,
                Some((&"quit", [])) => break,
                Some((&"move", [mov])) => self.handle_move(mov),
                Some((&"promote", [kind])) => self.handle_promote(kind),
                Some((&"undo", [])) => self
                    .game
                    .request_undo()
                    .map(|()| Event::Undone {
                        status: self.game.status(),
                    })
                    .into(),
                Some((&"moves", [square])) => self.handle_moves(square),
                Some((&"status", [])) => Reply::Ok(Event::Status(self.game.status())),
                Some((&"ai", [])) => self.game.request_ai_move().map(Event::Moved).into(),
                Some((&"board", [])) => Reply::Ok(Event::Board {
                    board: self.game.position().to_string(),
                }),
                Some((&"fen", [])) => Reply::Ok(Event::Fen {
                    fen: self.game.position().as_fen(),
                }),
                Some((&"history", [])) => Reply::Ok(Event::History {
                    moves: self.game.history().to_vec(),
                }),
                Some((&"new", [])) => {
                    self.game.reset();
                    Reply::Ok(Event::NewGame {
                        status: self.game.status(),
                    })
                }
                Some((mov, [])) if Move::from_uci(mov).is_some() => self.handle_move(mov),
                Some(_) => Reply::Error {
                    message: format!("unrecognized command `{}`", line.trim()),
                },
            };

            let played = match reply {
                Reply::Ok(Event::Moved(_)) | Reply::Ok(Event::NewGame { .. }) => true,
                _ => false,
            };

            write_reply(&mut writer, &reply)?;
            if played {
                self.play_engine_turn(&mut writer)?;
            }
        }

        Ok(())
    }

    fn handle_move(&mut self, text: &str) -> Reply {
        let mov = match Move::from_uci(text) {
            Some(mov) => mov,
            None => {
                return Reply::Error {
                    message: format!("`{}` is not a move", text),
                }
            }
        };

        if mov.promotion_piece().is_some() && !self.is_promotion_push(mov) {
            return Reply::Error {
                message: format!("`{}` is not a promotion", text),
            };
        }

        let outcome = match self.game.request_move(mov.source(), mov.destination()) {
            Ok(outcome) => outcome,
            Err(rejection) => return Reply::from(Err::<Event, _>(rejection)),
        };

        match (outcome.record.is_some(), mov.promotion_piece()) {
            (true, _) => Reply::Ok(Event::Moved(outcome)),
            (false, Some(kind)) => self.game.resolve_promotion(kind).map(Event::Moved).into(),
            (false, None) => Reply::Ok(Event::PromotionPending {
                from: mov.source(),
                to: mov.destination(),
            }),
        }
    }

    /// A pawn of the side to move heading for its last rank. Legality is left to the game.
    fn is_promotion_push(&self, mov: Move) -> bool {
        let pos = self.game.position();
        match pos.piece_at(mov.source()) {
            Some(piece) => {
                piece.kind == PieceKind::Pawn
                    && piece.color == pos.side_to_move()
                    && mov.destination().rank() == piece.color.promotion_rank()
            }
            None => false,
        }
    }

    fn handle_promote(&mut self, text: &str) -> Reply {
        let mut chars = text.chars();
        let kind = match (chars.next().and_then(PieceKind::from_letter), chars.next()) {
            (Some(kind), None) => kind,
            _ => {
                return Reply::Error {
                    message: format!("`{}` is not a piece", text),
                }
            }
        };

        self.game.resolve_promotion(kind).map(Event::Moved).into()
    }

    fn handle_moves(&self, text: &str) -> Reply {
        match text.parse::<Square>() {
            Ok(from) => Reply::Ok(Event::Moves {
                from,
                destinations: self.game.legal_destinations(from),
            }),
            Err(()) => Reply::Error {
                message: format!("`{}` is not a square", text),
            },
        }
    }

    /// Plays the engine's move if it is the engine's turn: books it, waits out the configured
    /// delay and then fires the ticket.
    fn play_engine_turn<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        let side = self.game.position().side_to_move();
        if self.config.ai_color != Some(side) {
            return Ok(());
        }

        let ticket = match self.game.schedule_ai_move(self.config.ai_delay()) {
            Ok(ticket) => ticket,
            // Mate, stalemate or a promotion still being chosen; nothing to play.
            Err(_) => return Ok(()),
        };

        thread::sleep(ticket.remaining(Instant::now()));
        let reply: Reply = self.game.complete_ai_move(ticket).map(Event::Moved).into();
        write_reply(writer, &reply)
    }
}

fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, reply)?;
    writeln!(writer)?;
    writer.flush()
}
