// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The game state machine. A `Game` owns the live position and is the only
//! thing that mutates it: it checks every request against the legal move
//! set, keeps the move log, suspends pawn promotions until a piece is
//! chosen, recomputes check/mate/stalemate after every move and undoes by
//! replaying the log from the starting position.
//!
//! The engine's own move is requested either immediately or through a
//! deferred ticket, which the caller fires once the ticket is due. While a
//! ticket is outstanding the game accepts nothing else, so a late ticket can
//! never act on a game that has moved on.
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{ConfigError, GameConfig};
use crate::eval::PieceSquareEvaluator;
use crate::movegen;
use crate::moves::Move;
use crate::notation;
use crate::position::Position;
use crate::search::{SearchResult, Searcher};
use crate::squareset::SquareSet;
use crate::types::{Color, PieceKind, Square};

/// One completed half-move, as it appears in the move log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The kind of the moving piece before it moved; a promoting pawn is a pawn here.
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub san: String,
    pub color: Color,
}

impl MoveRecord {
    pub fn as_move(&self) -> Move {
        match self.promotion {
            Some(kind) => Move::promotion(self.from, self.to, kind),
            None => Move::new(self.from, self.to),
        }
    }
}

/// A pawn move onto the last rank, waiting for the mover to pick a piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PendingPromotion {
    pub from: Square,
    pub to: Square,
    pub color: Color,
    pub partial_san: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Check,
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    /// Status of `pos` from the point of view of its side to move.
    pub fn of(pos: &Position) -> GameStatus {
        let side = pos.side_to_move();
        let in_check = pos.is_check(side);
        let has_moves = movegen::has_any_legal_move(pos, side);
        match (in_check, has_moves) {
            (true, false) => GameStatus::Checkmate {
                winner: side.toggle(),
            },
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::InProgress,
        }
    }

    pub fn is_terminal(self) -> bool {
        match self {
            GameStatus::Checkmate { .. } | GameStatus::Stalemate => true,
            GameStatus::InProgress | GameStatus::Check => false,
        }
    }

    pub fn in_check(self) -> bool {
        match self {
            GameStatus::Check | GameStatus::Checkmate { .. } => true,
            GameStatus::InProgress | GameStatus::Stalemate => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub side_to_move: Color,
    pub in_check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
}

/// The result of an accepted move request. `record` is empty while a promotion is waiting for
/// its piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub status: GameStatus,
    pub record: Option<MoveRecord>,
}

/// A scheduled engine move. Only the most recently issued ticket is live; every other ticket is
/// stale and completing it is rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AiTicket {
    id: u64,
    due: Instant,
}

impl AiTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        if now >= self.due {
            Duration::from_millis(0)
        } else {
            self.due - now
        }
    }
}

/// Where the game is waiting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingMove(Color),
    AwaitingPromotion(PendingPromotion),
    AwaitingAi(AiTicket),
    Finished(GameStatus),
}

/// Reasons a request is refused. A refused request leaves the game exactly as it was.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    IllegalMove,
    WrongTurn,
    PromotionRequired,
    NoPendingPromotion,
    UndoUnavailable,
    InvalidPromotion,
    GameOver,
    AiMovePending,
    StaleAiTicket,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            Rejection::IllegalMove => "that piece cannot move there",
            Rejection::WrongTurn => "it is the other side's turn",
            Rejection::PromotionRequired => "a promotion piece must be chosen first",
            Rejection::NoPendingPromotion => "there is no promotion to resolve",
            Rejection::UndoUnavailable => "there is no full turn to undo",
            Rejection::InvalidPromotion => "pawns promote to a queen, rook, bishop or knight",
            Rejection::GameOver => "the game is over",
            Rejection::AiMovePending => "the engine is about to move",
            Rejection::StaleAiTicket => "that engine move was cancelled",
        };

        f.write_str(msg)
    }
}

impl Error for Rejection {}

fn reject<T>(rejection: Rejection) -> Result<T, Rejection> {
    info!("rejected request: {}", rejection);
    Err(rejection)
}

pub struct Game {
    start: Position,
    position: Position,
    history: Vec<MoveRecord>,
    pending_promotion: Option<PendingPromotion>,
    status: GameStatus,
    searcher: Searcher<PieceSquareEvaluator>,
    ai_ticket: Option<AiTicket>,
    next_ticket: u64,
}

//
// Construction
//

impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Game {
        Game::from_position(Position::from_start_position())
    }

    /// A game starting from an arbitrary position. Undo replays back to this position, never
    /// past it.
    pub fn from_position(start: Position) -> Game {
        let status = GameStatus::of(&start);
        Game {
            position: start.clone(),
            start,
            history: Vec::new(),
            pending_promotion: None,
            status,
            searcher: Searcher::new(),
            ai_ticket: None,
            next_ticket: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Result<Game, ConfigError> {
        let mut game = Game::from_position(config.start_position()?);
        game.searcher = Searcher::with_depth(config.search_depth);
        Ok(game)
    }
}

//
// Queries
//

impl Game {
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn pending_promotion(&self) -> Option<&PendingPromotion> {
        self.pending_promotion.as_ref()
    }

    pub fn game_status(&self) -> GameStatus {
        self.status
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            side_to_move: self.position.side_to_move(),
            in_check: self.status.in_check(),
            checkmate: match self.status {
                GameStatus::Checkmate { .. } => true,
                _ => false,
            },
            stalemate: self.status == GameStatus::Stalemate,
        }
    }

    pub fn phase(&self) -> Phase {
        if let Some(ticket) = self.ai_ticket {
            Phase::AwaitingAi(ticket)
        } else if let Some(ref pending) = self.pending_promotion {
            Phase::AwaitingPromotion(pending.clone())
        } else if self.status.is_terminal() {
            Phase::Finished(self.status)
        } else {
            Phase::AwaitingMove(self.position.side_to_move())
        }
    }

    /// Squares the piece on `from` may legally move to, for highlighting. Empty when no move can
    /// be made right now.
    pub fn legal_destinations(&self, from: Square) -> SquareSet {
        if self.pending_promotion.is_some() || self.status.is_terminal() {
            return SquareSet::empty();
        }

        movegen::legal_moves(&self.position, from, self.position.side_to_move())
    }
}

//
// Human moves, promotion and undo
//

impl Game {
    /// Plays `from -> to` for the side to move. A pawn reaching its last rank is not played yet:
    /// the game waits for `resolve_promotion` and the outcome carries no record.
    pub fn request_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, Rejection> {
        if self.ai_ticket.is_some() {
            return reject(Rejection::AiMovePending);
        }

        if self.pending_promotion.is_some() {
            return reject(Rejection::PromotionRequired);
        }

        if self.status.is_terminal() {
            return reject(Rejection::GameOver);
        }

        let side = self.position.side_to_move();
        let piece = match self.position.piece_at(from) {
            Some(piece) => piece,
            None => return reject(Rejection::IllegalMove),
        };

        if piece.color != side {
            return reject(Rejection::WrongTurn);
        }

        if !movegen::legal_moves(&self.position, from, side).contains(to) {
            return reject(Rejection::IllegalMove);
        }

        if piece.kind == PieceKind::Pawn && to.rank() == side.promotion_rank() {
            let pending = PendingPromotion {
                from,
                to,
                color: side,
                partial_san: notation::describe(&self.position, from, to),
            };

            info!("{} pawn reached {}, awaiting promotion choice", side, to);
            self.pending_promotion = Some(pending);
            return Ok(MoveOutcome {
                status: self.status,
                record: None,
            });
        }

        Ok(self.commit(Move::new(from, to)))
    }

    /// Finishes a suspended promotion with the chosen piece.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<MoveOutcome, Rejection> {
        if self.ai_ticket.is_some() {
            return reject(Rejection::AiMovePending);
        }

        let (from, to) = match self.pending_promotion {
            Some(ref pending) => (pending.from, pending.to),
            None => return reject(Rejection::NoPendingPromotion),
        };

        if !kind.is_promotion_target() {
            return reject(Rejection::InvalidPromotion);
        }

        self.pending_promotion = None;
        Ok(self.commit(Move::promotion(from, to, kind)))
    }

    /// Takes back the last full turn by replaying all but the last two half-moves from the
    /// starting position. A suspended promotion is discarded with it.
    pub fn request_undo(&mut self) -> Result<(), Rejection> {
        if self.ai_ticket.is_some() {
            return reject(Rejection::AiMovePending);
        }

        if self.history.len() < 2 {
            return reject(Rejection::UndoUnavailable);
        }

        let keep = self.history.len() - 2;
        self.history.truncate(keep);
        self.replay();
        info!("undid one turn, {} half-moves remain", keep);
        Ok(())
    }

    /// Back to the starting position. Any scheduled engine move is cancelled first.
    pub fn reset(&mut self) {
        if let Some(ticket) = self.ai_ticket.take() {
            info!("cancelled engine move {} on reset", ticket.id);
        }

        self.history.clear();
        self.replay();
    }

    fn replay(&mut self) {
        let mut position = self.start.clone();
        for record in &self.history {
            position.apply_move(record.as_move());
        }

        self.position = position;
        self.pending_promotion = None;
        self.status = GameStatus::of(&self.position);
    }

    /// Applies an already-validated move, logs it and recomputes the status.
    fn commit(&mut self, mov: Move) -> MoveOutcome {
        let from = mov.source();
        let to = mov.destination();
        let piece = self
            .position
            .piece_at(from)
            .expect("invalid move: no piece at source square");
        let partial_san = notation::describe(&self.position, from, to);
        let promotion = if piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank()
        {
            Some(mov.promotion_piece().unwrap_or(PieceKind::Queen))
        } else {
            None
        };

        let captured = self.position.apply_move(mov);
        self.status = GameStatus::of(&self.position);
        let san = notation::annotate(
            &partial_san,
            promotion,
            self.status.in_check(),
            self.status.is_terminal() && self.status.in_check(),
        );

        let record = MoveRecord {
            from,
            to,
            piece: piece.kind,
            captured: captured.map(|p| p.kind),
            promotion,
            san,
            color: piece.color,
        };

        info!("{} played {}", piece.color, record.san);
        match self.status {
            GameStatus::Checkmate { winner } => info!("checkmate, {} wins", winner),
            GameStatus::Stalemate => info!("stalemate"),
            _ => {}
        }

        self.history.push(record.clone());
        MoveOutcome {
            status: self.status,
            record: Some(record),
        }
    }
}

//
// Engine moves
//

impl Game {
    /// Searches and plays the engine's move for the side to move right away.
    pub fn request_ai_move(&mut self) -> Result<MoveOutcome, Rejection> {
        if self.ai_ticket.is_some() {
            return reject(Rejection::AiMovePending);
        }

        self.check_ai_can_move()?;
        self.play_ai_move()
    }

    /// Books the engine's move to be played after `delay`. Until the ticket is completed or
    /// cancelled, every other request is refused.
    pub fn schedule_ai_move(&mut self, delay: Duration) -> Result<AiTicket, Rejection> {
        if self.ai_ticket.is_some() {
            return reject(Rejection::AiMovePending);
        }

        self.check_ai_can_move()?;
        let ticket = AiTicket {
            id: self.next_ticket,
            due: Instant::now() + delay,
        };

        self.next_ticket += 1;
        self.ai_ticket = Some(ticket);
        debug!("scheduled engine move {} in {:?}", ticket.id, delay);
        Ok(ticket)
    }

    /// Plays the engine's move for a live ticket. A stale ticket changes nothing.
    pub fn complete_ai_move(&mut self, ticket: AiTicket) -> Result<MoveOutcome, Rejection> {
        match self.ai_ticket {
            Some(live) if live.id == ticket.id => {}
            _ => return reject(Rejection::StaleAiTicket),
        }

        self.ai_ticket = None;
        self.play_ai_move()
    }

    /// Withdraws the outstanding ticket, if any, and returns it.
    pub fn cancel_ai_move(&mut self) -> Option<AiTicket> {
        let ticket = self.ai_ticket.take();
        if let Some(ticket) = ticket {
            info!("cancelled engine move {}", ticket.id);
        }

        ticket
    }

    pub fn pending_ai_move(&self) -> Option<AiTicket> {
        self.ai_ticket
    }

    /// Runs the search without playing anything.
    pub fn suggest_move(&mut self) -> Option<SearchResult> {
        self.searcher.search(&self.position)
    }

    fn check_ai_can_move(&self) -> Result<(), Rejection> {
        if self.pending_promotion.is_some() {
            return reject(Rejection::PromotionRequired);
        }

        if self.status.is_terminal() {
            return reject(Rejection::GameOver);
        }

        Ok(())
    }

    fn play_ai_move(&mut self) -> Result<MoveOutcome, Rejection> {
        let result = match self.searcher.search(&self.position) {
            Some(result) => result,
            None => return reject(Rejection::GameOver),
        };

        Ok(self.commit(result.best_move))
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_awaits_white() {
        let game = Game::new();
        assert_eq!(Phase::AwaitingMove(Color::White), game.phase());
        assert_eq!(GameStatus::InProgress, game.game_status());
        assert!(game.history().is_empty());
    }

    #[test]
    fn move_is_recorded() {
        let mut game = Game::new();
        let outcome = game.request_move(Square::G1, Square::F3).unwrap();
        let record = outcome.record.unwrap();
        assert_eq!("Nf3", record.san);
        assert_eq!(PieceKind::Knight, record.piece);
        assert_eq!(Color::White, record.color);
        assert_eq!(None, record.captured);
        assert_eq!(1, game.history().len());
        assert_eq!(Phase::AwaitingMove(Color::Black), game.phase());
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut game = Game::new();
        let before = game.position().clone();
        assert_eq!(
            Err(Rejection::IllegalMove),
            game.request_move(Square::E2, Square::E5)
        );
        assert_eq!(
            Err(Rejection::IllegalMove),
            game.request_move(Square::E4, Square::E5)
        );
        assert_eq!(
            Err(Rejection::WrongTurn),
            game.request_move(Square::E7, Square::E5)
        );
        assert_eq!(&before, game.position());
        assert!(game.history().is_empty());
    }

    #[test]
    fn status_report() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R b - - 0 1").unwrap();
        let game = Game::from_position(pos);
        let report = game.status();
        assert_eq!(Color::Black, report.side_to_move);
        assert!(!report.in_check);
        assert!(!report.checkmate);
        assert!(!report.stalemate);
    }

    #[test]
    fn ticket_timing() {
        let now = Instant::now();
        let ticket = AiTicket {
            id: 0,
            due: now + Duration::from_millis(500),
        };

        assert!(!ticket.is_due(now));
        assert!(ticket.is_due(now + Duration::from_millis(500)));
        assert_eq!(Duration::from_millis(500), ticket.remaining(now));
        assert_eq!(
            Duration::from_millis(0),
            ticket.remaining(now + Duration::from_secs(1))
        );
    }

    #[test]
    fn rejections_serialize_in_snake_case() {
        assert_eq!(
            "\"ai_move_pending\"",
            serde_json::to_string(&Rejection::AiMovePending).unwrap()
        );
    }

    #[test]
    fn status_serializes_with_state_tag() {
        let mate = GameStatus::Checkmate {
            winner: Color::White,
        };
        assert_eq!(
            r#"{"state":"checkmate","winner":"white"}"#,
            serde_json::to_string(&mate).unwrap()
        );
        assert_eq!(
            r#"{"state":"in_progress"}"#,
            serde_json::to_string(&GameStatus::InProgress).unwrap()
        );
    }
}
