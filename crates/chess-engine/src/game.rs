//! Full game management with history tracking.
//!
//! [`Game`] wraps a [`Position`] with everything that needs history or
//! bookkeeping beyond a single board state: move records with SAN, the
//! repetition table, FIDE draw conditions, draw claims and resignation.

use crate::movegen::generate_moves;
use crate::rules::{DrawReason, GameResult, RuleSet, StandardChess};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::{MoveList, Position};
use chess_core::{FenError, Move};
use std::fmt;

/// A recorded move in game history.
#[derive(Debug, Clone)]
pub struct GameMove {
    /// The move in internal format.
    pub mov: Move,
    /// SAN notation for the move.
    pub san: String,
    /// Zobrist hash of the position before the move.
    pub hash_before: u64,
}

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The move is not legal in the current position.
    IllegalMove(String),
    /// The UCI move string could not be parsed.
    InvalidMoveNotation(String),
    /// The SAN string was rejected.
    InvalidSan(SanError),
    /// The game has already ended.
    GameAlreadyOver,
    /// Draw claim conditions are not met.
    CannotClaimDraw,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::IllegalMove(s) => write!(f, "illegal move: {}", s),
            GameError::InvalidMoveNotation(s) => write!(f, "invalid move notation: {}", s),
            GameError::InvalidSan(e) => write!(f, "invalid SAN: {}", e),
            GameError::GameAlreadyOver => write!(f, "game has already ended"),
            GameError::CannotClaimDraw => write!(f, "cannot claim draw: conditions not met"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<SanError> for GameError {
    fn from(e: SanError) -> Self {
        GameError::InvalidSan(e)
    }
}

/// A complete chess game with history tracking.
///
/// Unlike [`Position`], which is a single board state, `Game` keeps the move
/// list and the position hashes needed for repetition detection. Legal moves
/// are recomputed on each query; the position itself stays cheap to copy.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    /// Position hashes seen so far, the current position included.
    history: Vec<u64>,
    moves: Vec<GameMove>,
    start_pos: Position,
    result: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a game from a custom starting position.
    pub fn from_position(position: Position) -> Self {
        let hash = position.zobrist_hash();
        let mut game = Game {
            position: position.clone(),
            history: vec![hash],
            moves: Vec::new(),
            start_pos: position,
            result: None,
        };
        game.check_game_end();
        game
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Returns the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the starting position.
    pub fn start_position(&self) -> &Position {
        &self.start_pos
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&self) -> MoveList {
        generate_moves(&self.position)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.in_check()
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Returns the move history.
    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Plays a move given in internal format.
    pub fn make_move(&mut self, m: Move) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        if !self.legal_moves().as_slice().contains(&m) {
            return Err(GameError::IllegalMove(m.to_uci(self.position.side_to_move())));
        }

        self.apply_move(m);
        Ok(())
    }

    /// Plays a move given in SAN notation.
    pub fn make_move_san(&mut self, san: &str) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        let m = san_to_move(&self.position, san)?;
        self.apply_move(m);
        Ok(())
    }

    /// Plays a move given in UCI notation (e.g. "e2e4", "e7e8q", "e1g1").
    pub fn make_move_uci(&mut self, uci: &str) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        if Move::parse_uci(uci).is_none() {
            return Err(GameError::InvalidMoveNotation(uci.to_string()));
        }

        // Castling, en passant and double pushes all render to a plain
        // from-to string, so matching on the rendered form resolves the
        // move kind for us
        let stm = self.position.side_to_move();
        let matching = self
            .legal_moves()
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.to_uci(stm).eq_ignore_ascii_case(uci));

        match matching {
            Some(m) => {
                self.apply_move(m);
                Ok(())
            }
            None => Err(GameError::IllegalMove(uci.to_string())),
        }
    }

    fn apply_move(&mut self, m: Move) {
        let san = move_to_san(&self.position, m);
        let hash_before = self.position.zobrist_hash();

        self.moves.push(GameMove {
            mov: m,
            san,
            hash_before,
        });

        self.position.apply(m);
        self.history.push(self.position.zobrist_hash());

        self.check_game_end();
    }

    fn check_game_end(&mut self) {
        if self.position_count() >= 5 {
            self.result = Some(GameResult::Draw(DrawReason::FivefoldRepetition));
            return;
        }

        self.result = StandardChess.game_result(&self.position);
    }

    /// Counts how many times the current position has occurred.
    pub fn position_count(&self) -> usize {
        let current = self.position.zobrist_hash();
        self.history.iter().filter(|&&h| h == current).count()
    }

    /// Returns true if a draw can be claimed (threefold repetition or the
    /// fifty-move rule).
    pub fn can_claim_draw(&self) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.position_count() >= 3 || self.position.halfmove_clock() >= 100
    }

    /// Claims a draw if the conditions are met.
    pub fn claim_draw(&mut self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        if self.position_count() >= 3 {
            self.result = Some(GameResult::Draw(DrawReason::ThreefoldRepetition));
            return Ok(());
        }

        if self.position.halfmove_clock() >= 100 {
            self.result = Some(GameResult::Draw(DrawReason::FiftyMoveRule));
            return Ok(());
        }

        Err(GameError::CannotClaimDraw)
    }

    /// Ends the game as a draw by agreement.
    pub fn agree_draw(&mut self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        self.result = Some(GameResult::Draw(DrawReason::Agreement));
        Ok(())
    }

    /// Resigns the game for the side to move.
    pub fn resign(&mut self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        self.result = Some(match self.position.side_to_move() {
            chess_core::Color::White => GameResult::BlackWins,
            chess_core::Color::Black => GameResult::WhiteWins,
        });
        Ok(())
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Renders a move as SAN in the current position.
    pub fn move_to_san(&self, m: Move) -> String {
        move_to_san(&self.position, m)
    }

    /// Parses SAN against the current position.
    pub fn san_to_move(&self, san: &str) -> Result<Move, SanError> {
        san_to_move(&self.position, san)
    }
}
