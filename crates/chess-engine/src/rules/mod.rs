//! Rule set abstraction.
//!
//! The [`RuleSet`] trait is the seam for chess variants: the engine core is
//! variant-agnostic and delegates game-level judgments here. Only standard
//! chess is implemented; the seam exists so a future variant does not have
//! to rewrite the callers.

mod standard;

pub use standard::StandardChess;

use crate::{MoveList, Position};
use chess_core::Move;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins (checkmate or resignation).
    WhiteWins,
    /// Black wins (checkmate or resignation).
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    /// Neither side can ever deliver checkmate.
    InsufficientMaterial,
    /// 100 halfmoves without pawn move or capture; claimable.
    FiftyMoveRule,
    /// 150 halfmoves without pawn move or capture; automatic.
    SeventyFiveMoveRule,
    /// Position repeated three times; claimable.
    ThreefoldRepetition,
    /// Position repeated five times; automatic.
    FivefoldRepetition,
    /// Draw by agreement.
    Agreement,
}

/// Trait implemented by a chess variant.
pub trait RuleSet {
    /// Returns the initial position for this variant.
    fn initial_position(&self) -> Position;

    /// Generates all legal moves for the given position.
    fn generate_moves(&self, position: &Position) -> MoveList;

    /// Returns true if the given move is legal in the position.
    fn is_legal(&self, position: &Position, m: Move) -> bool;

    /// Plays a move on a copy of the position and returns the result.
    ///
    /// The move must be legal; use [`is_legal`](RuleSet::is_legal) or
    /// [`try_make_move`](RuleSet::try_make_move) when unsure.
    fn make_move(&self, position: &Position, m: Move) -> Position;

    /// Attempts to play a move, returning `None` if it is illegal.
    fn try_make_move(&self, position: &Position, m: Move) -> Option<Position> {
        if self.is_legal(position, m) {
            Some(self.make_move(position, m))
        } else {
            None
        }
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, position: &Position) -> bool;

    /// Returns the game result if the game is over, otherwise `None`.
    ///
    /// Only conditions visible in a single position are judged here
    /// (checkmate, stalemate, 75-move rule, insufficient material).
    /// Repetition draws need history and live in [`Game`](crate::Game).
    fn game_result(&self, position: &Position) -> Option<GameResult>;

    /// Returns true if the game is over.
    fn is_game_over(&self, position: &Position) -> bool {
        self.game_result(position).is_some()
    }

    /// Returns true if neither side has mating material.
    fn is_insufficient_material(&self, position: &Position) -> bool;
}
