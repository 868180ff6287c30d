//! Chess position representation and legal move generation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit board sets with efficient operations
//! - [`Position`] - full board state with in-place move application
//! - Staged move generation ([`movegen::GenType`]) backed by magic bitboards
//! - SAN notation parsing and generation
//! - [`Game`] - game management with history and draw tracking
//! - [`RuleSet`] - trait seam for chess variants
//!
//! # Architecture
//!
//! Every piece type/color combination is a 64-bit bitboard, one bit per
//! square, so move generation is a handful of bitwise operations plus
//! precomputed attack-table lookups. The sliding-piece tables are built
//! once on first use and shared read-only afterwards; positions themselves
//! are plain values that callers copy and mutate freely.
//!
//! # Example
//!
//! ```
//! use chess_engine::{movegen, Game, Position};
//!
//! // Using Position directly (stateless)
//! let position = Position::startpos();
//! let moves = movegen::generate_moves(&position);
//! assert_eq!(moves.len(), 20);
//!
//! // Using Game for full game management
//! let mut game = Game::new();
//! game.make_move_san("e4").unwrap();
//! game.make_move_san("e5").unwrap();
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod bitboard;
mod game;
pub mod movegen;
mod position;
pub mod rules;
pub mod san;
mod zobrist;

pub use bitboard::Bitboard;
pub use game::{Game, GameError, GameMove};
pub use movegen::{generate, generate_moves, GenType, MoveList};
pub use position::{CastleRights, Position};
pub use rules::{DrawReason, GameResult, RuleSet, StandardChess};
pub use san::{move_to_san, san_to_move, SanError};
