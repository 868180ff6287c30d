//! Core types for chess.
//!
//! This crate provides the fundamental types shared by the engine:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], [`Rank`] and [`Direction`] for board geometry
//! - [`Move`] and [`CastleSide`] for move representation
//! - FEN field parsing and validation

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{CastleSide, Move};
pub use piece::Piece;
pub use square::{Direction, File, Rank, Square};
