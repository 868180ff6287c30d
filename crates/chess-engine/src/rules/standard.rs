//! Standard chess rules (FIDE).

use super::{DrawReason, GameResult, RuleSet};
use crate::movegen::generate_moves;
use crate::{Bitboard, MoveList, Position};
use chess_core::{Color, Move, Piece};

/// The default rule set: standard piece movement, castling, en passant,
/// promotion, and the usual game-over judgments.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn generate_moves(&self, position: &Position) -> MoveList {
        generate_moves(position)
    }

    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.generate_moves(position).as_slice().contains(&m)
    }

    fn make_move(&self, position: &Position, m: Move) -> Position {
        let mut next = position.clone();
        next.apply(m);
        next
    }

    fn is_check(&self, position: &Position) -> bool {
        position.in_check()
    }

    fn game_result(&self, position: &Position) -> Option<GameResult> {
        if position.halfmove_clock() >= 150 {
            return Some(GameResult::Draw(DrawReason::SeventyFiveMoveRule));
        }

        if self.is_insufficient_material(position) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }

        let moves = self.generate_moves(position);
        if moves.is_empty() {
            if self.is_check(position) {
                return Some(match position.side_to_move() {
                    Color::White => GameResult::BlackWins,
                    Color::Black => GameResult::WhiteWins,
                });
            } else {
                return Some(GameResult::Draw(DrawReason::Stalemate));
            }
        }

        None
    }

    /// The narrow reading: K vs K, a lone minor piece, or same-colored
    /// lone bishops. Anything else is treated as mating material.
    fn is_insufficient_material(&self, position: &Position) -> bool {
        let majors_or_pawns = position.pieces_of_type(Piece::Pawn)
            | position.pieces_of_type(Piece::Rook)
            | position.pieces_of_type(Piece::Queen);
        if majors_or_pawns.is_not_empty() {
            return false;
        }

        let white_knights = position.pieces(Color::White, Piece::Knight).count();
        let black_knights = position.pieces(Color::Black, Piece::Knight).count();
        let white_bishops = position.pieces(Color::White, Piece::Bishop);
        let black_bishops = position.pieces(Color::Black, Piece::Bishop);
        let bishops = white_bishops.count() + black_bishops.count();
        let knights = white_knights + black_knights;

        // K vs K, or a single minor piece on the whole board
        if knights + bishops <= 1 {
            return true;
        }

        // Lone bishops on the same square color cannot force mate
        if knights == 0 && white_bishops.count() == 1 && black_bishops.count() == 1 {
            let white_on_light = (white_bishops & Bitboard::LIGHT_SQUARES).is_not_empty();
            let black_on_light = (black_bishops & Bitboard::LIGHT_SQUARES).is_not_empty();
            if white_on_light == black_on_light {
                return true;
            }
        }

        false
    }
}
