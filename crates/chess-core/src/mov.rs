//! Move representation.

use crate::{Color, Piece, Square};

/// The two castling wings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

/// A chess move, tagged by kind.
///
/// A normal or promotion move stores no captured piece; the capture, if any,
/// is recovered from the position when the move is applied. The castling
/// variant carries only the wing: king and rook squares follow from the side
/// to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// A plain move or capture.
    Normal { from: Square, to: Square },
    /// A pawn reaching its last rank, replaced by `promoted`.
    Promotion {
        from: Square,
        to: Square,
        promoted: Piece,
    },
    /// A pawn capturing en passant; `to` is the skipped square.
    EnPassant { from: Square, to: Square },
    /// Castling on the given wing.
    Castling { side: CastleSide },
}

impl Move {
    /// Placeholder value used to fill fixed-size move lists. Not a legal move.
    pub const NULL: Move = Move::Normal {
        from: Square::A1,
        to: Square::A1,
    };

    /// Creates a normal move.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Move::Normal { from, to }
    }

    /// Creates a promotion move.
    #[inline]
    pub const fn promotion(from: Square, to: Square, promoted: Piece) -> Self {
        Move::Promotion {
            from,
            to,
            promoted,
        }
    }

    /// Creates an en passant capture.
    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::EnPassant { from, to }
    }

    /// Creates a castling move.
    #[inline]
    pub const fn castling(side: CastleSide) -> Self {
        Move::Castling { side }
    }

    /// Returns true if this is a promotion move.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self, Move::Promotion { .. })
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, Move::Castling { .. })
    }

    /// Returns true if this is an en passant capture.
    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self, Move::EnPassant { .. })
    }

    /// Returns the source square, or `None` for castling moves.
    #[inline]
    pub const fn from_square(self) -> Option<Square> {
        match self {
            Move::Normal { from, .. }
            | Move::Promotion { from, .. }
            | Move::EnPassant { from, .. } => Some(from),
            Move::Castling { .. } => None,
        }
    }

    /// Returns the destination square, or `None` for castling moves.
    #[inline]
    pub const fn to_square(self) -> Option<Square> {
        match self {
            Move::Normal { to, .. }
            | Move::Promotion { to, .. }
            | Move::EnPassant { to, .. } => Some(to),
            Move::Castling { .. } => None,
        }
    }

    /// Returns the promotion piece, or `None` for other move kinds.
    #[inline]
    pub const fn promoted_to(self) -> Option<Piece> {
        match self {
            Move::Promotion { promoted, .. } => Some(promoted),
            _ => None,
        }
    }

    /// Returns the castling wing, or `None` for other move kinds.
    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self {
            Move::Castling { side } => Some(side),
            _ => None,
        }
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    ///
    /// Castling is rendered as the king's two-square move, which requires
    /// knowing whose move it is.
    pub fn to_uci(self, side_to_move: Color) -> String {
        match self {
            Move::Normal { from, to } | Move::EnPassant { from, to } => {
                format!("{}{}", from, to)
            }
            Move::Promotion {
                from,
                to,
                promoted,
            } => {
                let p = match promoted {
                    Piece::Knight => 'n',
                    Piece::Bishop => 'b',
                    Piece::Rook => 'r',
                    _ => 'q',
                };
                format!("{}{}{}", from, to, p)
            }
            Move::Castling { side } => match (side_to_move, side) {
                (Color::White, CastleSide::King) => "e1g1".to_string(),
                (Color::White, CastleSide::Queen) => "e1c1".to_string(),
                (Color::Black, CastleSide::King) => "e8g8".to_string(),
                (Color::Black, CastleSide::Queen) => "e8c8".to_string(),
            },
        }
    }

    /// Splits a UCI move string into source, destination and promotion piece.
    ///
    /// The move kind (castling, en passant, double push) cannot be decided
    /// from the string alone; callers resolve it against the legal moves of
    /// a position.
    pub fn parse_uci(s: &str) -> Option<(Square, Square, Option<Piece>)> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promoted = if s.len() == 5 {
            match s.as_bytes()[4].to_ascii_lowercase() {
                b'n' => Some(Piece::Knight),
                b'b' => Some(Piece::Bishop),
                b'r' => Some(Piece::Rook),
                b'q' => Some(Piece::Queen),
                _ => return None,
            }
        } else {
            None
        };
        Some((from, to, promoted))
    }
}
