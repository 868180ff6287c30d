//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"
//!
//! Parsing is deliberately tolerant: check and mate suffixes, an "e.p."
//! marker, the "0-0" castling digits and promotions without "=" are all
//! accepted. Resolution happens against the legal move list, so a parsed
//! string either names exactly one legal move or fails.

use crate::movegen::generate_moves;
use crate::Position;
use chess_core::{CastleSide, File, Move, Piece, Rank, Square};
use std::fmt;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// The SAN string is empty.
    Empty,
    /// The SAN string could not be parsed.
    InvalidNotation(String),
    /// No legal move matches the SAN.
    NoMatchingMove(String),
    /// More than one legal move matches the SAN.
    Ambiguous(String),
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "empty SAN string"),
            SanError::InvalidNotation(s) => write!(f, "invalid SAN notation: {}", s),
            SanError::NoMatchingMove(s) => write!(f, "no legal move matches: {}", s),
            SanError::Ambiguous(s) => write!(f, "ambiguous move: {}", s),
        }
    }
}

impl std::error::Error for SanError {}

/// Parsed components of a SAN string: an intentionally loose descriptor
/// that is matched against the legal move list.
#[derive(Debug)]
struct SanDescriptor {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to_square: Square,
    promotion: Option<Piece>,
    castle: Option<CastleSide>,
}

/// Converts a move to SAN notation given the current position.
///
/// The position must be the state before the move is made and the move must
/// be legal in it.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let san = match m {
        Move::Castling { side: CastleSide::King } => "O-O".to_string(),
        Move::Castling { side: CastleSide::Queen } => "O-O-O".to_string(),
        Move::Normal { from, to }
        | Move::Promotion { from, to, .. }
        | Move::EnPassant { from, to } => {
            let (piece, _) = position
                .piece_at(from)
                .expect("SAN for a move with an empty source square");

            let mut san = String::new();
            if piece != Piece::Pawn {
                san.push(piece_char(piece));
                san.push_str(&disambiguation(position, piece, from, to));
            }

            let is_capture = position.piece_at(to).is_some() || m.is_en_passant();
            if is_capture {
                if piece == Piece::Pawn {
                    san.push(from.file().to_char());
                }
                san.push('x');
            }

            san.push(to.file().to_char());
            san.push(to.rank().to_char());

            if let Move::Promotion { promoted, .. } = m {
                san.push('=');
                san.push(piece_char(promoted));
            }

            san
        }
    };

    add_check_suffix(position, m, san)
}

/// Parses a SAN string and returns the matching legal move.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let descriptor = parse_descriptor(san)?;
    resolve(position, &descriptor, san)
}

fn parse_descriptor(san: &str) -> Result<SanDescriptor, SanError> {
    let trimmed = san.trim();
    if trimmed.is_empty() {
        return Err(SanError::Empty);
    }

    // Peel the decorations: check/mate marks and the optional e.p. tag
    let mut body = trimmed.trim_end_matches(|c| c == '+' || c == '#');
    if let Some(stripped) = body.strip_suffix("e.p.") {
        body = stripped.trim_end();
    }
    let body = body.trim_end_matches(|c| c == '+' || c == '#');

    if body == "O-O-O" || body == "0-0-0" {
        return Ok(SanDescriptor {
            piece: Piece::King,
            from_file: None,
            from_rank: None,
            to_square: Square::A1,
            promotion: None,
            castle: Some(CastleSide::Queen),
        });
    }
    if body == "O-O" || body == "0-0" {
        return Ok(SanDescriptor {
            piece: Piece::King,
            from_file: None,
            from_rank: None,
            to_square: Square::A1,
            promotion: None,
            castle: Some(CastleSide::King),
        });
    }

    let chars: Vec<char> = body.chars().collect();
    if chars.is_empty() {
        return Err(SanError::InvalidNotation(trimmed.to_string()));
    }
    let mut idx = 0;

    let piece = match chars[0] {
        'K' => Piece::King,
        'Q' => Piece::Queen,
        'R' => Piece::Rook,
        'B' => Piece::Bishop,
        'N' => Piece::Knight,
        _ => Piece::Pawn,
    };
    if piece != Piece::Pawn {
        idx += 1;
    }

    let remaining: String = chars[idx..].iter().collect();

    let (remaining, _is_capture) = if remaining.contains('x') {
        (remaining.replace('x', ""), true)
    } else {
        (remaining, false)
    };

    // Promotion, written "=Q" or with a bare trailing piece letter
    let (remaining, promotion) = if let Some(eq) = remaining.find('=') {
        let promo_str = &remaining[eq + 1..];
        let mut promo_chars = promo_str.chars();
        let promo = promo_chars
            .next()
            .and_then(promotion_piece)
            .filter(|_| promo_chars.next().is_none())
            .ok_or_else(|| SanError::InvalidNotation(san.trim().to_string()))?;
        (remaining[..eq].to_string(), Some(promo))
    } else if piece == Piece::Pawn && remaining.len() >= 3 {
        match remaining.chars().last().and_then(|c| match c {
            'Q' | 'R' | 'B' | 'N' => promotion_piece(c),
            _ => None,
        }) {
            Some(promo) => (remaining[..remaining.len() - 1].to_string(), Some(promo)),
            None => (remaining, None),
        }
    } else {
        (remaining, None)
    };

    let chars: Vec<char> = remaining.chars().collect();
    if chars.len() < 2 {
        return Err(SanError::InvalidNotation(san.trim().to_string()));
    }

    let to_file = File::from_char(chars[chars.len() - 2])
        .filter(|_| chars[chars.len() - 2].is_ascii_lowercase())
        .ok_or_else(|| SanError::InvalidNotation(san.trim().to_string()))?;
    let to_rank = Rank::from_char(chars[chars.len() - 1])
        .ok_or_else(|| SanError::InvalidNotation(san.trim().to_string()))?;
    let to_square = Square::new(to_file, to_rank);

    let (from_file, from_rank) = parse_disambiguation(&chars[..chars.len() - 2], san)?;

    Ok(SanDescriptor {
        piece,
        from_file,
        from_rank,
        to_square,
        promotion,
        castle: None,
    })
}

fn parse_disambiguation(
    chars: &[char],
    san: &str,
) -> Result<(Option<File>, Option<Rank>), SanError> {
    match chars.len() {
        0 => Ok((None, None)),
        1 => {
            if chars[0].is_ascii_lowercase() {
                let file = File::from_char(chars[0])
                    .ok_or_else(|| SanError::InvalidNotation(san.trim().to_string()))?;
                Ok((Some(file), None))
            } else if let Some(rank) = Rank::from_char(chars[0]) {
                Ok((None, Some(rank)))
            } else {
                Err(SanError::InvalidNotation(san.trim().to_string()))
            }
        }
        2 => {
            let file = chars[0]
                .is_ascii_lowercase()
                .then(|| File::from_char(chars[0]))
                .flatten()
                .ok_or_else(|| SanError::InvalidNotation(san.trim().to_string()))?;
            let rank = Rank::from_char(chars[1])
                .ok_or_else(|| SanError::InvalidNotation(san.trim().to_string()))?;
            Ok((Some(file), Some(rank)))
        }
        _ => Err(SanError::InvalidNotation(san.trim().to_string())),
    }
}

fn resolve(position: &Position, descriptor: &SanDescriptor, san: &str) -> Result<Move, SanError> {
    let moves = generate_moves(position);

    if let Some(side) = descriptor.castle {
        return moves
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.castle_side() == Some(side))
            .ok_or_else(|| SanError::NoMatchingMove(san.trim().to_string()));
    }

    let mut matching: Vec<Move> = Vec::new();

    for m in &moves {
        let (Some(from), Some(to)) = (m.from_square(), m.to_square()) else {
            continue;
        };
        if to != descriptor.to_square {
            continue;
        }

        match position.piece_at(from) {
            Some((piece, _)) if piece == descriptor.piece => {}
            _ => continue,
        }

        if let Some(file) = descriptor.from_file {
            if from.file() != file {
                continue;
            }
        }
        if let Some(rank) = descriptor.from_rank {
            if from.rank() != rank {
                continue;
            }
        }

        // A promotion must be spelled out; a spelled-out promotion must
        // match the move
        if m.promoted_to() != descriptor.promotion {
            continue;
        }

        matching.push(*m);
    }

    match matching.len() {
        0 => Err(SanError::NoMatchingMove(san.trim().to_string())),
        1 => Ok(matching[0]),
        _ => Err(SanError::Ambiguous(san.trim().to_string())),
    }
}

/// Minimal disambiguation: nothing if the mover is unique, else the source
/// file when it settles the matter, else the source rank, else both.
fn disambiguation(position: &Position, piece: Piece, from: Square, to: Square) -> String {
    let moves = generate_moves(position);

    let mut same_dest: Vec<Square> = Vec::new();
    for other in &moves {
        let (Some(other_from), Some(other_to)) = (other.from_square(), other.to_square()) else {
            continue;
        };
        if other_to != to {
            continue;
        }
        if let Some((p, _)) = position.piece_at(other_from) {
            if p == piece && !same_dest.contains(&other_from) {
                same_dest.push(other_from);
            }
        }
    }

    if same_dest.len() <= 1 {
        return String::new();
    }

    let same_file = same_dest.iter().filter(|s| s.file() == from.file()).count();
    if same_file == 1 {
        return from.file().to_char().to_string();
    }

    let same_rank = same_dest.iter().filter(|s| s.rank() == from.rank()).count();
    if same_rank == 1 {
        return from.rank().to_char().to_string();
    }

    format!("{}{}", from.file().to_char(), from.rank().to_char())
}

fn add_check_suffix(position: &Position, m: Move, mut san: String) -> String {
    let mut next = position.clone();
    next.apply(m);
    if next.in_check() {
        if generate_moves(&next).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}

fn piece_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

fn promotion_piece(c: char) -> Option<Piece> {
    match c.to_ascii_uppercase() {
        'Q' => Some(Piece::Queen),
        'R' => Some(Piece::Rook),
        'B' => Some(Piece::Bishop),
        'N' => Some(Piece::Knight),
        _ => None,
    }
}
