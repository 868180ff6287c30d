//! Move generation.
//!
//! Moves are produced in staged categories: captures, quiet moves, quiet
//! checks, check evasions, or everything at once, with a final legality
//! filter handling pins, king safety and en passant discovered checks.
//! Sliding attacks come from magic bitboard lookups.

pub mod attacks;
mod magics;
pub mod perft;

use crate::{Bitboard, Position};
use chess_core::{CastleSide, Color, Direction, Move, Piece, Square};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so a fixed-size array
/// avoids heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Upper bound on the number of moves any category can produce.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Move generation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenType {
    /// Captures and queen promotions.
    Captures,
    /// Non-captures and under-promotions.
    Quiets,
    /// Quiet moves that give direct or discovered check.
    QuietChecks,
    /// Moves that get out of check. Only meaningful while in check.
    Evasions,
    /// Captures and quiets together; the not-in-check superset.
    NonEvasions,
    /// The fully filtered legal move set.
    Legal,
}

/// Generates the moves of the given category for the position.
///
/// `Captures`, `Quiets`, `QuietChecks` and `NonEvasions` expect the side to
/// move not to be in check; `Evasions` expects it to be in check. `Legal`
/// dispatches on the check state and applies the legality filter.
pub fn generate(position: &Position, gen: GenType) -> MoveList {
    let mut moves = MoveList::new();
    let us = position.side_to_move();

    match gen {
        GenType::Captures | GenType::Quiets | GenType::NonEvasions => {
            debug_assert!(!position.in_check());
            let target = match gen {
                GenType::Captures => position.all_pieces(us.opposite()),
                GenType::Quiets => position.empty_squares(),
                _ => !position.all_pieces(us),
            };
            generate_all(position, us, gen, target, &mut moves);
        }
        GenType::QuietChecks => {
            debug_assert!(!position.in_check());
            generate_discovered_checks(position, us, &mut moves);
            generate_all(position, us, gen, position.empty_squares(), &mut moves);
        }
        GenType::Evasions => {
            debug_assert!(position.in_check());
            generate_evasions(position, &mut moves);
        }
        GenType::Legal => return generate_moves(position),
    }

    moves
}

/// Generates all legal moves for the position.
pub fn generate_moves(position: &Position) -> MoveList {
    let us = position.side_to_move();
    let pinned = position.king_blockers(us) & position.all_pieces(us);
    let ksq = position.king_square(us);

    let mut moves = if position.in_check() {
        let mut list = MoveList::new();
        generate_evasions(position, &mut list);
        list
    } else {
        generate(position, GenType::NonEvasions)
    };

    // Only three kinds of pseudo-legal moves can be illegal: moves of pinned
    // pieces, king steps into attacked squares, and en passant captures that
    // uncover a slider. Castling was verified when it was generated.
    moves.retain(|m| match *m {
        Move::Castling { .. } => true,
        Move::EnPassant { .. } => is_legal(position, *m),
        _ => {
            if pinned.is_not_empty() || m.from_square() == ksq {
                is_legal(position, *m)
            } else {
                true
            }
        }
    });

    moves
}

/// Tests a single pseudo-legal move for legality.
fn is_legal(position: &Position, m: Move) -> bool {
    let us = position.side_to_move();
    let them = us.opposite();
    let Some(ksq) = position.king_square(us) else {
        return true;
    };

    if let Move::EnPassant { from, to } = m {
        // Rebuild the occupancy with both pawns gone and look for an
        // uncovered slider aiming at the king
        let cap_idx = to.index() as i8 - us.forward().offset();
        // SAFETY: en passant destinations are on ranks 3 and 6
        let cap_sq = unsafe { Square::from_index_unchecked(cap_idx as u8) };
        let occupied = (position.occupied()
            ^ Bitboard::from_square(from)
            ^ Bitboard::from_square(cap_sq))
            | Bitboard::from_square(to);

        let rooks_or_queens =
            position.pieces(them, Piece::Queen) | position.pieces(them, Piece::Rook);
        let bishops_or_queens =
            position.pieces(them, Piece::Queen) | position.pieces(them, Piece::Bishop);

        return (attacks::rook_attacks(ksq, occupied) & rooks_or_queens).is_empty()
            && (attacks::bishop_attacks(ksq, occupied) & bishops_or_queens).is_empty();
    }

    let (from, to) = match (m.from_square(), m.to_square()) {
        (Some(from), Some(to)) => (from, to),
        _ => return true,
    };

    if from == ksq {
        return !position.is_square_attacked_by(them, to);
    }

    // A non-king move is legal iff the piece is not pinned or it stays on
    // the line through its king
    (position.king_blockers(us) & Bitboard::from_square(from)).is_empty()
        || attacks::line(from, to).contains(ksq)
}

/// Generates the moves of every piece for one category and target mask.
fn generate_all(
    position: &Position,
    us: Color,
    gen: GenType,
    target: Bitboard,
    moves: &mut MoveList,
) {
    generate_pawn_moves(position, us, gen, target, moves);
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        generate_piece_moves(position, us, piece, gen, target, moves);
    }

    // King moves and castling; quiet king checks are the discovered-check
    // generator's business and evasion king moves have their own routine
    if !matches!(gen, GenType::QuietChecks | GenType::Evasions) {
        let Some(ksq) = position.king_square(us) else {
            return;
        };
        for to in position.possible_moves(Piece::King, us, ksq) & target {
            moves.push(Move::normal(ksq, to));
        }

        if !matches!(gen, GenType::Captures) {
            if position.can_castle_queenside(us) {
                moves.push(Move::castling(CastleSide::Queen));
            }
            if position.can_castle_kingside(us) {
                moves.push(Move::castling(CastleSide::King));
            }
        }
    }
}

/// Generates knight, bishop, rook or queen moves into the target mask.
fn generate_piece_moves(
    position: &Position,
    us: Color,
    piece: Piece,
    gen: GenType,
    target: Bitboard,
    moves: &mut MoveList,
) {
    debug_assert!(!matches!(piece, Piece::Pawn | Piece::King));

    let check_mask = if gen == GenType::QuietChecks {
        position.check_squares(us, piece)
    } else {
        Bitboard::FULL
    };

    for from in position.pieces(us, piece) {
        for to in position.possible_moves(piece, us, from) & target & check_mask {
            moves.push(Move::normal(from, to));
        }
    }
}

/// Generates quiet moves by pieces that shield the enemy king: stepping off
/// the shared line uncovers a check. Pawn blockers are handled by the pawn
/// routine.
fn generate_discovered_checks(position: &Position, us: Color, moves: &mut MoveList) {
    let them = us.opposite();
    let candidates = position.king_blockers(them) & position.all_pieces(us);

    for from in candidates {
        let Some((piece, _)) = position.piece_at(from) else {
            continue;
        };
        if piece == Piece::Pawn {
            continue;
        }

        let mut b = position.possible_moves(piece, us, from) & position.empty_squares();

        // A blocking king must step clear of every line through the enemy
        // king; other pieces leave their line with any move
        if piece == Piece::King {
            if let Some(enemy_ksq) = position.king_square(them) {
                b &= !attacks::queen_attacks(enemy_ksq, Bitboard::EMPTY);
            }
        }

        for to in b {
            moves.push(Move::normal(from, to));
        }
    }
}

/// Emits the promotion moves appropriate to the category for a pawn landing
/// on `to`, having moved along `d`.
fn make_promotions(
    position: &Position,
    us: Color,
    gen: GenType,
    to: Square,
    d: Direction,
    moves: &mut MoveList,
) {
    let from_idx = to.index() as i8 - d.offset();
    // SAFETY: stepping back from a promotion square lands on rank 2 or 7
    let from = unsafe { Square::from_index_unchecked(from_idx as u8) };

    match gen {
        GenType::Captures => moves.push(Move::promotion(from, to, Piece::Queen)),
        GenType::Evasions | GenType::NonEvasions => {
            for promoted in Piece::PROMOTION_TARGETS {
                moves.push(Move::promotion(from, to, promoted));
            }
        }
        GenType::Quiets => {
            moves.push(Move::promotion(from, to, Piece::Rook));
            moves.push(Move::promotion(from, to, Piece::Bishop));
            moves.push(Move::promotion(from, to, Piece::Knight));
        }
        GenType::QuietChecks => {
            // Only a knight under-promotion can be a quiet check that the
            // capture generator has not already produced
            if let Some(ksq) = position.king_square(us.opposite()) {
                if attacks::knight_attacks(to).contains(ksq) {
                    moves.push(Move::promotion(from, to, Piece::Knight));
                }
            }
        }
        GenType::Legal => unreachable!("legal generation never reaches the pawn routine"),
    }
}

/// The dedicated pawn routine: pushes, captures, promotions and en passant.
fn generate_pawn_moves(
    position: &Position,
    us: Color,
    gen: GenType,
    target: Bitboard,
    moves: &mut MoveList,
) {
    let them = us.opposite();
    let (rank7, rank3, up, up_right, up_left) = match us {
        Color::White => (
            Bitboard::RANK_7,
            Bitboard::RANK_3,
            Direction::North,
            Direction::NorthEast,
            Direction::NorthWest,
        ),
        Color::Black => (
            Bitboard::RANK_2,
            Bitboard::RANK_6,
            Direction::South,
            Direction::SouthWest,
            Direction::SouthEast,
        ),
    };

    let pawns = position.pieces(us, Piece::Pawn);
    let pawns_on_7 = pawns & rank7;
    let pawns_not_on_7 = pawns & !rank7;

    let enemies = match gen {
        GenType::Evasions => position.all_pieces(them) & target,
        GenType::Captures => target,
        _ => position.all_pieces(them),
    };

    let empty = match gen {
        GenType::Quiets | GenType::QuietChecks => target,
        _ => position.empty_squares(),
    };

    // Single and double pushes
    if gen != GenType::Captures {
        let mut single = pawns_not_on_7.shift(up) & empty;
        let mut double = (single & rank3).shift(up) & empty;

        if gen == GenType::Evasions {
            // Only pushes that block the check
            single &= target;
            double &= target;
        }

        if gen == GenType::QuietChecks {
            match position.king_square(them) {
                Some(ksq) => {
                    let direct = position.possible_moves(Piece::Pawn, them, ksq);
                    let mut checking_single = single & direct;
                    let mut checking_double = double & direct;

                    // Pushes by pawns shielding the enemy king give
                    // discovered check, except along the king's own file
                    // where the pawn keeps blocking
                    let dc_candidates = position.king_blockers(them) & pawns_not_on_7;
                    if dc_candidates.is_not_empty() {
                        let king_file = Bitboard::file_bb(ksq.file());
                        let dc1 = dc_candidates.shift(up) & empty & !king_file;
                        let dc2 = (dc1 & rank3).shift(up) & empty;
                        checking_single |= dc1;
                        checking_double |= dc2;
                    }

                    single = checking_single;
                    double = checking_double;
                }
                None => {
                    single = Bitboard::EMPTY;
                    double = Bitboard::EMPTY;
                }
            }
        }

        for to in single {
            let from_idx = to.index() as i8 - up.offset();
            // SAFETY: stepping back from a push destination stays on board
            let from = unsafe { Square::from_index_unchecked(from_idx as u8) };
            moves.push(Move::normal(from, to));
        }

        for to in double {
            let from_idx = to.index() as i8 - 2 * up.offset();
            // SAFETY: double pushes originate on rank 2 or 7
            let from = unsafe { Square::from_index_unchecked(from_idx as u8) };
            moves.push(Move::normal(from, to));
        }
    }

    // Promotions, with and without capture
    if pawns_on_7.is_not_empty() {
        let mut promo_empty = empty;
        if gen == GenType::Evasions {
            promo_empty &= target;
        }

        let right_caps = pawns_on_7.shift(up_right) & enemies;
        let left_caps = pawns_on_7.shift(up_left) & enemies;
        let pushes = pawns_on_7.shift(up) & promo_empty;

        for to in right_caps {
            make_promotions(position, us, gen, to, up_right, moves);
        }
        for to in left_caps {
            make_promotions(position, us, gen, to, up_left, moves);
        }
        for to in pushes {
            make_promotions(position, us, gen, to, up, moves);
        }
    }

    // Ordinary captures and en passant
    if matches!(
        gen,
        GenType::Captures | GenType::Evasions | GenType::NonEvasions
    ) {
        let right_caps = pawns_not_on_7.shift(up_right) & enemies;
        let left_caps = pawns_not_on_7.shift(up_left) & enemies;

        for to in right_caps {
            let from_idx = to.index() as i8 - up_right.offset();
            // SAFETY: stepping back from a capture destination stays on board
            let from = unsafe { Square::from_index_unchecked(from_idx as u8) };
            moves.push(Move::normal(from, to));
        }
        for to in left_caps {
            let from_idx = to.index() as i8 - up_left.offset();
            // SAFETY: stepping back from a capture destination stays on board
            let from = unsafe { Square::from_index_unchecked(from_idx as u8) };
            moves.push(Move::normal(from, to));
        }

        if let Some(ep) = position.en_passant_square() {
            let pawn_idx = ep.index() as i8 - up.offset();
            // SAFETY: en passant destinations are on ranks 3 and 6
            let pawn_sq = unsafe { Square::from_index_unchecked(pawn_idx as u8) };

            // An en passant capture evades check only when the checker is
            // the double-pushed pawn itself
            if gen == GenType::Evasions && !target.contains(pawn_sq) {
                return;
            }

            let capturers = pawns_not_on_7 & attacks::pawn_attacks(ep, them);
            for from in capturers {
                moves.push(Move::en_passant(from, ep));
            }
        }
    }
}

/// Generates evasions: king steps off the checking lines, plus blocks and
/// captures of a lone checker.
fn generate_evasions(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move();
    let Some(ksq) = position.king_square(us) else {
        return;
    };

    let checkers = position.checkers();

    // Squares covered by slider checkers, extended through the king, so the
    // king cannot slide along the attacking ray
    let mut slider_rays = Bitboard::EMPTY;
    let sliders = checkers
        & !position.pieces_of_type(Piece::Pawn)
        & !position.pieces_of_type(Piece::Knight);
    for checksq in sliders {
        slider_rays |= attacks::line(checksq, ksq) ^ Bitboard::from_square(checksq);
    }

    for to in position.possible_moves(Piece::King, us, ksq) & !slider_rays {
        moves.push(Move::normal(ksq, to));
    }

    // With two checkers only the king can move
    if checkers.more_than_one() {
        return;
    }

    let Some(checksq) = checkers.lsb() else {
        return;
    };
    let target = attacks::between(checksq, ksq) | Bitboard::from_square(checksq);
    generate_all(position, us, GenType::Evasions, target, moves);
}
