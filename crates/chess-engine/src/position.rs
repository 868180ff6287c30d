//! Chess position representation.

use crate::movegen::attacks;
use crate::Bitboard;
use chess_core::{CastleSide, Color, FenError, FenParser, Move, Piece, Square};

/// Per-color castling rights, a bit flag over the two wings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const KING_SIDE: CastleRights = CastleRights(0b01);
    pub const QUEEN_SIDE: CastleRights = CastleRights(0b10);
    pub const BOTH: CastleRights = CastleRights(0b11);

    const fn bit(side: CastleSide) -> u8 {
        match side {
            CastleSide::King => Self::KING_SIDE.0,
            CastleSide::Queen => Self::QUEEN_SIDE.0,
        }
    }

    /// Returns true if the right for the given wing is present.
    #[inline]
    pub const fn has(self, side: CastleSide) -> bool {
        self.0 & Self::bit(side) != 0
    }

    /// Returns true if no rights are present.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Grants the right for the given wing.
    #[inline]
    pub fn add(&mut self, side: CastleSide) {
        self.0 |= Self::bit(side);
    }

    /// Revokes the right for the given wing.
    #[inline]
    pub fn remove(&mut self, side: CastleSide) {
        self.0 &= !Self::bit(side);
    }
}

/// Complete chess position state.
///
/// A `Position` is a plain value: copy it before [`apply`](Position::apply)
/// to keep the previous state. The piece bitboards are indexed by color and
/// piece type; the per-color occupancy and the total occupancy are kept in
/// sync by every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pieces: [[Bitboard; 6]; 2],
    all_pieces: [Bitboard; 2],
    occupied: Bitboard,
    /// At most one bit: the capturable en passant destination.
    en_passant: Bitboard,
    turn: Color,
    castling: [CastleRights; 2],
    halfmove_clock: u32,
    fullmove_number: u32,
}

/// King and rook travel squares for a castling move.
fn castle_squares(color: Color, side: CastleSide) -> (Square, Square, Square, Square) {
    match (color, side) {
        (Color::White, CastleSide::King) => (Square::E1, Square::G1, Square::H1, Square::F1),
        (Color::White, CastleSide::Queen) => (Square::E1, Square::C1, Square::A1, Square::D1),
        (Color::Black, CastleSide::King) => (Square::E8, Square::G8, Square::H8, Square::F8),
        (Color::Black, CastleSide::Queen) => (Square::E8, Square::C8, Square::A8, Square::D8),
    }
}

/// Returns the wing whose rook starts on `sq`, if any.
fn rook_home_side(color: Color, sq: Square) -> Option<CastleSide> {
    let (kingside, queenside) = match color {
        Color::White => (Square::H1, Square::A1),
        Color::Black => (Square::H8, Square::A8),
    };
    if sq == kingside {
        Some(CastleSide::King)
    } else if sq == queenside {
        Some(CastleSide::Queen)
    } else {
        None
    }
}

impl Position {
    /// Creates an empty position.
    pub fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            all_pieces: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            en_passant: Bitboard::EMPTY,
            turn: Color::White,
            castling: [CastleRights::NONE; 2],
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::empty();

        let ranks: Vec<&str> = parsed.piece_placement.split('/').collect();
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0usize;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as usize;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    // SAFETY: the parser guarantees each rank covers exactly
                    // eight files
                    let sq = unsafe { Square::from_index_unchecked((rank * 8 + file) as u8) };
                    position.pieces[color.index()][piece.index()].set(sq);
                    file += 1;
                }
            }
        }
        position.update_derived();

        position.turn = match parsed.active_color {
            'w' => Color::White,
            _ => Color::Black,
        };

        for c in parsed.castling.chars() {
            match c {
                'K' => position.castling[Color::White.index()].add(CastleSide::King),
                'Q' => position.castling[Color::White.index()].add(CastleSide::Queen),
                'k' => position.castling[Color::Black.index()].add(CastleSide::King),
                'q' => position.castling[Color::Black.index()].add(CastleSide::Queen),
                _ => {}
            }
        }

        if parsed.en_passant != "-" {
            if let Some(sq) = Square::from_algebraic(&parsed.en_passant) {
                position.en_passant = Bitboard::from_square(sq);
            }
        }

        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;

        Ok(position)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                // SAFETY: rank and file are in 0-7
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                if let Some((piece, color)) = self.piece_at(sq) {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_fen_char(color));
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.turn {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling[0].is_none() && self.castling[1].is_none() {
            fen.push('-');
        } else {
            if self.castling[Color::White.index()].has(CastleSide::King) {
                fen.push('K');
            }
            if self.castling[Color::White.index()].has(CastleSide::Queen) {
                fen.push('Q');
            }
            if self.castling[Color::Black.index()].has(CastleSide::King) {
                fen.push('k');
            }
            if self.castling[Color::Black.index()].has(CastleSide::Queen) {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant_square() {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Returns the piece and color on the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let bb = Bitboard::from_square(sq);

        let color = if (self.all_pieces[Color::White.index()] & bb).is_not_empty() {
            Color::White
        } else if (self.all_pieces[Color::Black.index()] & bb).is_not_empty() {
            Color::Black
        } else {
            return None;
        };

        for piece in Piece::ALL {
            if (self.pieces[color.index()][piece.index()] & bb).is_not_empty() {
                return Some((piece, color));
            }
        }

        None
    }

    /// Returns the pieces of the given color and type.
    #[inline]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Returns the pieces of the given type regardless of color.
    #[inline]
    pub fn pieces_of_type(&self, piece: Piece) -> Bitboard {
        self.pieces[0][piece.index()] | self.pieces[1][piece.index()]
    }

    /// Returns all pieces of the given color.
    #[inline]
    pub fn all_pieces(&self, color: Color) -> Bitboard {
        self.all_pieces[color.index()]
    }

    /// Returns all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Returns all empty squares.
    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.turn
    }

    /// Returns the en passant destination as a bitboard (at most one bit).
    #[inline]
    pub fn en_passant(&self) -> Bitboard {
        self.en_passant
    }

    /// Returns the en passant destination square, if any.
    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant.lsb()
    }

    /// Returns the castling rights of the given color.
    #[inline]
    pub fn castling(&self, color: Color) -> CastleRights {
        self.castling[color.index()]
    }

    /// Returns the halfmove clock (plies since the last pawn move or capture).
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the fullmove number (starts at 1, increments after Black).
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the king square of the given color, or `None` on a kingless
    /// board.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, Piece::King).lsb()
    }

    /// Returns the squares a piece of the given type and color placed on
    /// `from` could move to, ignoring king safety. For pawns this is the
    /// two-square attack fan only; pushes are the move generator's concern.
    pub fn possible_moves(&self, piece: Piece, color: Color, from: Square) -> Bitboard {
        match piece {
            Piece::Pawn => attacks::pawn_attacks(from, color),
            Piece::Knight => attacks::knight_attacks(from) & !self.all_pieces(color),
            Piece::King => attacks::king_attacks(from) & !self.all_pieces(color),
            Piece::Bishop => attacks::bishop_attacks(from, self.occupied) & !self.all_pieces(color),
            Piece::Rook => attacks::rook_attacks(from, self.occupied) & !self.all_pieces(color),
            Piece::Queen => attacks::queen_attacks(from, self.occupied) & !self.all_pieces(color),
        }
    }

    /// Returns true if `enemy` attacks the given square.
    ///
    /// Uses the symmetric-attack trick: a piece of type P on `square` for
    /// the defender attacks exactly the squares from which an enemy P could
    /// attack back. Pawns need the defender's color for the fan to point the
    /// right way.
    pub fn is_square_attacked_by(&self, enemy: Color, square: Square) -> bool {
        let us = enemy.opposite();

        for piece in Piece::ALL {
            let from_here = self.possible_moves(piece, us, square);
            if (from_here & self.pieces(enemy, piece)).is_not_empty() {
                return true;
            }
        }

        false
    }

    /// Returns true if the king of the given color is attacked.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(ksq) => self.is_square_attacked_by(color.opposite(), ksq),
            None => false,
        }
    }

    /// Returns true if the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.is_in_check(self.turn)
    }

    /// Returns the enemy pieces currently giving check to the side to move.
    pub fn checkers(&self) -> Bitboard {
        let us = self.turn;
        let them = us.opposite();
        let Some(ksq) = self.king_square(us) else {
            return Bitboard::EMPTY;
        };

        (self.possible_moves(Piece::Pawn, us, ksq) & self.pieces(them, Piece::Pawn))
            | (self.possible_moves(Piece::Knight, us, ksq) & self.pieces(them, Piece::Knight))
            | (self.possible_moves(Piece::Bishop, us, ksq) & self.pieces(them, Piece::Bishop))
            | (self.possible_moves(Piece::Rook, us, ksq) & self.pieces(them, Piece::Rook))
            | (self.possible_moves(Piece::Queen, us, ksq) & self.pieces(them, Piece::Queen))
    }

    /// Returns the pieces of either color shielding `color`'s king from a
    /// single enemy slider: removing such a piece would expose the king.
    pub fn king_blockers(&self, color: Color) -> Bitboard {
        let them = color.opposite();
        let Some(ksq) = self.king_square(color) else {
            return Bitboard::EMPTY;
        };

        let rooks_or_queens = self.pieces(them, Piece::Queen) | self.pieces(them, Piece::Rook);
        let bishops_or_queens = self.pieces(them, Piece::Queen) | self.pieces(them, Piece::Bishop);

        // Enemy sliders aiming at the king square through any occupancy
        let snipers = (attacks::rook_attacks(ksq, Bitboard::EMPTY) & rooks_or_queens)
            | (attacks::bishop_attacks(ksq, Bitboard::EMPTY) & bishops_or_queens);

        let occupancy = self.occupied ^ snipers;
        let mut blockers = Bitboard::EMPTY;

        for sniper in snipers {
            let b = attacks::between(ksq, sniper) & occupancy;
            if b.is_not_empty() && !b.more_than_one() {
                blockers |= b;
            }
        }

        blockers
    }

    /// Returns the squares from which a piece of the given type and color
    /// would give check to the enemy king. Empty for kings.
    pub fn check_squares(&self, color: Color, piece: Piece) -> Bitboard {
        if piece == Piece::King {
            return Bitboard::EMPTY;
        }
        match self.king_square(color.opposite()) {
            Some(ksq) => self.possible_moves(piece, color, ksq),
            None => Bitboard::EMPTY,
        }
    }

    /// Returns true if the given color may castle king-side right now:
    /// the right is present, king and rook stand on their home squares,
    /// the squares between them are empty, and neither the king's start
    /// square nor any square it crosses is attacked.
    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.can_castle(color, CastleSide::King)
    }

    /// Returns true if the given color may castle queen-side right now.
    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.can_castle(color, CastleSide::Queen)
    }

    fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        if !self.castling[color.index()].has(side) {
            return false;
        }

        let (king_from, king_to, rook_from, _) = castle_squares(color, side);
        if !self.pieces(color, Piece::King).contains(king_from)
            || !self.pieces(color, Piece::Rook).contains(rook_from)
        {
            return false;
        }

        if (self.occupied & attacks::between(king_from, rook_from)).is_not_empty() {
            return false;
        }

        let them = color.opposite();
        let king_walk =
            attacks::between(king_from, king_to) | Bitboard::from_square(king_from) | Bitboard::from_square(king_to);
        for sq in king_walk {
            if self.is_square_attacked_by(them, sq) {
                return false;
            }
        }

        true
    }

    /// Plays a move on this position in place.
    ///
    /// The move must have been produced by the legal move generator for this
    /// position (or validated equivalently by the caller). A move that names
    /// an empty source square leaves the piece placement untouched.
    pub fn apply(&mut self, m: Move) {
        let us = self.turn;
        let them = us.opposite();

        self.en_passant = Bitboard::EMPTY;
        let mut resets_clock = false;

        match m {
            Move::Castling { side } => {
                let (king_from, king_to, rook_from, rook_to) = castle_squares(us, side);
                self.remove_piece(Piece::King, us, king_from);
                self.remove_piece(Piece::Rook, us, rook_from);
                self.add_piece(Piece::King, us, king_to);
                self.add_piece(Piece::Rook, us, rook_to);
                self.castling[us.index()] = CastleRights::NONE;
            }
            Move::Normal { from, to }
            | Move::Promotion { from, to, .. }
            | Move::EnPassant { from, to } => {
                let Some((piece, color)) = self.piece_at(from) else {
                    debug_assert!(false, "no piece to move on {}", from);
                    return;
                };
                debug_assert_eq!(color, us, "moving an enemy piece from {}", from);

                if m.is_en_passant() {
                    // The captured pawn sits one step behind the landing
                    // square relative to the mover
                    let cap_idx = to.index() as i8 - us.forward().offset();
                    // SAFETY: en passant destinations are on ranks 3 and 6
                    let cap_sq = unsafe { Square::from_index_unchecked(cap_idx as u8) };
                    self.remove_piece(Piece::Pawn, them, cap_sq);
                    resets_clock = true;
                } else if let Some((captured, captured_color)) = self.piece_at(to) {
                    debug_assert_eq!(captured_color, them, "capturing an own piece on {}", to);
                    self.remove_piece(captured, them, to);
                    resets_clock = true;
                    if captured == Piece::Rook {
                        if let Some(side) = rook_home_side(them, to) {
                            self.castling[them.index()].remove(side);
                        }
                    }
                }

                self.remove_piece(piece, us, from);
                match m {
                    Move::Promotion { promoted, .. } => self.add_piece(promoted, us, to),
                    _ => self.add_piece(piece, us, to),
                }

                match piece {
                    Piece::King => self.castling[us.index()] = CastleRights::NONE,
                    Piece::Rook => {
                        if let Some(side) = rook_home_side(us, from) {
                            self.castling[us.index()].remove(side);
                        }
                    }
                    Piece::Pawn => {
                        resets_clock = true;
                        if (to.index() as i8 - from.index() as i8).abs() == 16 {
                            // Record the skipped square only when an enemy
                            // pawn stands ready to capture it
                            let to_bb = Bitboard::from_square(to);
                            let adjacent = to_bb.east() | to_bb.west();
                            if (adjacent & self.pieces(them, Piece::Pawn)).is_not_empty() {
                                let ep_idx = from.index() as i8 + us.forward().offset();
                                // SAFETY: the skipped square of a double push
                                // is on rank 3 or 6
                                let ep_sq = unsafe { Square::from_index_unchecked(ep_idx as u8) };
                                self.en_passant = Bitboard::from_square(ep_sq);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }
        if resets_clock {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.turn = them;
    }

    fn add_piece(&mut self, piece: Piece, color: Color, sq: Square) {
        self.pieces[color.index()][piece.index()].set(sq);
        self.all_pieces[color.index()].set(sq);
        self.occupied.set(sq);
    }

    fn remove_piece(&mut self, piece: Piece, color: Color, sq: Square) {
        self.pieces[color.index()][piece.index()].clear(sq);
        self.all_pieces[color.index()].clear(sq);
        self.occupied.clear(sq);
    }

    fn update_derived(&mut self) {
        for color in [Color::White, Color::Black] {
            let mut all = Bitboard::EMPTY;
            for piece in Piece::ALL {
                all |= self.pieces[color.index()][piece.index()];
            }
            self.all_pieces[color.index()] = all;
        }
        self.occupied = self.all_pieces[0] | self.all_pieces[1];
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    fn sq(file: File, rank: Rank) -> Square {
        Square::new(file, rank)
    }

    #[test]
    fn startpos_fen_roundtrip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn custom_fen_roundtrip() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn four_field_fen_defaults_clocks() {
        let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap();
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn derived_bitboards_are_consistent() {
        let pos =
            Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        assert_eq!(
            pos.occupied(),
            pos.all_pieces(Color::White) | pos.all_pieces(Color::Black)
        );
        let mut union = Bitboard::EMPTY;
        for piece in Piece::ALL {
            union |= pos.pieces(Color::White, piece);
        }
        assert_eq!(union, pos.all_pieces(Color::White));
    }

    #[test]
    fn piece_at() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::E8), Some((Piece::King, Color::Black)));
        assert_eq!(pos.piece_at(sq(File::E, Rank::R4)), None);
    }

    #[test]
    fn castle_rights_flags() {
        let mut rights = CastleRights::BOTH;
        assert!(rights.has(CastleSide::King));
        assert!(rights.has(CastleSide::Queen));

        rights.remove(CastleSide::King);
        assert!(!rights.has(CastleSide::King));
        assert!(rights.has(CastleSide::Queen));

        rights.remove(CastleSide::Queen);
        assert!(rights.is_none());

        rights.add(CastleSide::Queen);
        assert!(rights.has(CastleSide::Queen));
    }

    #[test]
    fn king_square() {
        let pos = Position::startpos();
        assert_eq!(pos.king_square(Color::White), Some(Square::E1));
        assert_eq!(pos.king_square(Color::Black), Some(Square::E8));

        let empty = Position::empty();
        assert_eq!(empty.king_square(Color::White), None);
    }

    #[test]
    fn squares_attacked_at_startpos() {
        let pos = Position::startpos();
        // e3 is covered by the d2 and f2 pawns
        assert!(pos.is_square_attacked_by(Color::White, sq(File::E, Rank::R3)));
        // e4 is not attacked by anything at the start
        assert!(!pos.is_square_attacked_by(Color::White, sq(File::E, Rank::R4)));
        assert!(!pos.is_square_attacked_by(Color::Black, sq(File::E, Rank::R4)));
        // f3 is covered by the g1 knight
        assert!(pos.is_square_attacked_by(Color::White, sq(File::F, Rank::R3)));
    }

    #[test]
    fn not_in_check_at_startpos() {
        let pos = Position::startpos();
        assert!(!pos.in_check());
        assert!(!pos.is_in_check(Color::Black));
        assert!(pos.checkers().is_empty());
    }

    #[test]
    fn checkers_found() {
        // Black queen on h4 checks the e1 king after f3/g4
        let pos =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(pos.in_check());
        let checkers = pos.checkers();
        assert_eq!(checkers.count(), 1);
        assert!(checkers.contains(sq(File::H, Rank::R4)));
    }

    #[test]
    fn king_blockers_detects_pin() {
        // White knight on d2 shields the d1 king from the d8 rook
        let pos = Position::from_fen("3r3k/8/8/8/8/8/3N4/3K4 w - - 0 1").unwrap();
        let blockers = pos.king_blockers(Color::White);
        assert_eq!(blockers.count(), 1);
        assert!(blockers.contains(sq(File::D, Rank::R2)));
    }

    #[test]
    fn king_blockers_requires_single_shield() {
        // Two pieces between the rook and king: neither is a blocker
        let pos = Position::from_fen("3r3k/8/8/3P4/8/3N4/8/3K4 w - - 0 1").unwrap();
        assert!(pos.king_blockers(Color::White).is_empty());
    }

    #[test]
    fn king_blockers_can_be_enemy_piece() {
        // A black pawn on d2 shields the white king from the black rook:
        // it blocks for White's king even though it is Black's piece
        let pos = Position::from_fen("3r3k/8/8/8/8/8/3p4/3K4 w - - 0 1").unwrap();
        let blockers = pos.king_blockers(Color::White);
        assert!(blockers.contains(sq(File::D, Rank::R2)));
    }

    #[test]
    fn check_squares_for_knight() {
        let pos = Position::from_fen("7k/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
        // Squares from which a white knight would check the h8 king
        let squares = pos.check_squares(Color::White, Piece::Knight);
        assert!(squares.contains(sq(File::F, Rank::R7)));
        assert!(squares.contains(sq(File::G, Rank::R6)));
        assert_eq!(squares.count(), 2);
        // Kings never deliver check
        assert!(pos.check_squares(Color::White, Piece::King).is_empty());
    }

    #[test]
    fn can_castle_both_wings() {
        let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        assert!(pos.can_castle_kingside(Color::White));
        assert!(pos.can_castle_queenside(Color::White));
        assert!(pos.can_castle_kingside(Color::Black));
        assert!(pos.can_castle_queenside(Color::Black));
    }

    #[test]
    fn cannot_castle_without_right() {
        let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w Qkq - 0 1").unwrap();
        assert!(!pos.can_castle_kingside(Color::White));
        assert!(pos.can_castle_queenside(Color::White));
    }

    #[test]
    fn cannot_castle_through_pieces() {
        let pos = Position::startpos();
        assert!(!pos.can_castle_kingside(Color::White));
        assert!(!pos.can_castle_queenside(Color::White));
    }

    #[test]
    fn cannot_castle_through_attacked_square() {
        // Black rook on f5 covers f1; kingside is out, queenside is fine
        let pos = Position::from_fen("4k3/8/8/5r2/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!pos.can_castle_kingside(Color::White));
        assert!(pos.can_castle_queenside(Color::White));
    }

    #[test]
    fn cannot_castle_out_of_check() {
        let pos = Position::from_fen("4k3/8/8/4r3/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!pos.can_castle_kingside(Color::White));
        assert!(!pos.can_castle_queenside(Color::White));
    }

    #[test]
    fn castle_queenside_b_file_may_be_attacked() {
        // b1 is attacked but the king never crosses it
        let pos = Position::from_fen("4k3/8/8/1r6/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(pos.can_castle_queenside(Color::White));
    }

    #[test]
    fn apply_pawn_push_without_ep_listener() {
        let mut pos = Position::startpos();
        pos.apply(Move::normal(sq(File::E, Rank::R2), sq(File::E, Rank::R4)));
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.piece_at(sq(File::E, Rank::R4)), Some((Piece::Pawn, Color::White)));
        assert_eq!(pos.piece_at(sq(File::E, Rank::R2)), None);
        // No black pawn can capture on e3, so no en passant is recorded
        assert!(pos.en_passant().is_empty());
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn apply_double_push_records_ep_when_capturable() {
        // Black pawn on d4 is ready to capture e4 en passant
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/8/3p4/8/PPPPPPPP/RNBQKBNR w KQkq - 0 3")
                .unwrap();
        pos.apply(Move::normal(sq(File::E, Rank::R2), sq(File::E, Rank::R4)));
        assert_eq!(pos.en_passant_square(), Some(sq(File::E, Rank::R3)));
    }

    #[test]
    fn apply_en_passant_capture() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3")
                .unwrap();
        pos.apply(Move::en_passant(sq(File::D, Rank::R4), sq(File::E, Rank::R3)));
        assert_eq!(pos.piece_at(sq(File::E, Rank::R3)), Some((Piece::Pawn, Color::Black)));
        // The captured pawn disappears from e4, not from the landing square
        assert_eq!(pos.piece_at(sq(File::E, Rank::R4)), None);
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn apply_castling_moves_both_pieces() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        pos.apply(Move::castling(CastleSide::King));
        assert_eq!(pos.piece_at(Square::G1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::F1), Some((Piece::Rook, Color::White)));
        assert_eq!(pos.piece_at(Square::E1), None);
        assert_eq!(pos.piece_at(Square::H1), None);
        assert!(pos.castling(Color::White).is_none());
        assert!(pos.castling(Color::Black).has(CastleSide::King));
    }

    #[test]
    fn apply_promotion_replaces_pawn() {
        let mut pos = Position::from_fen("7k/P7/8/8/8/8/8/7K w - - 0 1").unwrap();
        pos.apply(Move::promotion(sq(File::A, Rank::R7), sq(File::A, Rank::R8), Piece::Queen));
        assert_eq!(pos.piece_at(Square::A8), Some((Piece::Queen, Color::White)));
        assert!(pos.pieces(Color::White, Piece::Pawn).is_empty());
    }

    #[test]
    fn apply_king_move_clears_rights() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        pos.apply(Move::normal(Square::E1, sq(File::E, Rank::R2)));
        assert!(pos.castling(Color::White).is_none());
        assert_eq!(pos.castling(Color::Black), CastleRights::BOTH);
    }

    #[test]
    fn apply_rook_move_clears_one_side() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        pos.apply(Move::normal(Square::A1, Square::B1));
        assert!(!pos.castling(Color::White).has(CastleSide::Queen));
        assert!(pos.castling(Color::White).has(CastleSide::King));
    }

    #[test]
    fn apply_rook_capture_clears_victims_right() {
        let mut pos =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.apply(Move::normal(Square::A1, Square::A8));
        assert!(!pos.castling(Color::Black).has(CastleSide::Queen));
        assert!(pos.castling(Color::Black).has(CastleSide::King));
        // Mover spent its own queen-side rook as well
        assert!(!pos.castling(Color::White).has(CastleSide::Queen));
    }

    #[test]
    fn halfmove_clock_counts_quiet_moves() {
        let mut pos = Position::startpos();
        pos.apply(Move::normal(sq(File::G, Rank::R1), sq(File::F, Rank::R3)));
        assert_eq!(pos.halfmove_clock(), 1);
        pos.apply(Move::normal(sq(File::G, Rank::R8), sq(File::F, Rank::R6)));
        assert_eq!(pos.halfmove_clock(), 2);
        // A pawn move resets the count
        pos.apply(Move::normal(sq(File::E, Rank::R2), sq(File::E, Rank::R3)));
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn fullmove_number_increments_after_black() {
        let mut pos = Position::startpos();
        assert_eq!(pos.fullmove_number(), 1);
        pos.apply(Move::normal(sq(File::E, Rank::R2), sq(File::E, Rank::R4)));
        assert_eq!(pos.fullmove_number(), 1);
        pos.apply(Move::normal(sq(File::E, Rank::R7), sq(File::E, Rank::R5)));
        assert_eq!(pos.fullmove_number(), 2);
    }

    #[test]
    fn side_not_to_move_is_never_in_check_after_legal_play() {
        let mut pos = Position::startpos();
        pos.apply(Move::normal(sq(File::E, Rank::R2), sq(File::E, Rank::R4)));
        assert!(!pos.is_in_check(Color::White));
    }

    #[test]
    fn ep_fen_field_survives_round_trip() {
        let fen = "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3";
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.en_passant_square(), Some(sq(File::E, Rank::R3)));
        assert_eq!(pos.to_fen(), fen);
    }

    #[test]
    fn position_is_a_value_type() {
        let pos = Position::startpos();
        let mut copy = pos.clone();
        copy.apply(Move::normal(sq(File::E, Rank::R2), sq(File::E, Rank::R4)));
        assert_ne!(pos, copy);
        assert_eq!(pos, Position::startpos());
    }
}
