//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::generate_moves;
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        let mut next = position.clone();
        next.apply(*m);
        nodes += perft(&next, depth - 1);
    }
    nodes
}

/// Perft with divide: the node count below each root move.
/// Useful to pinpoint which move subtree disagrees with a reference count.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_moves(position);
    let stm = position.side_to_move();
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let mut next = position.clone();
        next.apply(*m);
        let nodes = if depth > 1 { perft(&next, depth - 1) } else { 1 };
        results.push((m.to_uci(stm), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
