//! Knight move generation
//!
//! Knights jump in an L-shape and ignore anything in between, so only the
//! destination square matters.

use super::push_step_moves;
use crate::board::Board;
use crate::constants::KNIGHT_OFFSETS;
use crate::types::{Move, Position, Side};

/// Generate knight moves from a given square
pub fn generate_knight_moves(board: &Board, side: Side, from: Position, moves: &mut Vec<Move>) {
    push_step_moves(board, side, from, &KNIGHT_OFFSETS, moves);
}
