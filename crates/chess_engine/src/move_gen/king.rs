//! King move generation
//!
//! Kings move one square in any direction onto empty or enemy-occupied
//! squares. Castling is not part of this rule set.
//!
//! Whether the destination is attacked is not checked here; the game engine's
//! self-check filter removes those moves.

use super::push_step_moves;
use crate::board::Board;
use crate::constants::KING_OFFSETS;
use crate::types::{Move, Position, Side};

/// Generate king moves from a given square
pub fn generate_king_moves(board: &Board, side: Side, from: Position, moves: &mut Vec<Move>) {
    push_step_moves(board, side, from, &KING_OFFSETS, moves);
}
