//! Pawn move generation
//!
//! Handles pawn-specific move generation including:
//! - Single and double forward pushes
//! - Diagonal captures
//! - Promotion on the far rank
//!
//! ## Pawn Movement Rules
//!
//! - **Forward push**: one square toward the opponent, onto an empty square only
//! - **Double push**: from the side's starting rank (2 for White, 7 for Black),
//!   when both the intermediate and destination squares are empty
//! - **Captures**: one square diagonally forward, onto an enemy piece only
//! - **Promotion**: a move onto the far rank is emitted once per promotion kind
//!   (queen, rook, bishop, knight) and never un-promoted
//!
//! En passant is not part of this rule set.

use crate::board::Board;
use crate::constants::PROMOTION_KINDS;
use crate::types::{Move, Position, Side};

/// Generate pawn moves from a given square
pub fn generate_pawn_moves(board: &Board, side: Side, from: Position, moves: &mut Vec<Move>) {
    let direction = side.pawn_direction();

    if let Some(one_ahead) = from.offset(direction, 0) {
        if board.is_empty(one_ahead) {
            push_pawn_move(side, from, one_ahead, moves);

            if from.row == side.pawn_start_row() {
                if let Some(two_ahead) = one_ahead.offset(direction, 0) {
                    if board.is_empty(two_ahead) {
                        push_pawn_move(side, from, two_ahead, moves);
                    }
                }
            }
        }
    }

    for d_column in [-1, 1] {
        let Some(target) = from.offset(direction, d_column) else {
            continue;
        };
        if matches!(board.at(target), Some(occupant) if occupant.side != side) {
            push_pawn_move(side, from, target, moves);
        }
    }
}

fn push_pawn_move(side: Side, from: Position, to: Position, moves: &mut Vec<Move>) {
    if to.row == side.promotion_row() {
        moves.extend(
            PROMOTION_KINDS
                .iter()
                .map(|kind| Move::with_promotion(from, to, *kind)),
        );
    } else {
        moves.push(Move::new(from, to));
    }
}
