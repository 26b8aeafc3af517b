//! Sliding piece move generation
//!
//! Common functionality for sliding pieces (bishops, rooks, queens).
//! These pieces can move multiple squares in a direction until blocked.
//!
//! ## Algorithm
//!
//! For each direction vector:
//! 1. Step one square at a time, at most 7 steps
//! 2. Empty square: valid move, keep walking
//! 3. Opponent piece: valid capture, stop this direction
//! 4. Own piece: stop this direction without including the square

use crate::board::Board;
use crate::constants::{BISHOP_DIRECTIONS, MAX_SLIDE, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};
use crate::types::{Move, Position, Side};

/// Generate moves for a sliding piece along the given direction vectors
pub fn generate_sliding_moves(
    board: &Board,
    side: Side,
    from: Position,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(d_row, d_column) in directions {
        let mut current = from;
        for _ in 0..MAX_SLIDE {
            let Some(next) = current.offset(d_row, d_column) else {
                break;
            };
            match board.at(next) {
                None => moves.push(Move::new(from, next)),
                Some(occupant) => {
                    if occupant.side != side {
                        moves.push(Move::new(from, next));
                    }
                    break;
                }
            }
            current = next;
        }
    }
}

pub fn generate_rook_moves(board: &Board, side: Side, from: Position, moves: &mut Vec<Move>) {
    generate_sliding_moves(board, side, from, &ROOK_DIRECTIONS, moves);
}

pub fn generate_bishop_moves(board: &Board, side: Side, from: Position, moves: &mut Vec<Move>) {
    generate_sliding_moves(board, side, from, &BISHOP_DIRECTIONS, moves);
}

/// Queens combine rook and bishop directions
pub fn generate_queen_moves(board: &Board, side: Side, from: Position, moves: &mut Vec<Move>) {
    generate_sliding_moves(board, side, from, &QUEEN_DIRECTIONS, moves);
}
