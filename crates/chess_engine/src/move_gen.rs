//! Pseudo-legal move generation
//!
//! Enumerates the destinations a piece can reach geometrically, without regard
//! to whether the mover's own king is left in check. The game engine filters
//! these through a trial-move simulation to obtain legal moves.
//!
//! Dispatch is a plain match over [`PieceKind`]; each kind's rules live in its
//! own submodule:
//!
//! - `sliding` - rooks, bishops and queens walk direction vectors
//! - `king` / `knight` - fixed offset sets
//! - `pawn` - side-dependent advances, captures and promotion
//!
//! Every generated destination is on the board and never holds a piece of the
//! mover's side.

mod king;
mod knight;
mod pawn;
mod sliding;

pub use king::generate_king_moves;
pub use knight::generate_knight_moves;
pub use pawn::generate_pawn_moves;
pub use sliding::{generate_bishop_moves, generate_queen_moves, generate_rook_moves};

use crate::board::Board;
use crate::types::{Move, Piece, PieceKind, Position, Side};

/// Generate all pseudo-legal moves for `piece` standing on `from`
///
/// The result holds no duplicates. Pawn moves onto the far rank appear once per
/// promotion kind.
pub fn pseudo_legal_moves(board: &Board, piece: Piece, from: Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(28);
    match piece.kind {
        PieceKind::King => generate_king_moves(board, piece.side, from, &mut moves),
        PieceKind::Queen => generate_queen_moves(board, piece.side, from, &mut moves),
        PieceKind::Bishop => generate_bishop_moves(board, piece.side, from, &mut moves),
        PieceKind::Knight => generate_knight_moves(board, piece.side, from, &mut moves),
        PieceKind::Rook => generate_rook_moves(board, piece.side, from, &mut moves),
        PieceKind::Pawn => generate_pawn_moves(board, piece.side, from, &mut moves),
    }
    moves
}

/// Check if any piece of `attacker` can reach `target`
pub fn is_square_attacked(board: &Board, target: Position, attacker: Side) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.side == attacker)
        .any(|(from, piece)| {
            pseudo_legal_moves(board, piece, from)
                .iter()
                .any(|mv| mv.end == target)
        })
}

/// Shared rule for step pieces: each in-bounds offset not holding a friendly piece
fn push_step_moves(
    board: &Board,
    side: Side,
    from: Position,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(d_row, d_column) in offsets {
        let Some(to) = from.offset(d_row, d_column) else {
            continue;
        };
        match board.at(to) {
            Some(occupant) if occupant.side == side => {}
            _ => moves.push(Move::new(from, to)),
        }
    }
}
