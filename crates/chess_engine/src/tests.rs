//! Rules test suite
//!
//! Exercises move generation and the game engine against hand-built positions.
//!
//! # Test Organization
//!
//! - `test_sliding_*` - rook/bishop/queen walks and blocking
//! - `test_step_*` - king and knight offsets
//! - `test_pawn_*` - advances, captures and promotion
//! - `test_legal_*` - self-check filtering
//! - `test_apply_*` - turn enforcement and move execution
//! - `test_status_*` - check, checkmate, stalemate

use crate::api::{ChessGame, GameStatus};
use crate::board::Board;
use crate::error::ChessEngineError;
use crate::move_gen::pseudo_legal_moves;
use crate::types::{Move, Piece, PieceKind, Position, Side};
use std::collections::HashSet;

fn pos(row: i8, column: i8) -> Position {
    Position::new(row, column)
}

fn piece(side: Side, kind: PieceKind) -> Piece {
    Piece::new(side, kind)
}

/// Build a board from `(side, kind, (row, column))` entries
fn create_test_board(pieces: &[(Side, PieceKind, (i8, i8))]) -> Board {
    let mut board = Board::new();
    for &(side, kind, (row, column)) in pieces {
        board.place(pos(row, column), piece(side, kind));
    }
    board
}

fn destinations(board: &Board, at: Position) -> HashSet<Position> {
    let mover = board.at(at).expect("test square should be occupied");
    pseudo_legal_moves(board, mover, at)
        .into_iter()
        .map(|mv| mv.end)
        .collect()
}

// ============================================================================
// Generator-wide properties
// ============================================================================

#[test]
fn test_generated_moves_stay_on_board_and_off_friends() {
    let board = Board::standard();
    for (from, mover) in board.pieces() {
        for mv in pseudo_legal_moves(&board, mover, from) {
            assert!(mv.end.is_on_board(), "{} left the board", mv);
            assert_ne!(
                board.at(mv.end).map(|p| p.side),
                Some(mover.side),
                "{} lands on a friendly piece",
                mv
            );
        }
    }
}

#[test]
fn test_every_kind_from_every_square_is_bounded() {
    let kinds = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Pawn,
    ];
    for kind in kinds {
        for from in Position::all() {
            let mut board = Board::new();
            let mover = piece(Side::White, kind);
            board.place(from, mover);
            for mv in pseudo_legal_moves(&board, mover, from) {
                assert!(mv.end.is_on_board());
                assert_ne!(mv.end, from);
            }
        }
    }
}

// ============================================================================
// Sliding pieces
// ============================================================================

#[test]
fn test_sliding_rook_open_board() {
    let board = create_test_board(&[(Side::White, PieceKind::Rook, (4, 4))]);
    assert_eq!(destinations(&board, pos(4, 4)).len(), 14);
}

#[test]
fn test_sliding_stops_at_first_occupied_square() {
    let board = create_test_board(&[
        (Side::White, PieceKind::Rook, (1, 1)),
        (Side::White, PieceKind::Pawn, (4, 1)),
        (Side::Black, PieceKind::Knight, (1, 5)),
    ]);
    let reach = destinations(&board, pos(1, 1));

    // Up the file: stops before the friendly pawn
    assert!(reach.contains(&pos(2, 1)));
    assert!(reach.contains(&pos(3, 1)));
    assert!(!reach.contains(&pos(4, 1)));
    assert!(!reach.contains(&pos(5, 1)));

    // Along the rank: includes the enemy knight, nothing beyond
    assert!(reach.contains(&pos(1, 4)));
    assert!(reach.contains(&pos(1, 5)));
    assert!(!reach.contains(&pos(1, 6)));

    assert_eq!(reach.len(), 6);
}

#[test]
fn test_sliding_bishop_diagonals_only() {
    let board = create_test_board(&[
        (Side::Black, PieceKind::Bishop, (4, 4)),
        (Side::White, PieceKind::Pawn, (6, 6)),
    ]);
    let reach = destinations(&board, pos(4, 4));
    assert!(reach.contains(&pos(5, 5)));
    assert!(reach.contains(&pos(6, 6)));
    assert!(!reach.contains(&pos(7, 7)));
    assert!(reach.contains(&pos(1, 1)));
    assert!(!reach.contains(&pos(4, 5)));
}

#[test]
fn test_sliding_queen_is_rook_plus_bishop() {
    let rook = create_test_board(&[(Side::White, PieceKind::Rook, (3, 6))]);
    let bishop = create_test_board(&[(Side::White, PieceKind::Bishop, (3, 6))]);
    let queen = create_test_board(&[(Side::White, PieceKind::Queen, (3, 6))]);

    let mut union = destinations(&rook, pos(3, 6));
    union.extend(destinations(&bishop, pos(3, 6)));
    assert_eq!(destinations(&queen, pos(3, 6)), union);
}

// ============================================================================
// Step pieces
// ============================================================================

#[test]
fn test_step_knight_in_corner() {
    let board = create_test_board(&[(Side::White, PieceKind::Knight, (1, 1))]);
    let reach = destinations(&board, pos(1, 1));
    assert_eq!(reach, HashSet::from([pos(3, 2), pos(2, 3)]));
}

#[test]
fn test_step_knight_jumps_over_pieces() {
    let board = Board::standard();
    let reach = destinations(&board, pos(1, 2));
    assert_eq!(reach, HashSet::from([pos(3, 1), pos(3, 3)]));
}

#[test]
fn test_step_king_avoids_friendly_squares() {
    let board = create_test_board(&[
        (Side::White, PieceKind::King, (4, 4)),
        (Side::White, PieceKind::Pawn, (5, 4)),
        (Side::Black, PieceKind::Pawn, (5, 5)),
    ]);
    let reach = destinations(&board, pos(4, 4));
    assert_eq!(reach.len(), 7);
    assert!(!reach.contains(&pos(5, 4)));
    assert!(reach.contains(&pos(5, 5)));
}

// ============================================================================
// Pawns
// ============================================================================

#[test]
fn test_pawn_single_and_double_from_start() {
    let board = Board::standard();
    assert_eq!(
        destinations(&board, pos(2, 5)),
        HashSet::from([pos(3, 5), pos(4, 5)])
    );
    assert_eq!(
        destinations(&board, pos(7, 4)),
        HashSet::from([pos(6, 4), pos(5, 4)])
    );
}

#[test]
fn test_pawn_double_blocked_by_intermediate() {
    let board = create_test_board(&[
        (Side::White, PieceKind::Pawn, (2, 3)),
        (Side::Black, PieceKind::Knight, (3, 3)),
    ]);
    assert!(destinations(&board, pos(2, 3)).is_empty());
}

#[test]
fn test_pawn_double_blocked_by_destination() {
    let board = create_test_board(&[
        (Side::White, PieceKind::Pawn, (2, 3)),
        (Side::Black, PieceKind::Knight, (4, 3)),
    ]);
    assert_eq!(destinations(&board, pos(2, 3)), HashSet::from([pos(3, 3)]));
}

#[test]
fn test_pawn_no_double_off_start_rank() {
    let board = create_test_board(&[(Side::White, PieceKind::Pawn, (3, 3))]);
    assert_eq!(destinations(&board, pos(3, 3)), HashSet::from([pos(4, 3)]));
}

#[test]
fn test_pawn_captures_only_enemies_diagonally() {
    let board = create_test_board(&[
        (Side::Black, PieceKind::Pawn, (5, 5)),
        (Side::White, PieceKind::Rook, (4, 4)),
        (Side::White, PieceKind::Rook, (4, 6)),
        (Side::White, PieceKind::Rook, (4, 5)),
    ]);
    assert_eq!(
        destinations(&board, pos(5, 5)),
        HashSet::from([pos(4, 4), pos(4, 6)])
    );

    let lonely = create_test_board(&[(Side::Black, PieceKind::Pawn, (5, 5))]);
    assert_eq!(destinations(&lonely, pos(5, 5)), HashSet::from([pos(4, 5)]));
}

#[test]
fn test_pawn_promotion_yields_four_moves() {
    let board = create_test_board(&[(Side::White, PieceKind::Pawn, (7, 2))]);
    let mover = piece(Side::White, PieceKind::Pawn);
    let moves = pseudo_legal_moves(&board, mover, pos(7, 2));

    assert_eq!(moves.len(), 4);
    let kinds: HashSet<PieceKind> = moves.iter().filter_map(|mv| mv.promotion).collect();
    assert_eq!(
        kinds,
        HashSet::from([
            PieceKind::Queen,
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Knight
        ])
    );
    assert!(moves.iter().all(|mv| mv.end == pos(8, 2)));
}

#[test]
fn test_pawn_promotion_on_capture_for_black() {
    let board = create_test_board(&[
        (Side::Black, PieceKind::Pawn, (2, 8)),
        (Side::White, PieceKind::Knight, (1, 7)),
        (Side::White, PieceKind::Knight, (1, 8)),
    ]);
    let mover = piece(Side::Black, PieceKind::Pawn);
    let moves = pseudo_legal_moves(&board, mover, pos(2, 8));
    assert_eq!(moves.len(), 4);
    assert!(moves.iter().all(|mv| mv.end == pos(1, 7) && mv.promotion.is_some()));
}

// ============================================================================
// Legal move filtering
// ============================================================================

#[test]
fn test_legal_moves_empty_square_is_none() {
    let mut game = ChessGame::new();
    assert_eq!(game.legal_moves(pos(4, 4)), None);
}

#[test]
fn test_legal_pinned_piece_cannot_leave_file() {
    let board = create_test_board(&[
        (Side::White, PieceKind::King, (1, 5)),
        (Side::White, PieceKind::Bishop, (2, 5)),
        (Side::Black, PieceKind::Rook, (8, 5)),
        (Side::Black, PieceKind::King, (8, 1)),
    ]);
    let mut game = ChessGame::with_board(board, Side::White);
    let moves = game.legal_moves(pos(2, 5)).expect("bishop is on the board");
    assert!(moves.is_empty(), "pinned bishop has no legal moves: {:?}", moves);
}

#[test]
fn test_legal_king_cannot_step_into_attack() {
    let board = create_test_board(&[
        (Side::White, PieceKind::King, (1, 1)),
        (Side::Black, PieceKind::Rook, (8, 2)),
        (Side::Black, PieceKind::King, (8, 8)),
    ]);
    let mut game = ChessGame::with_board(board, Side::White);
    let ends: HashSet<Position> = game
        .legal_moves(pos(1, 1))
        .expect("king is on the board")
        .into_iter()
        .map(|mv| mv.end)
        .collect();
    assert_eq!(ends, HashSet::from([pos(2, 1)]));
}

#[test]
fn test_legal_moves_never_leave_king_attacked() {
    let mut game = ChessGame::new();
    let script = [
        Move::new(pos(2, 5), pos(4, 5)),
        Move::new(pos(7, 6), pos(6, 6)),
        Move::new(pos(1, 4), pos(5, 8)),
    ];
    for mv in &script {
        game.apply_move(mv).expect("scripted move is legal");
    }

    // Black is in check from the queen on h5
    let squares: Vec<Position> = game
        .board()
        .pieces()
        .filter(|(_, p)| p.side == Side::Black)
        .map(|(at, _)| at)
        .collect();
    for at in squares {
        let mover = game.board().at(at).expect("occupied");
        for mv in game.legal_moves(at).expect("occupied") {
            let mut after = game.clone();
            after.board.apply(&mv, mover);
            after.set_board(after.board.clone());
            assert!(!after.in_check(Side::Black), "{} leaves Black in check", mv);
        }
    }
}

#[test]
fn test_legal_filtering_leaves_board_untouched() {
    let mut game = ChessGame::new();
    let before = game.clone();
    for at in Position::all() {
        let _ = game.legal_moves(at);
    }
    assert_eq!(game, before);
}

// ============================================================================
// Applying moves
// ============================================================================

#[test]
fn test_apply_opening_sequence_flips_turn() {
    let mut game = ChessGame::new();
    let e4 = Move::new(pos(2, 5), pos(4, 5));

    game.apply_move(&e4).expect("e2e4 is legal");
    assert_eq!(game.turn(), Side::Black);
    assert_eq!(
        game.board().at(pos(4, 5)),
        Some(piece(Side::White, PieceKind::Pawn))
    );
    assert!(game.board().is_empty(pos(2, 5)));

    // Replaying the same move: the start square is now empty
    assert_eq!(
        game.apply_move(&e4),
        Err(ChessEngineError::NoPieceAtStart { position: pos(2, 5) })
    );

    // White trying to move again out of turn
    assert_eq!(
        game.apply_move(&Move::new(pos(2, 4), pos(4, 4))),
        Err(ChessEngineError::WrongTurn {
            expected: Side::Black,
            found: Side::White
        })
    );

    game.apply_move(&Move::new(pos(7, 5), pos(5, 5)))
        .expect("e7e5 is legal");
    assert_eq!(game.turn(), Side::White);
}

#[test]
fn test_apply_rejects_move_outside_legal_set() {
    let mut game = ChessGame::new();
    let before = game.clone();
    let mv = Move::new(pos(2, 5), pos(5, 5));
    assert_eq!(
        game.apply_move(&mv),
        Err(ChessEngineError::IllegalMove { mv })
    );
    assert_eq!(game, before);
}

#[test]
fn test_apply_rejects_off_board_squares() {
    let mut game = ChessGame::new();
    let before = game.clone();
    for mv in [
        Move::new(pos(9, 5), pos(4, 5)),
        Move::new(pos(0, 1), pos(3, 1)),
        Move::new(pos(2, 5), pos(4, 0)),
        Move::new(pos(i8::MIN, 1), pos(i8::MAX, 1)),
    ] {
        assert_eq!(game.apply_move(&mv), Err(ChessEngineError::IllegalMove { mv }));
    }
    assert_eq!(game, before);
    assert_eq!(game.legal_moves(pos(9, 5)), None);
    assert!(!game.is_legal_move(&Move::new(pos(-128, 5), pos(4, 5))));
}

#[test]
fn test_apply_requires_promotion_kind_on_far_rank() {
    let board = create_test_board(&[
        (Side::White, PieceKind::Pawn, (7, 1)),
        (Side::White, PieceKind::King, (1, 5)),
        (Side::Black, PieceKind::King, (5, 8)),
    ]);
    let mut game = ChessGame::with_board(board, Side::White);

    let bare = Move::new(pos(7, 1), pos(8, 1));
    assert!(matches!(
        game.apply_move(&bare),
        Err(ChessEngineError::IllegalMove { .. })
    ));

    let promote = Move::with_promotion(pos(7, 1), pos(8, 1), PieceKind::Knight);
    game.apply_move(&promote).expect("promotion is legal");
    assert_eq!(
        game.board().at(pos(8, 1)),
        Some(piece(Side::White, PieceKind::Knight))
    );
}

#[test]
fn test_apply_king_move_updates_cache() {
    let board = create_test_board(&[
        (Side::White, PieceKind::King, (1, 5)),
        (Side::Black, PieceKind::King, (8, 5)),
    ]);
    let mut game = ChessGame::with_board(board, Side::White);
    game.apply_move(&Move::new(pos(1, 5), pos(2, 6)))
        .expect("king step is legal");
    assert_eq!(game.king_square(Side::White), Some(pos(2, 6)));
}

#[test]
fn test_apply_refused_after_game_over() {
    let mut game = ChessGame::new();
    game.set_over(true);
    assert_eq!(
        game.apply_move(&Move::new(pos(2, 5), pos(4, 5))),
        Err(ChessEngineError::GameOver)
    );
}

// ============================================================================
// Check, checkmate, stalemate
// ============================================================================

#[test]
fn test_status_fools_mate() {
    let mut game = ChessGame::new();
    let script = [
        Move::new(pos(2, 6), pos(3, 6)),
        Move::new(pos(7, 5), pos(5, 5)),
        Move::new(pos(2, 7), pos(4, 7)),
        Move::new(pos(8, 4), pos(4, 8)),
    ];
    for mv in &script {
        game.apply_move(mv).expect("scripted move is legal");
    }

    assert!(game.in_check(Side::White));
    assert!(game.is_checkmate(Side::White));
    assert!(!game.is_stalemate(Side::White));
    assert_eq!(game.status(Side::White), GameStatus::Checkmate);
    assert!(!game.in_check(Side::Black));
}

#[test]
fn test_status_back_rank_mate_from_text() {
    let board = Board::from_text(
        "
        |k| | | | | | |R|
        | | | | | | | | |
        | |K| | | | | | |
        | | | | | | | | |
        | | | | | | | | |
        | | | | | | | | |
        | | | | | | | | |
        | | | | | | | | |
        ",
    )
    .expect("valid board");
    let mut game = ChessGame::with_board(board, Side::Black);
    assert!(game.is_checkmate(Side::Black));
    assert!(!game.is_stalemate(Side::Black));
}

#[test]
fn test_status_stalemate() {
    let board = create_test_board(&[
        (Side::Black, PieceKind::King, (8, 1)),
        (Side::White, PieceKind::Queen, (6, 2)),
        (Side::White, PieceKind::King, (1, 8)),
    ]);
    let mut game = ChessGame::with_board(board, Side::Black);
    assert!(!game.in_check(Side::Black));
    assert!(game.is_stalemate(Side::Black));
    assert!(!game.is_checkmate(Side::Black));
    assert_eq!(game.status(Side::Black), GameStatus::Stalemate);
}

#[test]
fn test_status_check_with_escape() {
    let board = create_test_board(&[
        (Side::Black, PieceKind::King, (8, 5)),
        (Side::White, PieceKind::Rook, (1, 5)),
        (Side::White, PieceKind::King, (1, 1)),
    ]);
    let mut game = ChessGame::with_board(board, Side::Black);
    assert_eq!(game.status(Side::Black), GameStatus::Check);
}

#[test]
fn test_status_missing_king_is_never_in_check() {
    let board = create_test_board(&[(Side::White, PieceKind::Queen, (4, 4))]);
    let game = ChessGame::with_board(board, Side::Black);
    assert!(!game.in_check(Side::Black));
}

#[test]
fn test_status_start_position_in_progress() {
    let mut game = ChessGame::new();
    assert_eq!(game.status(Side::White), GameStatus::InProgress);
    assert!(game.has_any_legal_move(Side::Black));
}
