//! Networking Tests
//!
//! Wire format of the live session envelopes as clients see them.

use chess_engine::{ChessGame, Move, PieceKind, Position};
use serde_json::{json, Value};
use shared::{CommandType, ServerMessage, UserGameCommand};

#[test]
fn test_connect_command_from_client_json() {
    let json = r#"{"commandType":"CONNECT","authToken":"abc","gameID":12}"#;
    let command: UserGameCommand = serde_json::from_str(json).expect("Should deserialize");

    assert_eq!(command.command_type, CommandType::Connect);
    assert_eq!(command.auth_token, "abc");
    assert_eq!(command.game_id, 12);
    assert_eq!(command.mv, None);
}

#[test]
fn test_make_move_command_carries_promotion() {
    let json = r#"{
        "commandType": "MAKE_MOVE",
        "authToken": "abc",
        "gameID": 3,
        "move": {"start": {"row": 7, "column": 1}, "end": {"row": 8, "column": 1}, "promotion": "KNIGHT"}
    }"#;
    let command: UserGameCommand = serde_json::from_str(json).expect("Should deserialize");

    assert_eq!(command.command_type, CommandType::MakeMove);
    assert_eq!(
        command.mv,
        Some(Move::with_promotion(
            Position::new(7, 1),
            Position::new(8, 1),
            PieceKind::Knight
        ))
    );
}

#[test]
fn test_unknown_command_type_is_rejected() {
    let json = r#"{"commandType":"SURRENDER","authToken":"abc","gameID":3}"#;
    assert!(serde_json::from_str::<UserGameCommand>(json).is_err());
}

#[test]
fn test_leave_command_omits_move() {
    let value = serde_json::to_value(UserGameCommand::leave("tok", 8)).unwrap();
    assert_eq!(value, json!({"commandType": "LEAVE", "authToken": "tok", "gameID": 8}));
}

#[test]
fn test_load_game_layout() {
    let value: Value = serde_json::to_value(ServerMessage::load_game(ChessGame::new())).unwrap();

    assert_eq!(value["serverMessageType"], "LOAD_GAME");
    assert_eq!(value["game"]["turn"], "WHITE");
    assert_eq!(value["game"]["over"], false);

    let board = value["game"]["board"].as_array().unwrap();
    assert_eq!(board.len(), 8);
    assert_eq!(board[0][4], json!({"side": "WHITE", "kind": "KING"}));
    assert_eq!(board[7][3], json!({"side": "BLACK", "kind": "QUEEN"}));
    assert!(board[3][3].is_null());
}

#[test]
fn test_notification_and_error_layout() {
    let note = serde_json::to_value(ServerMessage::notification("alice has resigned!")).unwrap();
    assert_eq!(
        note,
        json!({"serverMessageType": "NOTIFICATION", "message": "alice has resigned!"})
    );

    let error = serde_json::to_value(ServerMessage::error("Error: unauthorized")).unwrap();
    assert_eq!(
        error,
        json!({"serverMessageType": "ERROR", "errorMessage": "Error: unauthorized"})
    );
}

#[test]
fn test_load_game_round_trip_keeps_over_flag() {
    let mut game = ChessGame::new();
    game.set_over(true);
    let text = ServerMessage::load_game(game.clone()).to_json().unwrap();

    match serde_json::from_str::<ServerMessage>(&text).unwrap() {
        ServerMessage::LoadGame { game: decoded } => {
            assert!(decoded.is_over());
            assert_eq!(decoded, game);
        }
        other => panic!("Wrong message type: {:?}", other),
    }
}
