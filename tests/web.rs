#![cfg(target_arch = "wasm32")]

use tile_merge_core::{Board, GameEngine, GameSession, MoveResolution};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn locked_session_json() -> String {
    let board = Board::from_rows([
        [2, 4, 2, 4],
        [4, 2, 4, 2],
        [8, 16, 8, 16],
        [32, 64, 128, 0],
    ]);
    let mut session = GameSession::new(board);
    session.score = board.sum();
    session.moves = 4;
    serde_json::to_string(&session).expect("session should serialize")
}

#[wasm_bindgen_test]
fn engine_starts_with_two_tiles() {
    let engine = GameEngine::with_seed(1, None).expect("engine should start");
    let tiles = engine.board().iter().filter(|tile| **tile != 0).count();
    assert_eq!(tiles, 2);
    assert_eq!(engine.score(), 0);
    assert!(!engine.won());
    assert!(!engine.game_over());
}

#[wasm_bindgen_test]
fn apply_move_reports_game_over() {
    let mut engine = GameEngine::with_seed(2, None).expect("engine should start");
    engine
        .set_state_json(&locked_session_json())
        .expect("state should import");

    let json = engine.apply_move("left").expect("move should resolve");
    let resolution: MoveResolution = serde_json::from_str(&json).expect("resolution json");
    assert!(!resolution.applied);

    let json = engine.apply_move("ArrowRight").expect("move should resolve");
    let resolution: MoveResolution = serde_json::from_str(&json).expect("resolution json");
    assert!(resolution.applied);
    assert!(engine.game_over());
    assert_eq!(engine.moves(), 5);
}

#[wasm_bindgen_test]
fn unknown_direction_is_rejected() {
    let mut engine = GameEngine::with_seed(3, None).expect("engine should start");
    assert!(engine.apply_move("diagonal").is_err());
}

#[wasm_bindgen_test]
fn invalid_state_import_is_rejected() {
    let mut engine = GameEngine::with_seed(4, None).expect("engine should start");
    let before = engine.state_json().expect("state json");
    let bad = r#"{"board":[[3,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]]}"#;
    assert!(engine.set_state_json(bad).is_err());
    assert_eq!(engine.state_json().expect("state json"), before);
}

#[wasm_bindgen_test]
fn merge_gain_config_is_accepted() {
    let config = Some(r#"{"scoring":"merge_gain","target":1024}"#.to_string());
    let engine = GameEngine::with_seed(5, config).expect("engine should start");
    assert_eq!(engine.score(), 0);
    assert!(GameEngine::new(Some("{\"target\":3}".into())).is_err());
}

#[wasm_bindgen_test]
fn scoring_can_be_switched_by_name() {
    let mut engine = GameEngine::with_seed(6, None).expect("engine should start");
    assert!(engine.set_scoring("cumulative").is_ok());
    assert!(engine.set_scoring("fancy").is_err());
}

#[wasm_bindgen_test]
fn engine_rejects_invalid_config_json() {
    assert!(GameEngine::with_seed(7, Some("{\"four_probability\":1.5}".into())).is_err());
    assert!(GameEngine::with_seed(7, Some("{\"initial_tiles\":0}".into())).is_err());
}

#[wasm_bindgen_test]
fn pure_exports_reject_malformed_boards() {
    let bad = serde_wasm_bindgen::to_value(&[[3u32, 0, 0, 0], [0; 4], [0; 4], [0; 4]])
        .expect("board should encode");
    assert!(tile_merge_core::has_moves(bad.clone()).is_err());
    assert!(tile_merge_core::slide_board(bad, "left").is_err());

    let huge = Board::empty().with_tile(0, 0, 1 << 31).with_tile(0, 1, 1 << 31);
    let huge = serde_wasm_bindgen::to_value(&huge).expect("board should encode");
    assert!(tile_merge_core::has_moves(huge).is_err());
}

#[wasm_bindgen_test]
fn free_functions_round_trip_through_js_values() {
    let session = tile_merge_core::new_session(None).expect("new session");
    let resolution = tile_merge_core::apply_move(session, "up", Some(9), None);
    let resolution: JsValue = resolution.expect("apply move");
    let resolution: MoveResolution =
        serde_wasm_bindgen::from_value(resolution).expect("resolution should decode");
    assert!(resolution.session.board.empty_count() >= 13);
}
