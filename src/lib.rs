#[macro_use]
pub mod utils;
pub mod game;

use serde_wasm_bindgen::{from_value, to_value};
use std::str::FromStr;
use wasm_bindgen::prelude::*;

pub use game::{
    slide_row_left, slide_row_right, Board, Direction, GameConfig, GameEvent, GameSession,
    GameStatus, IgnoreReason, IntegrityError, MoveOutcome, MoveResolution, Row, RowSlide,
    RuleEngine, RuleError, ScoringMode, SpawnedTile, Tile, BOARD_SIZE,
    MAX_TILE,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn to_js_error(error: RuleError) -> JsValue {
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_config(config_json: Option<String>) -> Result<GameConfig, JsValue> {
    match config_json {
        Some(json) => GameConfig::from_json(&json).map_err(to_js_error),
        None => Ok(GameConfig::default()),
    }
}

fn parse_direction(direction: &str) -> Result<Direction, JsValue> {
    Direction::from_str(direction).map_err(to_js_error)
}

fn check_board(board: &Board) -> Result<(), JsValue> {
    board
        .integrity_check()
        .map_err(|error| to_js_error(RuleError::IntegrityViolation { error }))
}

fn log_resolution(resolution: &MoveResolution) {
    for event in &resolution.events {
        match event {
            GameEvent::TargetReached { target } => {
                console_log!("reached {target} after {} moves", resolution.session.moves);
            }
            GameEvent::GameOver { score } => {
                console_log!("game over: score {score}, max tile {}", resolution.session.max_tile());
            }
            _ => {}
        }
    }
}

/// 前端持有的游戏实例：规则引擎加当前对局。
#[wasm_bindgen]
pub struct GameEngine {
    engine: RuleEngine,
    session: GameSession,
}

impl GameEngine {
    fn start_with(mut engine: RuleEngine) -> GameEngine {
        let session = engine.new_session();
        console_log!("new session, target {}", engine.config().target);
        GameEngine { engine, session }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<GameEngine, JsValue> {
        let config = parse_config(config_json)?;
        let engine = RuleEngine::new(config).map_err(to_js_error)?;
        Ok(Self::start_with(engine))
    }

    /// 固定种子，便于回放与测试。
    #[wasm_bindgen(js_name = "withSeed")]
    pub fn with_seed(seed: u64, config_json: Option<String>) -> Result<GameEngine, JsValue> {
        let config = parse_config(config_json)?;
        let engine = RuleEngine::with_seed(config, seed).map_err(to_js_error)?;
        Ok(Self::start_with(engine))
    }

    /// 切换计分方式（`board_sum` / `merge_gain` 及其别名）。
    pub fn set_scoring(&mut self, scoring: &str) -> Result<(), JsValue> {
        let scoring = ScoringMode::from_str(scoring).map_err(to_js_error)?;
        self.engine.set_scoring(scoring);
        Ok(())
    }

    pub fn reset(&mut self) -> Result<String, JsValue> {
        self.session = self.engine.new_session();
        self.state_json()
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let session: GameSession = serde_json::from_str(json).map_err(serde_to_js_error)?;
        if let Err(error) = self.engine.validate_session(&session) {
            utils::warn(&format!("rejected imported session: {error:?}"));
            return Err(to_js_error(error));
        }
        self.session = session;
        Ok(())
    }

    /// 返回 `MoveResolution` 的 JSON；无效移动时 `applied` 为 false。
    pub fn apply_move(&mut self, direction: &str) -> Result<String, JsValue> {
        let direction = parse_direction(direction)?;
        let resolution = self.engine.apply_move(&self.session, direction);
        log_resolution(&resolution);
        self.session = resolution.session.clone();
        serde_json::to_string(&resolution).map_err(serde_to_js_error)
    }

    pub fn board(&self) -> Vec<u32> {
        self.session.board.to_vec()
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn won(&self) -> bool {
        self.session.won
    }

    pub fn game_over(&self) -> bool {
        self.session.game_over
    }

    pub fn moves(&self) -> u32 {
        self.session.moves
    }

    pub fn max_tile(&self) -> u32 {
        self.session.max_tile()
    }
}

/// 创建新对局（两枚初始方块，分数 0）。
#[wasm_bindgen(js_name = "newSession")]
pub fn new_session(config_json: Option<String>) -> Result<JsValue, JsValue> {
    let mut engine = RuleEngine::new(parse_config(config_json)?).map_err(to_js_error)?;
    to_value(&engine.new_session()).map_err(JsValue::from)
}

/// 对传入的对局执行一次移动，返回结算结果。
#[wasm_bindgen(js_name = "applyMove")]
pub fn apply_move(
    session: JsValue,
    direction: &str,
    seed: Option<u64>,
    config_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let session: GameSession = from_value(session).map_err(JsValue::from)?;
    let direction = parse_direction(direction)?;
    let config = parse_config(config_json)?;
    let mut engine = match seed {
        Some(seed) => RuleEngine::with_seed(config, seed),
        None => RuleEngine::new(config),
    }
    .map_err(to_js_error)?;
    engine.validate_session(&session).map_err(to_js_error)?;
    let resolution = engine.apply_move(&session, direction);
    log_resolution(&resolution);
    to_value(&resolution).map_err(JsValue::from)
}

/// 仅做滑动合并，不生成新方块。
#[wasm_bindgen(js_name = "slideBoard")]
pub fn slide_board(board: JsValue, direction: &str) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    check_board(&board)?;
    let direction = parse_direction(direction)?;
    to_value(&board.slide(direction)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "hasMoves")]
pub fn has_moves(board: JsValue) -> Result<bool, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    check_board(&board)?;
    Ok(board.has_moves())
}

#[wasm_bindgen(js_name = "validateSession")]
pub fn validate_session(session: JsValue, config_json: Option<String>) -> Result<(), JsValue> {
    let session: GameSession = from_value(session).map_err(JsValue::from)?;
    let config = parse_config(config_json)?;
    session
        .integrity_check(config.scoring)
        .map_err(|error| to_js_error(RuleError::IntegrityViolation { error }))
}
