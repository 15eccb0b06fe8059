//! 游戏核心逻辑模块（单行合并、棋盘变换、规则引擎）。

pub mod board;
pub mod config;
pub mod row;
pub mod rules;
pub mod state;

pub use board::{Board, Direction, MoveOutcome, SpawnedTile, Tile, BOARD_SIZE, MAX_TILE};
pub use config::{GameConfig, ScoringMode};
pub use row::{slide_row_left, slide_row_right, Row, RowSlide};
pub use rules::{MoveResolution, RuleEngine, RuleError};
pub use state::{GameEvent, GameSession, GameStatus, IgnoreReason, IntegrityError};
