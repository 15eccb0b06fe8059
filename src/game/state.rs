use serde::{Deserialize, Serialize};

use super::board::{Board, Direction, SpawnedTile, Tile};
use super::config::ScoringMode;

/// 对局状态（供渲染层使用的派生视图）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Won,
    GameOver,
}

/// 移动未生效的原因。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IgnoreReason {
    NoChange,
    GameOver,
}

/// 游戏事件流。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    TileSpawned {
        tile: SpawnedTile,
    },
    MoveApplied {
        direction: Direction,
        merges: u8,
        gained: u32,
    },
    MoveIgnored {
        direction: Direction,
        reason: IgnoreReason,
    },
    TargetReached {
        target: Tile,
    },
    GameOver {
        score: u32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    InvalidTile { row: usize, col: usize, value: Tile },
    GameOverMismatch { expected: bool, actual: bool },
    ScoreMismatch { expected: u32, actual: u32 },
}

/// 一局游戏的完整状态。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSession {
    pub board: Board,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub won: bool,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub moves: u32,
}

impl GameSession {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            score: 0,
            won: false,
            game_over: false,
            moves: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn max_tile(&self) -> Tile {
        self.board.max_tile()
    }

    pub fn status(&self) -> GameStatus {
        if self.game_over {
            GameStatus::GameOver
        } else if self.won {
            GameStatus::Won
        } else {
            GameStatus::Active
        }
    }

    /// 校验从外部导入的状态。
    pub fn integrity_check(&self, scoring: ScoringMode) -> Result<(), IntegrityError> {
        self.board.integrity_check()?;

        let expected = !self.board.has_moves();
        if self.game_over != expected {
            return Err(IntegrityError::GameOverMismatch {
                expected,
                actual: self.game_over,
            });
        }

        // 新开局的分数为 0，之后才等于棋盘总和
        if scoring == ScoringMode::BoardSum && self.moves > 0 {
            let expected = self.board.sum();
            if self.score != expected {
                return Err(IntegrityError::ScoreMismatch {
                    expected,
                    actual: self.score,
                });
            }
        }

        Ok(())
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Board::empty())
    }
}
