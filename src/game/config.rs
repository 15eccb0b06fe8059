use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::board::{Tile, BOARD_SIZE};
use super::rules::RuleError;

const DEFAULT_TARGET: Tile = 2048;
const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;
const DEFAULT_INITIAL_TILES: u8 = 2;

/// 计分方式。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// 分数为移动后棋盘上所有数字之和。
    #[default]
    BoardSum,
    /// 分数累加每次合并得到的新数值。
    MergeGain,
}

impl FromStr for ScoringMode {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "board_sum" | "sum" | "snapshot" => Ok(ScoringMode::BoardSum),
            "merge_gain" | "merge" | "cumulative" => Ok(ScoringMode::MergeGain),
            _ => Err(RuleError::UnknownScoring {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub target: Tile,
    pub four_probability: f64,
    pub initial_tiles: u8,
    pub scoring: ScoringMode,
}

impl GameConfig {
    pub fn with_scoring(mut self, scoring: ScoringMode) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_target(mut self, target: Tile) -> Self {
        self.target = target;
        self
    }

    pub fn validate(&self) -> Result<(), RuleError> {
        if self.target < 4 || !self.target.is_power_of_two() {
            return Err(RuleError::InvalidConfig {
                reason: format!("target {} must be a power of two >= 4", self.target),
            });
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(RuleError::InvalidConfig {
                reason: format!(
                    "four_probability {} must lie in [0, 1]",
                    self.four_probability
                ),
            });
        }
        let cells = BOARD_SIZE * BOARD_SIZE;
        if self.initial_tiles < 2 || usize::from(self.initial_tiles) > cells {
            return Err(RuleError::InvalidConfig {
                reason: format!(
                    "initial_tiles {} must lie in [2, {cells}]",
                    self.initial_tiles
                ),
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|error| RuleError::InvalidConfig {
                reason: error.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            four_probability: DEFAULT_FOUR_PROBABILITY,
            initial_tiles: DEFAULT_INITIAL_TILES,
            scoring: ScoringMode::default(),
        }
    }
}
