use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::row::{slide_row_left, slide_row_right, Row, RowSlide};
use super::rules::RuleError;
use super::state::IntegrityError;

/// 棋盘边长。
pub const BOARD_SIZE: usize = 4;

/// 格子数值，0 表示空格，其余为 2 的幂。
pub type Tile = u32;

/// 4x4 棋盘能合成的最大数值。
pub const MAX_TILE: Tile = 1 << 17;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "u" => Ok(Direction::Up),
            "down" | "arrowdown" | "d" => Ok(Direction::Down),
            "left" | "arrowleft" | "l" => Ok(Direction::Left),
            "right" | "arrowright" | "r" => Ok(Direction::Right),
            _ => Err(RuleError::UnknownDirection {
                value: s.to_string(),
            }),
        }
    }
}

/// 一次滑动的结果（不含新生成的方块）。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub changed: bool,
    pub merges: u8,
    pub gained: u32,
}

/// 新生成的方块。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpawnedTile {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

/// 不可变的 4x4 棋盘，每次操作返回新值。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct Board(pub [Row; BOARD_SIZE]);

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: [Row; BOARD_SIZE]) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[Row; BOARD_SIZE] {
        &self.0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.0.get(row).and_then(|cells| cells.get(col)).copied()
    }

    pub fn with_tile(mut self, row: usize, col: usize, value: Tile) -> Self {
        self.0[row][col] = value;
        self
    }

    /// 按行展开，供前端渲染。
    pub fn to_vec(&self) -> Vec<Tile> {
        self.0.iter().flatten().copied().collect()
    }

    pub fn transpose(&self) -> Self {
        let mut out = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.0[j][i];
            }
        }
        Self(out)
    }

    pub fn reverse_rows(&self) -> Self {
        let mut out = self.0;
        for row in &mut out {
            row.reverse();
        }
        Self(out)
    }

    fn slide_rows(&self, reduce: fn(&Row) -> RowSlide) -> MoveOutcome {
        let mut rows = [[0; BOARD_SIZE]; BOARD_SIZE];
        let mut changed = false;
        let mut merges = 0;
        let mut gained = 0;
        for (target, source) in rows.iter_mut().zip(self.0.iter()) {
            let slide = reduce(source);
            *target = slide.row;
            changed |= slide.changed;
            merges += slide.merges;
            gained += slide.gained;
        }
        MoveOutcome {
            board: Self(rows),
            changed,
            merges,
            gained,
        }
    }

    pub fn slide_left(&self) -> MoveOutcome {
        self.slide_rows(slide_row_left)
    }

    pub fn slide_right(&self) -> MoveOutcome {
        self.slide_rows(slide_row_right)
    }

    pub fn slide_up(&self) -> MoveOutcome {
        let mut outcome = self.transpose().slide_left();
        outcome.board = outcome.board.transpose();
        outcome
    }

    pub fn slide_down(&self) -> MoveOutcome {
        let mut outcome = self.transpose().slide_right();
        outcome.board = outcome.board.transpose();
        outcome
    }

    pub fn slide(&self, direction: Direction) -> MoveOutcome {
        match direction {
            Direction::Up => self.slide_up(),
            Direction::Down => self.slide_down(),
            Direction::Left => self.slide_left(),
            Direction::Right => self.slide_right(),
        }
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (r, row) in self.0.iter().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                if *tile == 0 {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    pub fn empty_count(&self) -> usize {
        self.0.iter().flatten().filter(|tile| **tile == 0).count()
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().flatten().sum()
    }

    pub fn max_tile(&self) -> Tile {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// 直接扫描棋盘：存在空格或横/竖相邻相等的格子即可继续移动。
    pub fn has_moves(&self) -> bool {
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                let tile = self.0[r][c];
                if tile == 0 {
                    return true;
                }
                if c + 1 < BOARD_SIZE && self.0[r][c + 1] == tile {
                    return true;
                }
                if r + 1 < BOARD_SIZE && self.0[r + 1][c] == tile {
                    return true;
                }
            }
        }
        false
    }

    /// 在随机空格放置 2 或 4；没有空格时原样返回。
    pub fn spawn_tile<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        four_probability: f64,
    ) -> (Board, Option<SpawnedTile>) {
        let empty = self.empty_cells();
        let Some(&(row, col)) = empty.choose(rng) else {
            return (*self, None);
        };
        let value = if rng.gen_bool(four_probability) { 4 } else { 2 };
        let spawned = SpawnedTile { row, col, value };
        (self.with_tile(row, col, value), Some(spawned))
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        for (row, cells) in self.0.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if value != 0 && (value == 1 || !value.is_power_of_two() || value > MAX_TILE) {
                    return Err(IntegrityError::InvalidTile { row, col, value });
                }
            }
        }
        Ok(())
    }
}
