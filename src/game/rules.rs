use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Direction},
    config::{GameConfig, ScoringMode},
    state::{GameEvent, GameSession, GameStatus, IgnoreReason, IntegrityError},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    UnknownDirection { value: String },
    UnknownScoring { value: String },
    InvalidConfig { reason: String },
    IntegrityViolation { error: IntegrityError },
}

/// 一次移动的结算结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResolution {
    pub session: GameSession,
    pub events: Vec<GameEvent>,
    pub applied: bool,
    pub status: GameStatus,
}

impl MoveResolution {
    fn new(session: GameSession, events: Vec<GameEvent>, applied: bool) -> Self {
        let status = session.status();
        Self {
            session,
            events,
            applied,
            status,
        }
    }

    fn ignored(session: &GameSession, direction: Direction, reason: IgnoreReason) -> Self {
        Self::new(
            session.clone(),
            vec![GameEvent::MoveIgnored { direction, reason }],
            false,
        )
    }
}

/// 规则引擎：持有配置与随机数源，负责开局和结算移动。
pub struct RuleEngine {
    config: GameConfig,
    rng: SmallRng,
}

impl RuleEngine {
    pub fn new(config: GameConfig) -> Result<Self, RuleError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: SmallRng::from_entropy(),
        })
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, RuleError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// 切换计分方式，已有分数保留。
    pub fn set_scoring(&mut self, scoring: ScoringMode) {
        self.config.scoring = scoring;
    }

    fn ensure_integrity(&self, session: &GameSession) -> Result<(), RuleError> {
        session
            .integrity_check(self.config.scoring)
            .map_err(|error| RuleError::IntegrityViolation { error })
    }

    /// 校验外部传入的对局。
    pub fn validate_session(&self, session: &GameSession) -> Result<(), RuleError> {
        self.ensure_integrity(session)
    }

    /// 空棋盘上生成初始方块，分数为 0。
    pub fn new_session(&mut self) -> GameSession {
        let mut board = Board::empty();
        for _ in 0..self.config.initial_tiles {
            let (next, _) = board.spawn_tile(&mut self.rng, self.config.four_probability);
            board = next;
        }
        GameSession::new(board)
    }

    /// 结算一次移动。对局结束或棋盘不变时原样返回，不生成方块也不计步。
    pub fn apply_move(&mut self, session: &GameSession, direction: Direction) -> MoveResolution {
        if session.game_over {
            return MoveResolution::ignored(session, direction, IgnoreReason::GameOver);
        }

        let outcome = session.board.slide(direction);
        if !outcome.changed {
            return MoveResolution::ignored(session, direction, IgnoreReason::NoChange);
        }

        let mut events = vec![GameEvent::MoveApplied {
            direction,
            merges: outcome.merges,
            gained: outcome.gained,
        }];

        let (board, spawned) = outcome
            .board
            .spawn_tile(&mut self.rng, self.config.four_probability);
        if let Some(tile) = spawned {
            events.push(GameEvent::TileSpawned { tile });
        }

        let score = match self.config.scoring {
            ScoringMode::BoardSum => board.sum(),
            ScoringMode::MergeGain => session.score.saturating_add(outcome.gained),
        };

        let reached = board.max_tile() >= self.config.target;
        if reached && !session.won {
            events.push(GameEvent::TargetReached {
                target: self.config.target,
            });
        }

        let game_over = !board.has_moves();
        if game_over {
            events.push(GameEvent::GameOver { score });
        }

        let next = GameSession {
            board,
            score,
            won: session.won || reached,
            game_over,
            moves: session.moves + 1,
        };
        MoveResolution::new(next, events, true)
    }

    /// 同 `apply_move`，但直接替换传入的对局。
    pub fn apply_move_in_place(
        &mut self,
        session: &mut GameSession,
        direction: Direction,
    ) -> Vec<GameEvent> {
        let resolution = self.apply_move(session, direction);
        *session = resolution.session;
        resolution.events
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            rng: SmallRng::from_entropy(),
        }
    }
}
