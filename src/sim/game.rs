//! Game lifecycle host
//!
//! Owns the current session (if any), turns wall-clock frame deltas into
//! fixed simulation ticks, buffers player input between frames, and reports
//! phase transitions. Game over is a flag raised inside a tick and picked up
//! here at the start of the next advance.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::ArenaBounds;
use super::snapshot::Snapshot;
use super::state::{Difficulty, DifficultyChange, Session};
use super::tick::{TickInput, tick};
use crate::consts::{MAX_FRAME_DELTA_MS, MAX_SUBSTEPS, SIM_DT_MS};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Game phase state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start; no session exists
    Idle,
    /// Active gameplay
    Running,
    /// Round ended, score frozen
    GameOver,
}

/// Phase transitions reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    GameOver { score: u64 },
    Restarted,
}

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Game {
    phase: GamePhase,
    session: Option<Session>,
    difficulty: Difficulty,
    bounds: ArenaBounds,
    tuning: Tuning,
    /// Draws one seed per session
    seeder: Pcg32,
    accumulator_ms: f32,
    input: TickInput,
    /// Score of the last finished round
    last_score: u64,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!(
            "New game: arena {}x{}, seed {}",
            settings.arena_width,
            settings.arena_height,
            seed
        );

        Self {
            phase: GamePhase::Idle,
            session: None,
            difficulty: Difficulty::new(settings.difficulty),
            bounds: ArenaBounds::new(settings.arena_width, settings.arena_height),
            tuning: settings.tuning,
            seeder: Pcg32::seed_from_u64(seed),
            accumulator_ms: 0.0,
            input: TickInput {
                paddle_target_x: None,
                idle_mode: settings.autopilot,
            },
            last_score: 0,
        }
    }

    /// Begin the first round (Idle only)
    pub fn start(&mut self) -> Option<GameEvent> {
        if self.phase != GamePhase::Idle {
            log::debug!("Ignoring start in {:?}", self.phase);
            return None;
        }
        self.begin_session();
        Some(GameEvent::Started)
    }

    /// Replace the ended round with a fresh one (GameOver only)
    pub fn restart(&mut self) -> Option<GameEvent> {
        if self.phase != GamePhase::GameOver {
            log::debug!("Ignoring restart in {:?}", self.phase);
            return None;
        }
        self.begin_session();
        Some(GameEvent::Restarted)
    }

    fn begin_session(&mut self) {
        let seed: u64 = self.seeder.random();
        // Whole-session replacement; nothing from the old round survives
        self.session = Some(Session::new(
            self.bounds,
            self.difficulty,
            self.tuning.clone(),
            seed,
        ));
        self.phase = GamePhase::Running;
        self.accumulator_ms = 0.0;
        self.input.paddle_target_x = None;
        log::info!(
            "Session started (difficulty {}, seed {})",
            self.difficulty.level(),
            seed
        );
    }

    /// Buffer the latest pointer x; applied on the next tick
    pub fn pointer_moved(&mut self, x: f32) {
        self.input.paddle_target_x = Some(x);
    }

    /// Step difficulty; applies to the live session immediately and carries
    /// over to later rounds
    pub fn change_difficulty(&mut self, change: DifficultyChange) -> Difficulty {
        self.difficulty = self.difficulty.adjusted(change);
        if let Some(session) = &mut self.session {
            session.set_difficulty(self.difficulty);
        }
        log::info!("Difficulty now {}", self.difficulty.level());
        self.difficulty
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.idle_mode = enabled;
    }

    /// Run as many fixed ticks as the elapsed wall-clock time allows
    pub fn advance(&mut self, frame_delta_ms: f32) -> Option<GameEvent> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let session = self.session.as_mut()?;

        if session.status.over {
            let score = session.status.score;
            self.phase = GamePhase::GameOver;
            self.last_score = score;
            self.accumulator_ms = 0.0;
            log::info!("Game over after {} ticks, score {}", session.time_ticks, score);
            return Some(GameEvent::GameOver { score });
        }

        let delta = if frame_delta_ms.is_finite() {
            frame_delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS)
        } else {
            0.0
        };
        self.accumulator_ms += delta;

        let mut substeps = 0;
        while self.accumulator_ms >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            tick(session, &self.input);
            self.accumulator_ms -= SIM_DT_MS;
            substeps += 1;

            if session.status.over {
                break;
            }
        }

        None
    }

    pub fn snapshot(&self) -> Snapshot {
        match &self.session {
            Some(session) => Snapshot::capture(session, self.difficulty),
            None => Snapshot::empty(self.difficulty),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Live score while running, final score after game over
    pub fn score(&self) -> u64 {
        match (&self.session, self.phase) {
            (Some(session), GamePhase::Running) => session.status.score,
            _ => self.last_score,
        }
    }
}
