//! Game session state machine
//!
//! Owns the world, the run counters and the phase. The per-frame `tick`
//! does physics; everything that touches score, combo, best score or the
//! host (storage, Telegram) happens here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::autopilot::wants_jump;
use super::entities::{Bonus, BonusKind, Obstacle, ObstacleKind, Pit, Viewport, World};
use super::tick::{Progress, SimEvent, TickInput, tick};
use crate::consts::CONTROLS_HINT_DISTANCE;
use crate::messages::{self, EducationalMessage};
use crate::persistence::{self, Storage};
use crate::rewards::{Reward, Rewards};
use crate::telegram::{Notifier, ResultPayload};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Title screen, nothing moves
    Start,
    Playing,
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Run counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    /// Meters run
    pub distance: f32,
    pub level: u32,
    /// Bonuses collected in quick succession
    pub combo: u32,
    /// World scroll speed (px/frame)
    pub game_speed: f32,
    pub best_score: u64,
}

impl GameState {
    pub fn new(best_score: u64, tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Start,
            score: 0,
            distance: 0.0,
            level: 1,
            combo: 0,
            game_speed: speed_for_level(1, tuning),
            best_score,
        }
    }

    fn progress(&self) -> Progress {
        Progress {
            distance: self.distance,
            level: self.level,
            game_speed: self.game_speed,
        }
    }
}

/// Level implied by distance and score (whichever is further along)
pub fn level_for(distance: f32, score: u64, tuning: &Tuning) -> u32 {
    let by_distance = (distance.max(0.0) / tuning.level_distance).floor() as u32 + 1;
    let by_score = (score / tuning.level_score.max(1)) as u32 + 1;
    by_distance.max(by_score)
}

/// Scroll speed for a level, capped
pub fn speed_for_level(level: u32, tuning: &Tuning) -> f32 {
    let ramp = level.saturating_sub(1) as f32 * tuning.speed_ramp;
    (tuning.base_speed + ramp).min(tuning.speed_cap)
}

/// Score multiplier for the current combo
pub fn combo_multiplier(combo: u32, tuning: &Tuning) -> u32 {
    combo.clamp(1, tuning.combo_multiplier_cap.max(1))
}

/// Something the presentation layer may react to (sound, popups)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Jumped,
    DoubleJumped,
    BonusCollected { kind: BonusKind, points: u64 },
    ObstacleHit { kind: ObstacleKind },
    PitFall,
    Combo { count: u32 },
    LevelUp { level: u32 },
    #[serde(rename_all = "camelCase")]
    GameOver {
        score: u64,
        distance: f32,
        best_score: u64,
        new_best: bool,
        unlocked: Vec<Reward>,
    },
}

/// Read-only view handed to the renderer/UI each frame
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub state: &'a GameState,
    pub world: &'a World,
    pub combo_visible: bool,
    pub multiplier: u32,
    pub show_controls_hint: bool,
    pub message: Option<&'a EducationalMessage>,
}

/// One player's game: world, counters, phase and host hooks
pub struct Session {
    state: GameState,
    world: World,
    tuning: Tuning,
    rng: Pcg32,
    storage: Box<dyn Storage>,
    notifier: Box<dyn Notifier>,
    /// Set by input, consumed by the next advance
    jump_requested: bool,
    combo_shown_at: Option<f64>,
    last_bonus_at: Option<f64>,
    message: Option<&'static EducationalMessage>,
    /// Let the autopilot jump
    autopilot: bool,
    /// Clock of the latest advance (ms)
    now_ms: f64,
}

impl Session {
    pub fn new(
        seed: u64,
        view: Viewport,
        tuning: Tuning,
        storage: Box<dyn Storage>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let best_score = persistence::load_best_score(storage.as_ref());
        log::info!("Session created (seed {seed}, best {best_score})");
        Self {
            state: GameState::new(best_score, &tuning),
            world: World::new(view),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            storage,
            notifier,
            jump_requested: false,
            combo_shown_at: None,
            last_bonus_at: None,
            message: None,
            autopilot: false,
            now_ms: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Educational message from the last crash, if any
    pub fn message(&self) -> Option<&'static EducationalMessage> {
        self.message
    }

    /// Clear the world and counters and start playing; best score is kept
    pub fn reset(&mut self) {
        let best_score = self.state.best_score;
        self.state = GameState::new(best_score, &self.tuning);
        self.state.phase = GamePhase::Playing;
        self.world = World::new(self.world.view);
        self.jump_requested = false;
        self.combo_shown_at = None;
        self.last_bonus_at = None;
        self.message = None;
        log::info!("Run started");
    }

    /// Leave the title screen
    pub fn start(&mut self) {
        self.reset();
    }

    /// New run after game over
    pub fn restart(&mut self) {
        self.reset();
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
            self.jump_requested = false;
            log::debug!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
            log::debug!("Resumed");
        }
    }

    /// Queue a jump for the next frame (ignored outside play)
    pub fn request_jump(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.jump_requested = true;
        }
    }

    /// Idle/demo mode: jumps are decided by the autopilot as well as input
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// New canvas size; entities keep their positions
    pub fn resize(&mut self, view: Viewport) {
        if !view.is_valid() {
            log::warn!("Ignoring invalid viewport {}x{}", view.width, view.height);
            return;
        }
        let ground_shift = view.ground_y() - self.world.view.ground_y();
        self.world.view = view;
        if self.world.player.grounded && !self.world.player.on_platform {
            self.world.player.bounds.y += ground_shift;
        }
    }

    /// Run one frame; does nothing unless playing
    pub fn advance(&mut self, now_ms: f64, delta_ms: f32) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            return Vec::new();
        }
        self.now_ms = now_ms;
        self.update_combo_timers(now_ms);

        let requested = std::mem::take(&mut self.jump_requested);
        let input = TickInput {
            jump: requested
                || (self.autopilot
                    && wants_jump(&self.world, self.state.progress(), &self.tuning)),
            delta_ms,
        };
        let view = self.world.view;
        let world = std::mem::replace(&mut self.world, World::new(view));
        let out = tick(
            world,
            self.state.progress(),
            self.state.score,
            input,
            &self.tuning,
            &mut self.rng,
        );
        self.world = out.world;
        self.state.distance = out.progress.distance;
        self.state.level = out.progress.level;
        self.state.game_speed = out.progress.game_speed;

        let mut events = Vec::new();
        for event in out.events {
            if self.state.phase != GamePhase::Playing {
                break;
            }
            match event {
                SimEvent::Jumped => events.push(GameEvent::Jumped),
                SimEvent::DoubleJumped => events.push(GameEvent::DoubleJumped),
                SimEvent::LevelUp(level) => {
                    log::info!("Level {level}");
                    events.push(GameEvent::LevelUp { level });
                }
                SimEvent::BonusCollected(bonus) => {
                    events.extend(self.on_bonus_collected(&bonus, now_ms));
                }
                SimEvent::ObstacleHit(obstacle) => events.extend(self.on_obstacle_hit(&obstacle)),
                SimEvent::PitFall(pit) => events.extend(self.on_pit_fall(&pit)),
            }
        }
        events
    }

    /// Score a bonus, grow the combo, re-derive the level
    pub fn on_bonus_collected(&mut self, bonus: &Bonus, now_ms: f64) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            return Vec::new();
        }
        let mut events = Vec::new();
        self.state.combo += 1;
        let points = bonus.value as u64 * combo_multiplier(self.state.combo, &self.tuning) as u64;
        self.state.score += points;
        self.last_bonus_at = Some(now_ms);
        events.push(GameEvent::BonusCollected {
            kind: bonus.kind,
            points,
        });

        if self.state.combo > 1 {
            self.combo_shown_at = Some(now_ms);
            events.push(GameEvent::Combo {
                count: self.state.combo,
            });
        }

        let level = level_for(self.state.distance, self.state.score, &self.tuning);
        if level > self.state.level {
            self.state.level = level;
            self.state.game_speed = speed_for_level(level, &self.tuning);
            log::info!("Level {level}");
            events.push(GameEvent::LevelUp { level });
        }
        events
    }

    /// Crash into an obstacle: show its lesson and end the run
    pub fn on_obstacle_hit(&mut self, obstacle: &Obstacle) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            return Vec::new();
        }
        self.message = Some(messages::for_obstacle(obstacle.kind));
        let mut events = vec![GameEvent::ObstacleHit {
            kind: obstacle.kind,
        }];
        events.extend(self.on_game_over());
        events
    }

    pub fn on_pit_fall(&mut self, pit: &Pit) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            return Vec::new();
        }
        log::debug!("Pit fall at x={:.0}", pit.bounds.x);
        self.message = Some(&messages::PIT_FALL);
        let mut events = vec![GameEvent::PitFall];
        events.extend(self.on_game_over());
        events
    }

    /// Finish the run: update and persist the best score, report the result.
    /// Only a run in play can end; otherwise nothing happens.
    pub fn on_game_over(&mut self) -> Option<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            return None;
        }
        let previous_best = self.state.best_score;
        let score = self.state.score;
        let new_best = score > previous_best;
        if new_best {
            self.state.best_score = score;
            persistence::save_best_score(self.storage.as_mut(), score);
        }
        self.state.phase = GamePhase::GameOver;
        self.jump_requested = false;

        let payload = ResultPayload::new(score, self.state.distance, self.now_ms);
        self.notifier.send_result(&payload);
        log::info!(
            "Game over: score {score}, {:.0} m, level {}",
            self.state.distance,
            self.state.level
        );

        Some(GameEvent::GameOver {
            score,
            distance: self.state.distance,
            best_score: self.state.best_score,
            new_best,
            unlocked: Rewards::newly_unlocked(previous_best, score),
        })
    }

    /// Hide the combo banner and drop a stale combo
    fn update_combo_timers(&mut self, now_ms: f64) {
        if let Some(shown) = self.combo_shown_at {
            if now_ms - shown >= self.tuning.combo_display_ms {
                self.combo_shown_at = None;
            }
        }
        if let Some(last) = self.last_bonus_at {
            if now_ms - last >= self.tuning.combo_reset_ms {
                self.state.combo = 0;
                self.last_bonus_at = None;
            }
        }
    }

    pub fn combo_visible(&self) -> bool {
        self.combo_shown_at.is_some()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: &self.state,
            world: &self.world,
            combo_visible: self.combo_visible(),
            multiplier: combo_multiplier(self.state.combo, &self.tuning),
            show_controls_hint: self.state.phase == GamePhase::Playing
                && self.state.distance < CONTROLS_HINT_DISTANCE,
            message: self.message,
        }
    }

    /// Wall clock of the latest frame (Unix ms); stamps the result payload
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}
