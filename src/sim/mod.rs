//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, tuning and input
//! sequence, a run plays out identically:
//! - Variable frame deltas, scaled against a 60 fps reference
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod entities;
pub mod factory;
pub mod geometry;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::wants_jump;
pub use entities::{
    Bonus, BonusKind, Obstacle, ObstacleKind, Oscillation, Particle, Pit, Platform,
    PlatformMaterial, Player, Viewport, World,
};
pub use factory::{spawn_bonus, spawn_obstacle, spawn_pit, spawn_platform};
pub use geometry::{Rect, intersects, intersects_with_padding};
pub use spawner::{SpawnReport, run_spawner};
pub use state::{
    GameEvent, GamePhase, GameState, Session, Snapshot, combo_multiplier, level_for,
    speed_for_level,
};
pub use tick::{Progress, SimEvent, TickInput, TickOutput, delta_multiplier, tick};
