//! Septic Surfer - an endless-runner mini-game for a Telegram mini-app
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `persistence`: Best-score storage with silent fallback
//! - `platform`: Browser/native platform abstraction
//! - `audio`, `telegram`: Fire-and-forget collaborators fed by core events
//! - `messages`, `rewards`, `settings`: Game-over lessons, reward tiers, preferences
//! - `web`: wasm-bindgen handle the page drives (wasm only)

pub mod audio;
pub mod messages;
pub mod persistence;
pub mod platform;
pub mod rewards;
pub mod settings;
pub mod sim;
pub mod telegram;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use rewards::Rewards;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame interval the per-frame tuning values are expressed against (60 fps)
    pub const TARGET_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Longest frame the simulation will integrate in one tick
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Height of the ground strip at the bottom of the viewport
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Player spawn box
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_COLOR: u32 = 0x00A8FF;

    /// Full jump budget (ground jump + one double jump)
    pub const MAX_JUMPS: u8 = 2;

    /// Spawn offsets past the right edge of the viewport
    pub const OBSTACLE_SPAWN_MARGIN: f32 = 20.0;
    pub const BONUS_SPAWN_MARGIN: f32 = 80.0;

    pub const BONUS_SIZE: f32 = 25.0;
    pub const PLATFORM_THICKNESS: f32 = 16.0;

    /// Particle burst emitted when a bonus is collected
    pub const BONUS_PARTICLES: usize = 5;
    pub const PARTICLE_LIFE: f32 = 30.0;
    pub const MAX_PARTICLES: usize = 256;

    /// Distance (m) below which the controls hint stays visible
    pub const CONTROLS_HINT_DISTANCE: f32 = 100.0;
}
