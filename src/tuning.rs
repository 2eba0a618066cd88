//! Data-driven game balance
//!
//! Every game-feel number the simulation uses lives here so it can be
//! adjusted from a JSON document without touching the tick. Values are
//! expressed per target frame (see `consts::TARGET_FRAME_MS`).

use serde::{Deserialize, Serialize};

/// Tunable physics, difficulty and spawn parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player physics ===
    /// Downward acceleration (px/frame²)
    pub gravity: f32,
    /// Vertical impulse of the ground/platform jump (negative = up)
    pub first_jump_impulse: f32,
    /// Vertical impulse of the airborne double jump
    pub double_jump_impulse: f32,
    /// How far below a platform top the feet may be and still land
    pub platform_land_tolerance: f32,

    // === Progress ===
    pub base_speed: f32,
    pub speed_ramp: f32,
    pub speed_cap: f32,
    /// Meters per scroll unit
    pub distance_scale: f32,
    /// Meters per level
    pub level_distance: f32,
    /// Points per level
    pub level_score: u64,

    // === Collision ===
    /// Fraction of an obstacle's size shaved off before testing hits
    pub obstacle_padding: f32,

    // === Spawning ===
    pub obstacle_chance_base: f32,
    pub obstacle_chance_per_level: f32,
    pub obstacle_chance_cap: f32,
    pub obstacle_cap_base: usize,
    pub obstacle_cap_max: usize,
    pub bonus_chance_base: f32,
    pub bonus_chance_per_level: f32,
    pub bonus_chance_floor: f32,
    pub max_bonuses: usize,
    pub pit_chance: f32,
    pub pit_min_level: u32,
    pub max_pits: usize,
    pub platform_chance: f32,
    pub max_platforms: usize,
    /// Below this many obstacles+bonuses one is forced in
    pub min_active: usize,
    /// Share of forced spawns that are obstacles
    pub forced_obstacle_share: f32,
    /// Minimum horizontal gap between any two entities (px)
    pub min_spawn_spacing: f32,
    pub oscillation_chance: f32,

    // === Combo ===
    pub combo_display_ms: f64,
    pub combo_reset_ms: f64,
    pub combo_multiplier_cap: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            first_jump_impulse: -15.0,
            double_jump_impulse: -12.0,
            platform_land_tolerance: 10.0,

            base_speed: 2.0,
            speed_ramp: 0.5,
            speed_cap: 8.0,
            distance_scale: 0.1,
            level_distance: 50.0,
            level_score: 200,

            obstacle_padding: 0.25,

            obstacle_chance_base: 0.010,
            obstacle_chance_per_level: 0.003,
            obstacle_chance_cap: 0.035,
            obstacle_cap_base: 2,
            obstacle_cap_max: 5,
            bonus_chance_base: 0.015,
            bonus_chance_per_level: 0.001,
            bonus_chance_floor: 0.005,
            max_bonuses: 2,
            pit_chance: 0.003,
            pit_min_level: 2,
            max_pits: 1,
            platform_chance: 0.004,
            max_platforms: 2,
            min_active: 2,
            forced_obstacle_share: 0.7,
            min_spawn_spacing: 180.0,
            oscillation_chance: 0.3,

            combo_display_ms: 2000.0,
            combo_reset_ms: 3000.0,
            combo_multiplier_cap: 4,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document over the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::validated)
    }

    /// Parse tuning JSON, falling back to defaults if it is unparseable
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Failed to parse tuning: {e}, using defaults");
                Self::default()
            }
        }
    }

    /// Clamp values that would break the simulation
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !(self.gravity > 0.0) {
            self.gravity = defaults.gravity;
        }
        // Impulses must point up
        if !(self.first_jump_impulse < 0.0) {
            self.first_jump_impulse = defaults.first_jump_impulse;
        }
        if !(self.double_jump_impulse < 0.0) {
            self.double_jump_impulse = defaults.double_jump_impulse;
        }
        self.platform_land_tolerance = self.platform_land_tolerance.max(0.0);

        self.base_speed = self.base_speed.max(0.0);
        self.speed_ramp = self.speed_ramp.max(0.0);
        self.speed_cap = self.speed_cap.max(self.base_speed);
        self.distance_scale = self.distance_scale.max(0.0);
        if !(self.level_distance > 0.0) {
            self.level_distance = defaults.level_distance;
        }
        self.level_score = self.level_score.max(1);

        self.obstacle_padding = self.obstacle_padding.clamp(0.0, 0.95);

        for p in [
            &mut self.obstacle_chance_base,
            &mut self.obstacle_chance_per_level,
            &mut self.obstacle_chance_cap,
            &mut self.bonus_chance_base,
            &mut self.bonus_chance_per_level,
            &mut self.bonus_chance_floor,
            &mut self.pit_chance,
            &mut self.platform_chance,
            &mut self.forced_obstacle_share,
            &mut self.oscillation_chance,
        ] {
            *p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        }

        self.obstacle_cap_base = self.obstacle_cap_base.max(1);
        self.obstacle_cap_max = self.obstacle_cap_max.max(self.obstacle_cap_base);
        self.min_spawn_spacing = self.min_spawn_spacing.max(0.0);
        self.combo_display_ms = self.combo_display_ms.max(0.0);
        self.combo_reset_ms = self.combo_reset_ms.max(0.0);
        self.combo_multiplier_cap = self.combo_multiplier_cap.max(1);

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 1.2, "speed_cap": 10.0 }"#).unwrap();
        assert!((tuning.gravity - 1.2).abs() < f32::EPSILON);
        assert!((tuning.speed_cap - 10.0).abs() < f32::EPSILON);
        assert_eq!(tuning.max_bonuses, Tuning::default().max_bonuses);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        assert!(Tuning::from_json("{ not json").is_err());
        assert_eq!(Tuning::load_or_default("{ not json"), Tuning::default());
    }

    #[test]
    fn test_validation_clamps() {
        let tuning = Tuning {
            gravity: -3.0,
            first_jump_impulse: 5.0,
            obstacle_chance_cap: 4.0,
            obstacle_padding: 1.5,
            speed_cap: 0.5,
            level_score: 0,
            ..Default::default()
        }
        .validated();

        assert!(tuning.gravity > 0.0);
        assert!(tuning.first_jump_impulse < 0.0);
        assert!(tuning.obstacle_chance_cap <= 1.0);
        assert!(tuning.obstacle_padding < 1.0);
        assert!(tuning.speed_cap >= tuning.base_speed);
        assert_eq!(tuning.level_score, 1);
    }

    #[test]
    fn test_double_jump_weaker_than_first() {
        let tuning = Tuning::default();
        assert!(tuning.first_jump_impulse.abs() > tuning.double_jump_impulse.abs());
    }
}
