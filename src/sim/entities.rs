//! World entities: player, hazards, pickups and cosmetic particles
//!
//! Everything here is plain data. The tick takes a [`World`] by value and
//! hands a new one back, so snapshots held by the renderer never alias the
//! collections being updated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Size of the drawable area, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Spawning is skipped for degenerate viewports
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Y coordinate of the top of the ground strip
    pub fn ground_y(&self) -> f32 {
        (self.height - GROUND_HEIGHT).max(0.0)
    }
}

/// The player-controlled drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub bounds: Rect,
    /// Vertical velocity (px/frame, negative = up)
    pub velocity_y: f32,
    /// Resting on the ground line or a platform
    pub grounded: bool,
    /// Jumps left before landing again (0..=2)
    pub jumps_remaining: u8,
    /// Grounded via a platform last tick
    #[serde(default)]
    pub on_platform: bool,
}

impl Player {
    /// Fresh player standing on the ground of `view`
    pub fn spawn(view: Viewport) -> Self {
        Self {
            bounds: Rect::new(
                PLAYER_X,
                view.ground_y() - PLAYER_HEIGHT,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            velocity_y: 0.0,
            grounded: true,
            jumps_remaining: MAX_JUMPS,
            on_platform: false,
        }
    }

    #[inline]
    pub fn feet(&self) -> f32 {
        self.bounds.bottom()
    }

    /// Put the feet on `surface_y` and restore the full jump budget
    pub fn land_on(&mut self, surface_y: f32) {
        self.bounds.y = surface_y - self.bounds.height;
        self.velocity_y = 0.0;
        self.grounded = true;
        self.jumps_remaining = MAX_JUMPS;
    }
}

/// Obstacle kinds, each a septic-system hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Fat,
    Waste,
    Chemical,
    Ice,
    Lightning,
    Roots,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 6] = [
        ObstacleKind::Fat,
        ObstacleKind::Waste,
        ObstacleKind::Chemical,
        ObstacleKind::Ice,
        ObstacleKind::Lightning,
        ObstacleKind::Roots,
    ];

    pub fn color(&self) -> u32 {
        match self {
            ObstacleKind::Fat => 0xFFD700,
            ObstacleKind::Waste => 0x8B4513,
            ObstacleKind::Chemical => 0x9932CC,
            ObstacleKind::Ice => 0xB0E0E6,
            ObstacleKind::Lightning => 0xFFFF00,
            ObstacleKind::Roots => 0x228B22,
        }
    }

    /// Bulky hazards are drawn larger than compact ones
    pub fn is_bulky(&self) -> bool {
        matches!(self, ObstacleKind::Fat | ObstacleKind::Waste | ObstacleKind::Roots)
    }

    /// (min, max) edge length for this kind
    pub fn size_range(&self) -> (f32, f32) {
        if self.is_bulky() {
            (35.0, 55.0)
        } else {
            (28.0, 42.0)
        }
    }
}

/// Vertical bobbing for moving obstacles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    /// Vertical speed (px/frame); sign flips at the bounds
    pub velocity_y: f32,
    /// Resting y of the obstacle's top edge
    pub center: f32,
    /// Max distance from `center`
    pub range: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub bounds: Rect,
    pub kind: ObstacleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oscillation: Option<Oscillation>,
}

impl Obstacle {
    /// Bob within the oscillation band, reflecting at its limits
    pub fn oscillate(&mut self, dm: f32) {
        let Some(osc) = self.oscillation.as_mut() else {
            return;
        };
        self.bounds.y += osc.velocity_y * dm;
        let top = osc.center - osc.range;
        let bottom = osc.center + osc.range;
        if self.bounds.y <= top {
            self.bounds.y = top;
            osc.velocity_y = osc.velocity_y.abs();
        } else if self.bounds.y >= bottom {
            self.bounds.y = bottom;
            osc.velocity_y = -osc.velocity_y.abs();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusKind {
    Bacteria,
    Bubble,
    Filter,
    Key,
}

impl BonusKind {
    pub const ALL: [BonusKind; 4] = [
        BonusKind::Bacteria,
        BonusKind::Bubble,
        BonusKind::Filter,
        BonusKind::Key,
    ];

    /// Base points before the combo multiplier
    pub fn value(&self) -> u32 {
        match self {
            BonusKind::Key => 50,
            BonusKind::Bacteria => 10,
            BonusKind::Filter | BonusKind::Bubble => 5,
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            BonusKind::Bacteria => 0x32CD32,
            BonusKind::Bubble => 0xFFFFFF,
            BonusKind::Filter => 0x4169E1,
            BonusKind::Key => 0xFFD700,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub bounds: Rect,
    pub kind: BonusKind,
    pub value: u32,
}

/// A gap in the ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pit {
    pub bounds: Rect,
    /// Drawn depth only
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMaterial {
    Stone,
    Wood,
    Metal,
}

impl PlatformMaterial {
    pub const ALL: [PlatformMaterial; 3] = [
        PlatformMaterial::Stone,
        PlatformMaterial::Wood,
        PlatformMaterial::Metal,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub bounds: Rect,
    pub material: PlatformMaterial,
}

/// Visual feedback only, never collides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: u32,
    /// Frames left; removed at zero
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    pub fn advance(&mut self, dm: f32) {
        self.pos += self.vel * dm;
        self.life -= dm;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// All per-run entities the tick owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub view: Viewport,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub bonuses: Vec<Bonus>,
    pub pits: Vec<Pit>,
    pub platforms: Vec<Platform>,
    pub particles: Vec<Particle>,
}

impl World {
    /// Empty world with the player on the ground
    pub fn new(view: Viewport) -> Self {
        Self {
            view,
            player: Player::spawn(view),
            obstacles: Vec::new(),
            bonuses: Vec::new(),
            pits: Vec::new(),
            platforms: Vec::new(),
            particles: Vec::new(),
        }
    }

    /// Bounds of every spawned entity of any kind
    pub fn entity_bounds(&self) -> impl Iterator<Item = &Rect> {
        self.obstacles
            .iter()
            .map(|o| &o.bounds)
            .chain(self.bonuses.iter().map(|b| &b.bounds))
            .chain(self.pits.iter().map(|p| &p.bounds))
            .chain(self.platforms.iter().map(|p| &p.bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_spawns_on_ground() {
        let view = Viewport::new(800.0, 600.0);
        let player = Player::spawn(view);
        assert_eq!(player.feet(), view.ground_y());
        assert!(player.grounded);
        assert_eq!(player.jumps_remaining, MAX_JUMPS);
    }

    #[test]
    fn test_bonus_values() {
        assert_eq!(BonusKind::Key.value(), 50);
        assert_eq!(BonusKind::Bacteria.value(), 10);
        assert_eq!(BonusKind::Filter.value(), 5);
        assert_eq!(BonusKind::Bubble.value(), 5);
    }

    #[test]
    fn test_oscillation_reflects_at_bounds() {
        let mut obstacle = Obstacle {
            bounds: Rect::new(0.0, 100.0, 30.0, 30.0),
            kind: ObstacleKind::Ice,
            oscillation: Some(Oscillation {
                velocity_y: 4.0,
                center: 100.0,
                range: 10.0,
            }),
        };

        for _ in 0..3 {
            obstacle.oscillate(1.0);
        }
        // 100 -> 104 -> 108 -> 110 (clamped, reversed)
        assert_eq!(obstacle.bounds.y, 110.0);
        assert!(obstacle.oscillation.unwrap().velocity_y < 0.0);

        for _ in 0..100 {
            obstacle.oscillate(1.0);
            assert!(obstacle.bounds.y >= 90.0 && obstacle.bounds.y <= 110.0);
        }
    }

    #[test]
    fn test_particle_expires() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -1.0),
            size: 3.0,
            color: 0,
            life: 2.0,
            max_life: 2.0,
        };
        p.advance(1.0);
        assert!(p.is_alive());
        assert_eq!(p.pos, Vec2::new(1.0, -1.0));
        p.advance(1.0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ObstacleKind::Lightning).unwrap();
        assert_eq!(json, "\"lightning\"");
    }
}
