//! Entity factories
//!
//! Stateless generators: each builds one entity just past the right edge of
//! the viewport from the viewport size and the injected RNG. They return
//! `None` for a degenerate viewport instead of placing things at nonsense
//! coordinates.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::entities::*;
use super::geometry::Rect;
use crate::consts::*;

/// Obstacle bottom heights above the ground line, with pick weights.
/// Ground level is weighted heaviest so most obstacles must be jumped.
const OBSTACLE_BANDS: [(f32, u32); 3] = [
    (0.0, 5),   // on the ground
    (60.0, 3),  // mid-air, clearable with one jump
    (130.0, 2), // high, needs the double jump to get over
];

/// Bonus bottom heights above the ground line, with pick weights
const BONUS_BANDS: [(f32, u32); 3] = [(10.0, 4), (90.0, 4), (180.0, 2)];

/// Platform top heights above the ground line
const PLATFORM_BANDS: [f32; 2] = [70.0, 110.0];

const OSCILLATION_RANGE: (f32, f32) = (15.0, 35.0);
const OSCILLATION_SPEED: (f32, f32) = (0.5, 1.5);
/// Chance an obstacle bobs when no tuning is supplied
pub const DEFAULT_OSCILLATION_CHANCE: f32 = 0.3;

const PIT_WIDTH: (f32, f32) = (60.0, 110.0);
const PIT_DEPTH: (f32, f32) = (40.0, 80.0);
const PLATFORM_WIDTH: (f32, f32) = (90.0, 160.0);

/// Pick a band offset by weight
fn pick_band<R: Rng + ?Sized>(bands: &[(f32, u32)], rng: &mut R) -> f32 {
    let total: u32 = bands.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for &(offset, weight) in bands {
        if roll < weight {
            return offset;
        }
        roll -= weight;
    }
    bands[0].0
}

/// Random obstacle of a uniformly chosen kind
pub fn spawn_obstacle<R: Rng + ?Sized>(view: Viewport, rng: &mut R) -> Option<Obstacle> {
    spawn_obstacle_with(view, DEFAULT_OSCILLATION_CHANCE, rng)
}

/// Random obstacle with an explicit chance of vertical bobbing
pub fn spawn_obstacle_with<R: Rng + ?Sized>(
    view: Viewport,
    oscillation_chance: f32,
    rng: &mut R,
) -> Option<Obstacle> {
    if !view.is_valid() {
        return None;
    }
    let ground = view.ground_y();

    let kind = *ObstacleKind::ALL.choose(rng)?;
    let (min, max) = kind.size_range();
    let width = rng.random_range(min..max);
    let height = rng.random_range(min..max);

    let lift = pick_band(&OBSTACLE_BANDS, rng);
    let y = ground - lift - height;

    let oscillation = if rng.random::<f32>() < oscillation_chance {
        let range = rng.random_range(OSCILLATION_RANGE.0..OSCILLATION_RANGE.1);
        let speed = rng.random_range(OSCILLATION_SPEED.0..OSCILLATION_SPEED.1);
        // Keep the lowest point of the swing on or above the ground
        let center = y.min(ground - height - range);
        Some(Oscillation {
            velocity_y: if rng.random_bool(0.5) { speed } else { -speed },
            center,
            range,
        })
    } else {
        None
    };

    let y = oscillation.map_or(y, |o| o.center);

    Some(Obstacle {
        bounds: Rect::new(view.width + OBSTACLE_SPAWN_MARGIN, y, width, height),
        kind,
        oscillation,
    })
}

/// Random bonus; spawns further right than obstacles to avoid clustering
pub fn spawn_bonus<R: Rng + ?Sized>(view: Viewport, rng: &mut R) -> Option<Bonus> {
    if !view.is_valid() {
        return None;
    }
    let kind = *BonusKind::ALL.choose(rng)?;
    let lift = pick_band(&BONUS_BANDS, rng);

    Some(Bonus {
        bounds: Rect::new(
            view.width + BONUS_SPAWN_MARGIN,
            view.ground_y() - lift - BONUS_SIZE,
            BONUS_SIZE,
            BONUS_SIZE,
        ),
        kind,
        value: kind.value(),
    })
}

/// Gap in the ground, spanning the ground strip
pub fn spawn_pit<R: Rng + ?Sized>(view: Viewport, rng: &mut R) -> Option<Pit> {
    if !view.is_valid() {
        return None;
    }
    let width = rng.random_range(PIT_WIDTH.0..PIT_WIDTH.1);
    let ground = view.ground_y();

    Some(Pit {
        bounds: Rect::new(
            view.width + OBSTACLE_SPAWN_MARGIN,
            ground,
            width,
            view.height - ground,
        ),
        depth: rng.random_range(PIT_DEPTH.0..PIT_DEPTH.1),
    })
}

/// Elevated platform the player can land on
pub fn spawn_platform<R: Rng + ?Sized>(view: Viewport, rng: &mut R) -> Option<Platform> {
    if !view.is_valid() {
        return None;
    }
    let width = rng.random_range(PLATFORM_WIDTH.0..PLATFORM_WIDTH.1);
    let lift = *PLATFORM_BANDS.choose(rng)?;
    let material = *PlatformMaterial::ALL.choose(rng)?;

    Some(Platform {
        bounds: Rect::new(
            view.width + OBSTACLE_SPAWN_MARGIN,
            view.ground_y() - lift,
            width,
            PLATFORM_THICKNESS,
        ),
        material,
    })
}
