//! Difficulty-scaled spawning
//!
//! Each entity kind has its own probability gate and concurrency cap. A
//! floor guarantee keeps at least a couple of obstacles/bonuses in play, and
//! the spacing rule rejects any candidate that would crowd an existing
//! entity of any kind.

use rand::Rng;

use super::entities::World;
use super::factory::{spawn_bonus, spawn_obstacle_with, spawn_pit, spawn_platform};
use super::geometry::Rect;
use crate::tuning::Tuning;

/// What a spawner pass added to the world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub obstacles: usize,
    pub bonuses: usize,
    pub pits: usize,
    pub platforms: usize,
}

impl SpawnReport {
    pub fn total(&self) -> usize {
        self.obstacles + self.bonuses + self.pits + self.platforms
    }
}

/// Per-frame obstacle chance: rises with level, capped
pub fn obstacle_chance(level: u32, tuning: &Tuning) -> f32 {
    (tuning.obstacle_chance_base + level as f32 * tuning.obstacle_chance_per_level)
        .min(tuning.obstacle_chance_cap)
}

/// Per-frame bonus chance: bonuses grow scarcer as difficulty rises
pub fn bonus_chance(level: u32, tuning: &Tuning) -> f32 {
    (tuning.bonus_chance_base - level as f32 * tuning.bonus_chance_per_level)
        .max(tuning.bonus_chance_floor)
}

/// Max concurrent obstacles at this level
pub fn obstacle_cap(level: u32, tuning: &Tuning) -> usize {
    (tuning.obstacle_cap_base + level as usize / 2).min(tuning.obstacle_cap_max)
}

/// True if `candidate` keeps at least `spacing` px horizontally from every
/// existing entity
pub fn has_clearance(world: &World, candidate: &Rect, spacing: f32) -> bool {
    world
        .entity_bounds()
        .all(|existing| candidate.gap_x(existing) >= spacing)
}

/// Roll a frame-scaled probability gate
fn roll<R: Rng + ?Sized>(chance: f32, dm: f32, rng: &mut R) -> bool {
    let p = (chance * dm).clamp(0.0, 1.0);
    p > 0.0 && rng.random::<f32>() < p
}

/// Spawn an obstacle if the spacing rule allows it
fn place_obstacle<R: Rng + ?Sized>(world: &mut World, tuning: &Tuning, rng: &mut R) -> bool {
    let Some(obstacle) = spawn_obstacle_with(world.view, tuning.oscillation_chance, rng) else {
        return false;
    };
    if !has_clearance(world, &obstacle.bounds, tuning.min_spawn_spacing) {
        return false;
    }
    log::debug!("Spawned {:?} obstacle at y={:.0}", obstacle.kind, obstacle.bounds.y);
    world.obstacles.push(obstacle);
    true
}

fn place_bonus<R: Rng + ?Sized>(world: &mut World, tuning: &Tuning, rng: &mut R) -> bool {
    let Some(bonus) = spawn_bonus(world.view, rng) else {
        return false;
    };
    if !has_clearance(world, &bonus.bounds, tuning.min_spawn_spacing) {
        return false;
    }
    log::debug!("Spawned {:?} bonus", bonus.kind);
    world.bonuses.push(bonus);
    true
}

/// One spawner pass for a tick of `dm` target frames
pub fn run_spawner<R: Rng + ?Sized>(
    world: &mut World,
    level: u32,
    dm: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> SpawnReport {
    let mut report = SpawnReport::default();
    if !world.view.is_valid() {
        return report;
    }

    // Floor guarantee: bypasses the probability gates, not the caps or the
    // spacing rule. A kind at its cap yields to the other.
    if world.obstacles.len() + world.bonuses.len() < tuning.min_active {
        let obstacle_room = world.obstacles.len() < obstacle_cap(level, tuning);
        let bonus_room = world.bonuses.len() < tuning.max_bonuses;
        let want_obstacle = rng.random::<f32>() < tuning.forced_obstacle_share;
        if obstacle_room && (want_obstacle || !bonus_room) {
            report.obstacles += place_obstacle(world, tuning, rng) as usize;
        } else if bonus_room {
            report.bonuses += place_bonus(world, tuning, rng) as usize;
        }
    }

    if world.obstacles.len() < obstacle_cap(level, tuning)
        && roll(obstacle_chance(level, tuning), dm, rng)
    {
        report.obstacles += place_obstacle(world, tuning, rng) as usize;
    }

    if world.bonuses.len() < tuning.max_bonuses && roll(bonus_chance(level, tuning), dm, rng) {
        report.bonuses += place_bonus(world, tuning, rng) as usize;
    }

    if level >= tuning.pit_min_level
        && world.pits.len() < tuning.max_pits
        && roll(tuning.pit_chance, dm, rng)
    {
        if let Some(pit) = spawn_pit(world.view, rng) {
            if has_clearance(world, &pit.bounds, tuning.min_spawn_spacing) {
                log::debug!("Spawned pit ({:.0}px wide)", pit.bounds.width);
                world.pits.push(pit);
                report.pits += 1;
            }
        }
    }

    if world.platforms.len() < tuning.max_platforms && roll(tuning.platform_chance, dm, rng) {
        if let Some(platform) = spawn_platform(world.view, rng) {
            if has_clearance(world, &platform.bounds, tuning.min_spawn_spacing) {
                log::debug!("Spawned {:?} platform", platform.material);
                world.platforms.push(platform);
                report.platforms += 1;
            }
        }
    }

    report
}
