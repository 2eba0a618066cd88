//! Per-frame simulation tick
//!
//! Core game loop step. Takes the world by value, advances it by one
//! variable-length frame and returns the new world plus the events the
//! state machine has to apply. The only hidden input is the injected RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Bonus, Obstacle, Particle, Pit, World};
use super::geometry::{intersects, intersects_with_padding};
use super::spawner::run_spawner;
use super::state::{level_for, speed_for_level};
use crate::consts::*;
use crate::tuning::Tuning;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// A jump was requested since the last tick (tap/click/space)
    pub jump: bool,
    /// Wall-clock time since the previous tick (ms)
    pub delta_ms: f32,
}

/// Run progress the tick advances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Meters run
    pub distance: f32,
    pub level: u32,
    /// World scroll speed (px/frame)
    pub game_speed: f32,
}

impl Progress {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            distance: 0.0,
            level: 1,
            game_speed: speed_for_level(1, tuning),
        }
    }
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Jumped,
    DoubleJumped,
    BonusCollected(Bonus),
    /// Terminal
    ObstacleHit(Obstacle),
    /// Terminal
    PitFall(Pit),
    LevelUp(u32),
}

impl SimEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SimEvent::ObstacleHit(_) | SimEvent::PitFall(_))
    }
}

/// Everything a tick hands back
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub world: World,
    pub progress: Progress,
    pub events: Vec<SimEvent>,
}

impl TickOutput {
    /// True if the run ended this tick
    pub fn is_terminal(&self) -> bool {
        self.events.iter().any(SimEvent::is_terminal)
    }
}

/// Scale factor from elapsed wall-clock time to target frames
///
/// Negative or NaN deltas count as zero; very long frames are capped.
pub fn delta_multiplier(delta_ms: f32) -> f32 {
    if delta_ms > 0.0 {
        delta_ms.min(MAX_FRAME_MS) / TARGET_FRAME_MS
    } else {
        0.0
    }
}

/// Advance the world by one frame
pub fn tick<R: Rng + ?Sized>(
    mut world: World,
    progress: Progress,
    score: u64,
    input: TickInput,
    tuning: &Tuning,
    rng: &mut R,
) -> TickOutput {
    let dm = delta_multiplier(input.delta_ms);
    let ground = world.view.ground_y();
    let mut events = Vec::new();

    // --- Player physics ---
    let player = &mut world.player;
    let was_on_platform = player.on_platform;

    // A request with an empty budget is dropped
    let mut jumped = false;
    if input.jump && player.jumps_remaining > 0 {
        let first = player.jumps_remaining == MAX_JUMPS;
        player.velocity_y = if first {
            tuning.first_jump_impulse
        } else {
            tuning.double_jump_impulse
        };
        player.jumps_remaining -= 1;
        player.grounded = false;
        jumped = true;
        events.push(if first {
            SimEvent::Jumped
        } else {
            SimEvent::DoubleJumped
        });
    }

    if !player.grounded {
        player.velocity_y += tuning.gravity * dm;
    }
    player.bounds.y += player.velocity_y * dm;

    // No floor over a pit: checked before any landing
    let fell_into = world
        .pits
        .iter()
        .find(|pit| player.bounds.overlaps_x(&pit.bounds) && player.feet() >= ground)
        .cloned();
    if let Some(pit) = fell_into {
        log::debug!("Fell into pit at x={:.0}", pit.bounds.x);
        events.push(SimEvent::PitFall(pit));
        return TickOutput {
            world,
            progress,
            events,
        };
    }

    // First platform under the falling feet wins
    let mut landed_on_platform = false;
    if player.velocity_y >= 0.0 {
        let tolerance = tuning.platform_land_tolerance + player.velocity_y * dm;
        let feet = player.feet();
        let surface = world
            .platforms
            .iter()
            .find(|p| {
                player.bounds.overlaps_x(&p.bounds)
                    && feet >= p.bounds.y
                    && feet <= p.bounds.y + tolerance
            })
            .map(|p| p.bounds.y);
        if let Some(top) = surface {
            player.land_on(top);
            landed_on_platform = true;
        }
    }

    if !landed_on_platform {
        if player.velocity_y >= 0.0 && player.feet() >= ground {
            player.land_on(ground);
        } else {
            player.grounded = false;
        }
    }

    // Walking off a platform edge grants a fresh budget
    let over_platform = world
        .platforms
        .iter()
        .any(|p| player.bounds.overlaps_x(&p.bounds));
    if was_on_platform && !landed_on_platform && !jumped && !over_platform {
        player.grounded = false;
        player.jumps_remaining = MAX_JUMPS;
    }
    player.on_platform = landed_on_platform;

    // --- Progress ---
    let distance = progress.distance + progress.game_speed * tuning.distance_scale * dm;
    let level = level_for(distance, score, tuning).max(progress.level);
    let game_speed = speed_for_level(level, tuning);
    if level > progress.level {
        events.push(SimEvent::LevelUp(level));
    }
    let progress = Progress {
        distance,
        level,
        game_speed,
    };

    // --- Spawning ---
    run_spawner(&mut world, level, dm, tuning, rng);

    // --- Scroll ---
    let dx = game_speed * dm;
    for obstacle in &mut world.obstacles {
        obstacle.bounds.x -= dx;
        obstacle.oscillate(dm);
    }
    for bonus in &mut world.bonuses {
        bonus.bounds.x -= dx;
    }
    for pit in &mut world.pits {
        pit.bounds.x -= dx;
    }
    for platform in &mut world.platforms {
        platform.bounds.x -= dx;
    }
    for particle in &mut world.particles {
        particle.advance(dm);
    }
    world.particles.retain(Particle::is_alive);

    // --- Collisions and culling ---
    let player_bounds = world.player.bounds;
    let mut crashed = false;
    world.obstacles.retain(|obstacle| {
        if obstacle.bounds.right() <= 0.0 {
            return false;
        }
        if intersects_with_padding(&player_bounds, &obstacle.bounds, tuning.obstacle_padding) {
            events.push(SimEvent::ObstacleHit(obstacle.clone()));
            crashed = true;
            return false;
        }
        true
    });

    // Nothing is scored once the run is over
    let mut collected = Vec::new();
    world.bonuses.retain(|bonus| {
        if bonus.bounds.right() <= 0.0 {
            return false;
        }
        if !crashed && intersects(&player_bounds, &bonus.bounds) {
            collected.push(bonus.clone());
            return false;
        }
        true
    });
    world.pits.retain(|pit| pit.bounds.right() > 0.0);
    world.platforms.retain(|platform| platform.bounds.right() > 0.0);

    for bonus in collected {
        burst(&mut world.particles, &bonus, rng);
        events.push(SimEvent::BonusCollected(bonus));
    }

    TickOutput {
        world,
        progress,
        events,
    }
}

/// Sparkle burst at a collected bonus
fn burst<R: Rng + ?Sized>(particles: &mut Vec<Particle>, bonus: &Bonus, rng: &mut R) {
    let center = bonus.bounds.center();
    for _ in 0..BONUS_PARTICLES {
        particles.push(Particle {
            pos: center,
            vel: glam::Vec2::new(
                (rng.random::<f32>() - 0.5) * 4.0,
                (rng.random::<f32>() - 0.5) * 4.0,
            ),
            size: 3.0,
            color: bonus.kind.color(),
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
        });
    }
    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{
        BonusKind, ObstacleKind, Platform, PlatformMaterial, Viewport,
    };
    use crate::sim::geometry::Rect;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);
    const FRAME: f32 = TARGET_FRAME_MS;

    /// Tuning with every spawn gate shut so tests control the world
    fn quiet() -> Tuning {
        Tuning {
            min_active: 0,
            obstacle_chance_base: 0.0,
            obstacle_chance_per_level: 0.0,
            bonus_chance_base: 0.0,
            bonus_chance_floor: 0.0,
            pit_chance: 0.0,
            platform_chance: 0.0,
            ..Default::default()
        }
    }

    fn run(world: World, jump: bool, delta_ms: f32, tuning: &Tuning) -> TickOutput {
        let mut rng = Pcg32::seed_from_u64(1);
        tick(
            world,
            Progress::new(tuning),
            0,
            TickInput { jump, delta_ms },
            tuning,
            &mut rng,
        )
    }

    fn obstacle(x: f32, y: f32) -> Obstacle {
        Obstacle {
            bounds: Rect::new(x, y, 40.0, 40.0),
            kind: ObstacleKind::Chemical,
            oscillation: None,
        }
    }

    fn platform(x: f32, top: f32, width: f32) -> Platform {
        Platform {
            bounds: Rect::new(x, top, width, PLATFORM_THICKNESS),
            material: PlatformMaterial::Wood,
        }
    }

    #[test]
    fn test_first_jump_from_ground() {
        let tuning = quiet();
        let out = run(World::new(VIEW), true, 0.0, &tuning);
        let p = &out.world.player;
        assert_eq!(p.velocity_y, tuning.first_jump_impulse);
        assert!(!p.grounded);
        assert_eq!(p.jumps_remaining, 1);
        assert_eq!(out.events, vec![SimEvent::Jumped]);
    }

    #[test]
    fn test_jump_with_real_frame_leaves_ground() {
        let tuning = quiet();
        let out = run(World::new(VIEW), true, FRAME, &tuning);
        let p = &out.world.player;
        assert!(p.velocity_y < 0.0);
        assert!((p.velocity_y - (tuning.first_jump_impulse + tuning.gravity)).abs() < 1e-3);
        assert!(p.feet() < VIEW.ground_y());
        assert!(!p.grounded);
    }

    #[test]
    fn test_double_jump_then_exhausted() {
        let tuning = quiet();
        let out = run(World::new(VIEW), true, FRAME, &tuning);
        let out = run(out.world, false, FRAME, &tuning);
        assert_eq!(out.world.player.jumps_remaining, 1);

        let out = run(out.world, true, 0.0, &tuning);
        assert_eq!(out.world.player.velocity_y, tuning.double_jump_impulse);
        assert_eq!(out.world.player.jumps_remaining, 0);
        assert_eq!(out.events, vec![SimEvent::DoubleJumped]);

        // Third request has no effect on velocity
        let out = run(out.world, true, 0.0, &tuning);
        assert_eq!(out.world.player.velocity_y, tuning.double_jump_impulse);
        assert_eq!(out.world.player.jumps_remaining, 0);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_landing_restores_budget() {
        let tuning = quiet();
        let mut out = run(World::new(VIEW), true, FRAME, &tuning);
        let mut frames = 0;
        while !out.world.player.grounded {
            out = run(out.world, false, FRAME, &tuning);
            frames += 1;
            assert!(frames < 200, "never landed");
        }
        assert_eq!(out.world.player.feet(), VIEW.ground_y());
        assert_eq!(out.world.player.jumps_remaining, MAX_JUMPS);
        assert_eq!(out.world.player.velocity_y, 0.0);
    }

    #[test]
    fn test_obstacle_hit_is_terminal_and_removes_obstacle() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let player = world.player.bounds;
        world.obstacles.push(obstacle(player.x + 10.0, player.y));
        world.obstacles.push(obstacle(600.0, player.y));

        let out = run(world, false, 0.0, &tuning);
        assert!(out.is_terminal());
        assert!(matches!(out.events[0], SimEvent::ObstacleHit(ref o) if o.kind == ObstacleKind::Chemical));
        assert_eq!(out.world.obstacles.len(), 1);
        assert_eq!(out.world.obstacles[0].bounds.x, 600.0);
    }

    #[test]
    fn test_padding_forgives_graze() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let player = world.player.bounds;
        // 4px overlap on the right edge only
        world.obstacles.push(obstacle(player.right() - 4.0, player.y));

        let out = run(world, false, 0.0, &tuning);
        assert!(!out.is_terminal());
        assert_eq!(out.world.obstacles.len(), 1);
    }

    #[test]
    fn test_bonus_collected_spawns_particles() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let player = world.player.bounds;
        world.bonuses.push(Bonus {
            bounds: Rect::new(player.x + 5.0, player.y + 5.0, BONUS_SIZE, BONUS_SIZE),
            kind: BonusKind::Key,
            value: 50,
        });

        let out = run(world, false, 0.0, &tuning);
        assert!(matches!(out.events[..], [SimEvent::BonusCollected(ref b)] if b.value == 50));
        assert!(out.world.bonuses.is_empty());
        assert_eq!(out.world.particles.len(), BONUS_PARTICLES);
    }

    #[test]
    fn test_no_bonus_after_crash() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let player = world.player.bounds;
        world.obstacles.push(obstacle(player.x, player.y));
        world.bonuses.push(Bonus {
            bounds: Rect::new(player.x, player.y, BONUS_SIZE, BONUS_SIZE),
            kind: BonusKind::Bacteria,
            value: 10,
        });

        let out = run(world, false, 0.0, &tuning);
        assert!(out.is_terminal());
        assert!(!out.events.iter().any(|e| matches!(e, SimEvent::BonusCollected(_))));
    }

    #[test]
    fn test_pit_fall_short_circuits() {
        let tuning = Tuning {
            min_active: 5,
            ..quiet()
        };
        let mut world = World::new(VIEW);
        let player = world.player.bounds;
        world.pits.push(Pit {
            bounds: Rect::new(player.x + 10.0, VIEW.ground_y(), 80.0, 100.0),
            depth: 50.0,
        });
        world.obstacles.push(obstacle(500.0, 100.0));

        let out = run(world, false, FRAME, &tuning);
        assert!(matches!(out.events[..], [SimEvent::PitFall(_)]));
        // Nothing moved, nothing spawned, no progress
        assert_eq!(out.world.obstacles.len(), 1);
        assert_eq!(out.world.obstacles[0].bounds.x, 500.0);
        assert_eq!(out.progress.distance, 0.0);
    }

    #[test]
    fn test_pit_beats_jump_landing() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let player = world.player.bounds;
        world.pits.push(Pit {
            bounds: Rect::new(player.x, VIEW.ground_y(), 80.0, 100.0),
            depth: 50.0,
        });
        let out = run(world, true, 0.0, &tuning);
        assert!(out.is_terminal());
    }

    #[test]
    fn test_jumping_over_pit_is_safe() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let player = world.player.bounds;
        world.player.bounds.y -= 80.0;
        world.player.grounded = false;
        world.pits.push(Pit {
            bounds: Rect::new(player.x, VIEW.ground_y(), 80.0, 100.0),
            depth: 50.0,
        });
        let out = run(world, false, FRAME, &tuning);
        assert!(!out.is_terminal());
    }

    #[test]
    fn test_lands_on_platform() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let top = VIEW.ground_y() - 70.0;
        world.platforms.push(platform(0.0, top, 400.0));
        // Feet 2px above the platform, falling
        world.player.bounds.y = top - PLAYER_HEIGHT - 2.0;
        world.player.velocity_y = 3.0;
        world.player.grounded = false;
        world.player.jumps_remaining = 0;

        let out = run(world, false, FRAME, &tuning);
        let p = &out.world.player;
        assert!(p.grounded);
        assert!(p.on_platform);
        assert_eq!(p.feet(), top);
        assert_eq!(p.jumps_remaining, MAX_JUMPS);
    }

    #[test]
    fn test_stacked_platforms_first_listed_wins() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let top = VIEW.ground_y() - 70.0;
        world.platforms.push(platform(0.0, top + 4.0, 400.0));
        world.platforms.push(platform(0.0, top, 400.0));
        // Feet land 6px below `top`: within tolerance of both
        world.player.bounds.y = top - PLAYER_HEIGHT + 3.0;
        world.player.velocity_y = 2.2;
        world.player.grounded = false;
        world.player.jumps_remaining = 0;

        let out = run(world, false, FRAME, &tuning);
        let p = &out.world.player;
        assert!(p.on_platform);
        assert_eq!(p.feet(), top + 4.0);
    }

    #[test]
    fn test_rising_passes_through_platform() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let top = VIEW.ground_y() - 70.0;
        world.platforms.push(platform(0.0, top, 400.0));
        world.player.bounds.y = top - PLAYER_HEIGHT + 3.0;
        world.player.velocity_y = -8.0;
        world.player.grounded = false;

        let out = run(world, false, FRAME, &tuning);
        assert!(!out.world.player.grounded);
        assert!(!out.world.player.on_platform);
    }

    #[test]
    fn test_walking_off_platform_restores_budget() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let top = VIEW.ground_y() - 70.0;
        world.platforms.push(platform(0.0, top, 100.0));
        world.player.land_on(top);
        world.player.on_platform = true;
        world.player.jumps_remaining = 1;

        // Platform has scrolled out from under the player
        world.platforms[0].bounds.x = -200.0 + PLAYER_X;
        let out = run(world, false, FRAME, &tuning);
        let p = &out.world.player;
        assert!(!p.grounded);
        assert!(!p.on_platform);
        assert_eq!(p.jumps_remaining, MAX_JUMPS);
    }

    #[test]
    fn test_jump_from_platform_keeps_spent_budget() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        let top = VIEW.ground_y() - 70.0;
        world.platforms.push(platform(0.0, top, 400.0));
        world.player.land_on(top);
        world.player.on_platform = true;

        let out = run(world, true, FRAME, &tuning);
        assert_eq!(out.world.player.jumps_remaining, 1);
        assert!(!out.world.player.on_platform);
    }

    #[test]
    fn test_off_screen_entities_culled() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        world.obstacles.push(obstacle(-41.0, 100.0));
        world.pits.push(Pit {
            bounds: Rect::new(-100.0, VIEW.ground_y(), 60.0, 100.0),
            depth: 40.0,
        });
        world.platforms.push(platform(-300.0, 300.0, 100.0));
        world.bonuses.push(Bonus {
            bounds: Rect::new(-30.0, 100.0, BONUS_SIZE, BONUS_SIZE),
            kind: BonusKind::Filter,
            value: 5,
        });

        let out = run(world, false, FRAME, &tuning);
        assert!(out.world.obstacles.is_empty());
        assert!(out.world.pits.is_empty());
        assert!(out.world.platforms.is_empty());
        assert!(out.world.bonuses.is_empty());
    }

    #[test]
    fn test_motion_scales_with_delta() {
        let tuning = quiet();
        let mut world = World::new(VIEW);
        world.obstacles.push(obstacle(600.0, 100.0));

        let one = run(world.clone(), false, FRAME, &tuning);
        let two = run(world, false, FRAME * 2.0, &tuning);
        let moved_one = 600.0 - one.world.obstacles[0].bounds.x;
        let moved_two = 600.0 - two.world.obstacles[0].bounds.x;
        assert!((moved_two - 2.0 * moved_one).abs() < 1e-3);
        assert!((two.progress.distance - 2.0 * one.progress.distance).abs() < 1e-5);
    }

    #[test]
    fn test_negative_delta_is_clamped() {
        assert_eq!(delta_multiplier(-50.0), 0.0);
        assert_eq!(delta_multiplier(f32::NAN), 0.0);
        assert!((delta_multiplier(TARGET_FRAME_MS) - 1.0).abs() < 1e-5);
        assert_eq!(delta_multiplier(10_000.0), MAX_FRAME_MS / TARGET_FRAME_MS);
    }

    #[test]
    fn test_level_up_event() {
        let tuning = quiet();
        let mut rng = Pcg32::seed_from_u64(1);
        let progress = Progress {
            distance: tuning.level_distance - 0.01,
            ..Progress::new(&tuning)
        };
        let out = tick(
            World::new(VIEW),
            progress,
            0,
            TickInput {
                jump: false,
                delta_ms: FRAME,
            },
            &tuning,
            &mut rng,
        );
        assert_eq!(out.progress.level, 2);
        assert!(out.events.contains(&SimEvent::LevelUp(2)));
        assert!(out.progress.game_speed > Progress::new(&tuning).game_speed);
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let run_seeded = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut world = World::new(VIEW);
            let mut progress = Progress::new(&tuning);
            for i in 0..600 {
                let input = TickInput {
                    jump: i % 45 == 0,
                    delta_ms: FRAME,
                };
                let out = tick(world, progress, 0, input, &tuning, &mut rng);
                world = out.world;
                progress = out.progress;
            }
            (world, progress)
        };
        assert_eq!(run_seeded(99), run_seeded(99));
    }

    proptest! {
        #[test]
        fn prop_jump_budget_stays_in_range(
            jumps in proptest::collection::vec(any::<bool>(), 1..200),
            delta in 0.0f32..60.0,
        ) {
            let tuning = quiet();
            let mut world = World::new(VIEW);
            for jump in jumps {
                world = run(world, jump, delta, &tuning).world;
                prop_assert!(world.player.jumps_remaining <= MAX_JUMPS);
                if world.player.grounded {
                    prop_assert_eq!(world.player.jumps_remaining, MAX_JUMPS);
                }
            }
        }

        #[test]
        fn prop_no_off_screen_survivors(seed in any::<u64>(), frames in 1usize..400) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut world = World::new(VIEW);
            let mut progress = Progress { level: 6, ..Progress::new(&tuning) };
            progress.game_speed = speed_for_level(6, &tuning);
            for _ in 0..frames {
                let out = tick(world, progress, 0, TickInput { jump: false, delta_ms: FRAME }, &tuning, &mut rng);
                if out.is_terminal() {
                    break;
                }
                world = out.world;
                progress = out.progress;
                prop_assert!(world.entity_bounds().all(|b| b.right() > 0.0));
            }
        }
    }
}
