//! Look-ahead jump planner
//!
//! Drives attract-mode demos and the headless native runner. Candidate jump
//! timings are played forward through [`tick`] on a copy of the world with
//! spawning switched off. The autopilot jumps once waiting a frame longer
//! would leave no timing that gets through. A follow-up jump is only tried
//! in the last few frames before the plan would crash.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::World;
use super::tick::{Progress, TickInput, tick};
use crate::consts::TARGET_FRAME_MS;
use crate::tuning::Tuning;

const MIN_HORIZON: u32 = 20;
const MAX_HORIZON: u32 = 240;
/// Frames before a crash in which a follow-up jump is tried
const LATE_JUMP_FRAMES: u32 = 3;

/// Frames a plan is played forward: a full jump followed by a full double jump
fn horizon(tuning: &Tuning) -> u32 {
    let gravity = tuning.gravity.max(0.01);
    let airtime =
        2.0 * (tuning.first_jump_impulse.abs() + tuning.double_jump_impulse.abs()) / gravity;
    (airtime.ceil() as u32).clamp(MIN_HORIZON, MAX_HORIZON)
}

struct Planner {
    world: World,
    progress: Progress,
    tuning: Tuning,
    horizon: u32,
}

impl Planner {
    fn new(world: &World, progress: Progress, tuning: &Tuning) -> Self {
        let mut world = world.clone();
        world.bonuses.clear();
        world.particles.clear();
        let tuning = Tuning {
            min_active: 0,
            obstacle_chance_base: 0.0,
            obstacle_chance_per_level: 0.0,
            obstacle_chance_cap: 0.0,
            bonus_chance_base: 0.0,
            bonus_chance_floor: 0.0,
            pit_chance: 0.0,
            platform_chance: 0.0,
            ..tuning.clone()
        };
        Self {
            horizon: horizon(&tuning),
            world,
            progress,
            tuning,
        }
    }

    /// Play the world forward, jumping on the given frames; the frame the
    /// run would end on, if it ends within the horizon
    fn crash_frame(&self, jumps: &[u32]) -> Option<u32> {
        let mut world = self.world.clone();
        let mut progress = self.progress;
        // Nothing spawns, so the stream is never drawn from in earnest
        let mut rng = Pcg32::seed_from_u64(0);
        for frame in 0..self.horizon {
            let input = TickInput {
                jump: jumps.contains(&frame),
                delta_ms: TARGET_FRAME_MS,
            };
            let out = tick(world, progress, 0, input, &self.tuning, &mut rng);
            if out.is_terminal() {
                return Some(frame);
            }
            world = out.world;
            progress = out.progress;
        }
        None
    }

    /// Some plan starting next frame, and no later than `crash`, gets through
    fn can_wait(&self, crash: u32) -> bool {
        (1..=crash).rev().any(|first| match self.crash_frame(&[first]) {
            None => true,
            Some(hit) => (hit.saturating_sub(LATE_JUMP_FRAMES).max(first + 1)..=hit)
                .any(|second| self.crash_frame(&[first, second]).is_none()),
        })
    }
}

/// True if the player should jump this frame
pub fn wants_jump(world: &World, progress: Progress, tuning: &Tuning) -> bool {
    if world.player.jumps_remaining == 0 {
        return false;
    }
    let planner = Planner::new(world, progress, tuning);
    let Some(crash) = planner.crash_frame(&[]) else {
        return false;
    };
    if planner.crash_frame(&[0]).is_none() {
        return true;
    }
    // Last moment, or nothing works and jumping is the best bet
    !planner.can_wait(crash)
}
