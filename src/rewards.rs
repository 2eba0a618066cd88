//! Score reward tiers
//!
//! A fixed ladder of promotional rewards. A tier is unlocked once a run
//! reaches its score; game over reports the tiers that a new best crossed.

use serde::Serialize;

/// A single reward tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reward {
    /// Score needed to unlock
    pub points: u64,
    pub title: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
}

/// Reward ladder, ascending by points
pub const REWARDS: [Reward; 7] = [
    Reward {
        points: 100,
        title: "\"Clean Drop\" sticker",
        description: "Branded sticker",
        emoji: "🎖️",
    },
    Reward {
        points: 300,
        title: "Septic trouble checklist",
        description: "5 signs something is wrong",
        emoji: "📋",
    },
    Reward {
        points: 500,
        title: "3% off any service",
        description: "Valid for every service",
        emoji: "💰",
    },
    Reward {
        points: 1000,
        title: "Free consultation",
        description: "By phone",
        emoji: "📞",
    },
    Reward {
        points: 2000,
        title: "5% off installation",
        description: "Septic tank installation",
        emoji: "🔧",
    },
    Reward {
        points: 3000,
        title: "Free inspection",
        description: "On-site diagnostics",
        emoji: "🔍",
    },
    Reward {
        points: 5000,
        title: "10% off everything",
        description: "Maximum discount",
        emoji: "💎",
    },
];

/// A reward with its unlock state for a given score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewardStatus {
    #[serde(flatten)]
    pub reward: Reward,
    pub unlocked: bool,
}

/// Query helpers over the reward ladder
pub struct Rewards;

impl Rewards {
    /// Every tier with its unlock state
    pub fn statuses(score: u64) -> Vec<RewardStatus> {
        REWARDS
            .iter()
            .map(|reward| RewardStatus {
                reward: *reward,
                unlocked: score >= reward.points,
            })
            .collect()
    }

    /// Tiers reached by `score`
    pub fn unlocked(score: u64) -> impl Iterator<Item = &'static Reward> {
        REWARDS.iter().filter(move |r| score >= r.points)
    }

    /// Lowest tier not yet reached
    pub fn next_tier(score: u64) -> Option<&'static Reward> {
        REWARDS.iter().find(|r| score < r.points)
    }

    /// Tiers crossed by moving from `previous_best` to `score`
    pub fn newly_unlocked(previous_best: u64, score: u64) -> Vec<Reward> {
        REWARDS
            .iter()
            .filter(|r| previous_best < r.points && score >= r.points)
            .copied()
            .collect()
    }

    /// Fraction of the way from the last reached tier to the next (1.0 at the top)
    pub fn progress_to_next(score: u64) -> f32 {
        let Some(next) = Self::next_tier(score) else {
            return 1.0;
        };
        let floor = Self::unlocked(score).last().map_or(0, |r| r.points);
        (score - floor) as f32 / (next.points - floor) as f32
    }
}
