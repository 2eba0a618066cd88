//! Educational messages shown when a run ends
//!
//! Every obstacle is a real septic-system problem; crashing into one
//! explains how to avoid it at home.

use serde::Serialize;

use crate::sim::ObstacleKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EducationalMessage {
    pub emoji: &'static str,
    pub title: &'static str,
    pub text: &'static str,
}

const FAT: EducationalMessage = EducationalMessage {
    emoji: "🧈",
    title: "Grease plug!",
    text: "Never pour fat down the drain. It is the main cause of septic blockages.",
};

const WASTE: EducationalMessage = EducationalMessage {
    emoji: "🗑️",
    title: "Solid waste!",
    text: "Solid waste clogs the system and stops the septic tank from working.",
};

const CHEMICAL: EducationalMessage = EducationalMessage {
    emoji: "🧪",
    title: "Chemical pollution!",
    text: "Household chemicals kill the helpful bacteria in the septic tank.",
};

const ICE: EducationalMessage = EducationalMessage {
    emoji: "🧊",
    title: "Frozen!",
    text: "Insulate the septic tank for winter so it does not freeze.",
};

const LIGHTNING: EducationalMessage = EducationalMessage {
    emoji: "⚡",
    title: "Electrical trouble!",
    text: "Check the compressor and electrical equipment regularly.",
};

const ROOTS: EducationalMessage = EducationalMessage {
    emoji: "🌳",
    title: "Tree roots!",
    text: "Do not install a septic tank next to large trees.",
};

/// Shown when the player drops into a pit
pub const PIT_FALL: EducationalMessage = EducationalMessage {
    emoji: "🕳️",
    title: "Fell through!",
    text: "A collapsed pipe leaves a gap. Get the lines inspected before the ground gives way.",
};

/// Message for a collision with `kind`
pub fn for_obstacle(kind: ObstacleKind) -> &'static EducationalMessage {
    match kind {
        ObstacleKind::Fat => &FAT,
        ObstacleKind::Waste => &WASTE,
        ObstacleKind::Chemical => &CHEMICAL,
        ObstacleKind::Ice => &ICE,
        ObstacleKind::Lightning => &LIGHTNING,
        ObstacleKind::Roots => &ROOTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_distinct_message() {
        let titles: std::collections::HashSet<_> = ObstacleKind::ALL
            .iter()
            .map(|k| for_obstacle(*k).title)
            .collect();
        assert_eq!(titles.len(), ObstacleKind::ALL.len());
        assert!(!titles.contains(PIT_FALL.title));
    }
}
