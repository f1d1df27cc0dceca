use serde::{Deserialize, Serialize};

use bevy::prelude::*;

/// Tuning knobs for the simulation core.
///
/// Insert before adding [`crate::CorePlugin`] to override; otherwise the
/// defaults below apply.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Seed for the deterministic simulation RNG
    pub seed: u64,
    /// Ticks in one full day/night cycle
    pub day_length_ticks: u32,
    /// Resource nodes spawned at world generation
    pub resource_node_count: u32,
    pub starting_wood: u32,
    pub starting_stone: u32,
    pub starting_gold: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            day_length_ticks: 3600,
            resource_node_count: 40,
            starting_wood: 100,
            starting_stone: 100,
            starting_gold: 50,
        }
    }
}
