//! Tick orchestration.
//!
//! One external `App::update()` call is one simulation tick. The required
//! in-tick ordering is expressed as a chained sequence of [`SimSet`]s; every
//! domain plugin hangs its systems on the appropriate set.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod snapshot;

/// Fixed per-tick stage order.
///
/// Mirrors the required sequencing: advance the clock, evaluate the day/night
/// transition, spawn waves, move the player, run zombie AI against current
/// positions, resolve damage, drop the dead, then ambient decay/income and
/// snapshot publication.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Tick,
    Cycle,
    Waves,
    Player,
    Zombies,
    Damage,
    Cleanup,
    Ambient,
    Publish,
}

/// Monotonic simulation tick counter, incremented first every update.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTick(pub u64);

/// Deterministic simulation RNG. All in-core randomness flows through this;
/// same seed + same command stream reproduces the same world.
#[derive(Resource)]
pub struct SimRng(pub Xoshiro256PlusPlus);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

pub fn advance_tick(mut tick: ResMut<SimTick>) {
    tick.0 += 1;
}
