//! Zombies and the night-wave director.
//!
//! Tier and level fix a zombie's stats; waves scale all three with the wave
//! number. One wave per night, all members spawned simultaneously on a
//! jittered ring around the stash.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::buildings::Building;
use crate::constants::{
    AGGRO_CHANCE, CONTACT_DAMAGE_DIVISOR, GRID_UNIT, SPAWN_RING_GRID_RADIUS, SPAWN_RING_JITTER,
    WAVE_BASE_COUNT, WAVE_COUNT_SCALE, ZOMBIE_MAX_TIER,
};
use crate::engine::{SimRng, SimSet};
use crate::health::Health;
use crate::world::{random_point_on_ring, DayNightCycle, DayPhase, WorldBounds};

pub mod ai;

pub struct ZombiesPlugin;

impl Plugin for ZombiesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveDirector>()
            .add_systems(Update, spawn_waves.in_set(SimSet::Waves))
            .add_systems(Update, ai::update_zombies.in_set(SimSet::Zombies))
            .add_systems(Update, despawn_dead_zombies.in_set(SimSet::Cleanup));
    }
}

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Zombie {
    pub tier: u32,
    pub level: u32,
    /// Permanent aggro switch; the default target is the stash
    pub targeting_player: bool,
}

impl Zombie {
    pub fn new(tier: u32, level: u32) -> Self {
        Self {
            tier,
            level,
            targeting_player: false,
        }
    }

    pub fn max_health(tier: u32, level: u32) -> f32 {
        (tier * 50 + level * 20) as f32
    }

    /// Base damage, truncated to an integer.
    pub fn damage(&self) -> u32 {
        (10.0 + self.tier as f32 * 0.2 + self.level as f32 * 0.05) as u32
    }

    /// Continuous per-tick contact damage.
    pub fn contact_damage(&self) -> f32 {
        self.damage() as f32 / CONTACT_DAMAGE_DIVISOR
    }

    /// A player-sourced hit has a fixed chance to permanently switch this
    /// zombie's target from the stash to the player.
    pub fn register_player_hit(&mut self, rng: &mut impl Rng) {
        if !self.targeting_player && rng.gen_bool(AGGRO_CHANCE) {
            self.targeting_player = true;
            tracing::debug!("zombie aggroed onto the player");
        }
    }
}

/// Night-wave bookkeeping.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveDirector {
    pub wave_count: u32,
    pub wave_spawned_for_night: bool,
}

impl WaveDirector {
    pub fn wave_size(wave: u32) -> u32 {
        WAVE_BASE_COUNT + wave * WAVE_COUNT_SCALE
    }

    pub fn tier_for_wave(wave: u32) -> u32 {
        ((wave.saturating_sub(1)) / 10 + 1).min(ZOMBIE_MAX_TIER)
    }

    pub fn level_for_wave(wave: u32) -> u32 {
        wave.saturating_sub(1) % 10 + 1
    }
}

fn spawn_waves(
    mut commands: Commands,
    cycle: Res<DayNightCycle>,
    bounds: Res<WorldBounds>,
    mut director: ResMut<WaveDirector>,
    mut rng: ResMut<SimRng>,
    buildings: Query<(&Transform, &Building)>,
) {
    if cycle.phase == DayPhase::Day {
        director.wave_spawned_for_night = false;
        return;
    }
    if director.wave_spawned_for_night {
        return;
    }
    // no stash, no base to besiege
    let Some(stash) = buildings
        .iter()
        .find(|(_, b)| b.kind.is_unlocker())
        .map(|(tf, _)| tf.translation.truncate())
    else {
        return;
    };

    let wave = director.wave_count + 1;
    let count = WaveDirector::wave_size(wave);
    let tier = WaveDirector::tier_for_wave(wave);
    let level = WaveDirector::level_for_wave(wave);
    let radius = SPAWN_RING_GRID_RADIUS * GRID_UNIT;
    for _ in 0..count {
        let pos = random_point_on_ring(&mut rng.0, &bounds, stash, radius, SPAWN_RING_JITTER);
        commands.spawn((
            Transform::from_translation(pos.extend(0.0)),
            Zombie::new(tier, level),
            Health::new(Zombie::max_health(tier, level)),
        ));
    }
    director.wave_count = wave;
    director.wave_spawned_for_night = true;
    tracing::info!(wave, count, tier, level, "night wave spawned");
}

fn despawn_dead_zombies(
    mut commands: Commands,
    zombies: Query<(Entity, &Health), With<Zombie>>,
) {
    let mut removed = 0;
    for (entity, health) in &zombies {
        if !health.is_alive() {
            commands.entity(entity).despawn();
            removed += 1;
        }
    }
    if removed > 0 {
        tracing::debug!(removed, "zombies removed");
    }
}
