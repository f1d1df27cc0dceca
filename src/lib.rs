//! Nightfall - Survival Core Library
//!
//! Headless simulation core for a top-down survival/tower-defense game:
//! - Day/night cycle and the night-wave director
//! - Zombie AI (stash vs. player targeting, aggro, obstacle sliding)
//! - Axis-aligned collision resolution (blocking and harvest-hit policies)
//! - Building catalog, placement rules, upgrades, selling, tower behaviors
//! - Tool catalog, melee swing state machine, projectiles
//! - Layered health/shield model with armor-scaled regeneration
//! - Per-tick world snapshot (plus JSON) for presentation layers
//!
//! The embedding application drives one simulation tick per `App::update()`
//! call and talks to the core only through resources, command events, and
//! the published snapshot.

use bevy::prelude::*;

pub mod buildings;
pub mod collision;
pub mod combat;
pub mod constants;
pub mod economy;
pub mod engine;
pub mod harvest;
pub mod health;
pub mod logging;
pub mod player;
pub mod tools;
pub mod world;
pub mod zombies;

use engine::config::CoreConfig;
use engine::{advance_tick, SimRng, SimSet, SimTick};

/// Aggregates every core plugin and pins the per-tick stage order.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CoreConfig>();
        let seed = app.world().resource::<CoreConfig>().seed;
        app.insert_resource(SimRng::seeded(seed));
        app.init_resource::<SimTick>();

        app.configure_sets(
            Update,
            (
                SimSet::Tick,
                SimSet::Cycle,
                SimSet::Waves,
                SimSet::Player,
                SimSet::Zombies,
                SimSet::Damage,
                SimSet::Cleanup,
                SimSet::Ambient,
                SimSet::Publish,
            )
                .chain(),
        );
        app.add_systems(Update, advance_tick.in_set(SimSet::Tick));

        app.add_plugins((
            logging::LoggingPlugin,
            world::WorldPlugin,
            economy::EconomyPlugin,
            harvest::HarvestPlugin,
            buildings::BuildingsPlugin,
            combat::CombatPlugin,
            player::PlayerPlugin,
            zombies::ZombiesPlugin,
            engine::snapshot::SnapshotPlugin,
        ));
    }
}
