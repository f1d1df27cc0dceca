//! Per-tick world snapshot for presentation collaborators.
//!
//! Rebuilt at the end of every tick and exposed both as a resource and as
//! JSON for non-Rust consumers. Building ids round-trip into upgrade/sell
//! commands via `Entity::to_bits`/`from_bits`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buildings::{Building, BuildingKind};
use crate::combat::{CombatState, Projectile, SwingPhase};
use crate::economy::Wallet;
use crate::engine::{SimSet, SimTick};
use crate::harvest::{NodeKind, ResourceNode};
use crate::health::Health;
use crate::player::Player;
use crate::tools::Toolbelt;
use crate::world::{DayNightCycle, DayPhase};
use crate::zombies::{WaveDirector, Zombie};

pub struct SnapshotPlugin;

impl Plugin for SnapshotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WorldSnapshot>()
            .add_systems(Update, publish_snapshot.in_set(SimSet::Publish));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2Msg {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for Vec2Msg {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerMsg {
    pub position: Vec2Msg,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub active_slot: usize,
    pub active_tool: String,
    pub swinging: bool,
    pub swing_timer: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZombieMsg {
    pub position: Vec2Msg,
    pub tier: u32,
    pub level: u32,
    pub health: f32,
    pub targeting_player: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileMsg {
    pub position: Vec2Msg,
    pub angle: f32,
    pub from_player: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingMsg {
    /// Stable id, valid in upgrade/sell commands via `Entity::from_bits`
    pub id: u64,
    pub kind: BuildingKind,
    pub level: u32,
    pub health: f32,
    pub max_health: f32,
    pub position: Vec2Msg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNodeMsg {
    pub position: Vec2Msg,
    pub kind: NodeKind,
    pub shake: f32,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub time_of_day: f32,
    pub phase: DayPhase,
    pub wave_count: u32,
    pub wallet: Wallet,
    pub player: PlayerMsg,
    pub zombies: Vec<ZombieMsg>,
    pub projectiles: Vec<ProjectileMsg>,
    pub buildings: Vec<BuildingMsg>,
    pub resources: Vec<ResourceNodeMsg>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[allow(clippy::too_many_arguments)]
fn publish_snapshot(
    tick: Res<SimTick>,
    cycle: Res<DayNightCycle>,
    director: Res<WaveDirector>,
    wallet: Res<Wallet>,
    mut snapshot: ResMut<WorldSnapshot>,
    players: Query<(&Transform, &Health, &Toolbelt, &CombatState), With<Player>>,
    zombies: Query<(&Transform, &Zombie, &Health)>,
    projectiles: Query<(&Transform, &Projectile)>,
    buildings: Query<(Entity, &Transform, &Building, &Health)>,
    nodes: Query<(&Transform, &ResourceNode)>,
) {
    snapshot.tick = tick.0;
    snapshot.time_of_day = cycle.time_of_day;
    snapshot.phase = cycle.phase;
    snapshot.wave_count = director.wave_count;
    snapshot.wallet = *wallet;

    if let Ok((transform, health, belt, combat)) = players.get_single() {
        snapshot.player = PlayerMsg {
            position: transform.translation.truncate().into(),
            health: health.current,
            max_health: health.max,
            shield: health.shield,
            active_slot: belt.active_slot,
            active_tool: belt.active_tool().kind.name().to_owned(),
            swinging: combat.phase == SwingPhase::Swinging,
            swing_timer: combat.swing_timer,
        };
    }

    snapshot.zombies = zombies
        .iter()
        .map(|(tf, zombie, health)| ZombieMsg {
            position: tf.translation.truncate().into(),
            tier: zombie.tier,
            level: zombie.level,
            health: health.current,
            targeting_player: zombie.targeting_player,
        })
        .collect();

    snapshot.projectiles = projectiles
        .iter()
        .map(|(tf, projectile)| ProjectileMsg {
            position: tf.translation.truncate().into(),
            angle: projectile.angle,
            from_player: projectile.from_player,
        })
        .collect();

    snapshot.buildings = buildings
        .iter()
        .map(|(entity, tf, building, health)| BuildingMsg {
            id: entity.to_bits(),
            kind: building.kind,
            level: building.level,
            health: health.current,
            max_health: health.max,
            position: tf.translation.truncate().into(),
        })
        .collect();

    snapshot.resources = nodes
        .iter()
        .map(|(tf, node)| ResourceNodeMsg {
            position: tf.translation.truncate().into(),
            kind: node.kind,
            shake: node.shake,
        })
        .collect();
}
