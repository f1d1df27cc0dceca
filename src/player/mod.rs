//! Player entity: movement with per-axis blocking, shield regeneration, and
//! the input intent surface written by the embedding input layer.

use bevy::prelude::*;

use crate::buildings::{building_bounds, Building};
use crate::collision;
use crate::combat::CombatState;
use crate::constants::{PLAYER_MAX_HEALTH, PLAYER_MOVE_SPEED, PLAYER_SIZE,
    SHIELD_REGEN_INTERVAL_TICKS};
use crate::engine::{SimSet, SimTick};
use crate::harvest::{node_bounds, ResourceNode};
use crate::health::Health;
use crate::tools::Toolbelt;
use crate::world::WorldBounds;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (apply_player_movement, regen_shield).in_set(SimSet::Player),
            );
    }
}

/// Marker for the player entity.
#[derive(Component, Debug)]
pub struct Player {
    pub name: String,
}

/// Movement/action intents, written each frame by the input collaborator.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Space-toggled swing hold; cleared when the mouse takes over
    pub swing_toggle: bool,
    pub mouse_held: bool,
    /// Facing angle in radians, recomputed by the input layer from the cursor
    pub facing: f32,
    /// One-shot toolbelt slot selection; consumed by the core
    pub select_slot: Option<usize>,
}

/// Tracks the last shield regeneration event.
#[derive(Component, Debug, Default)]
pub struct ShieldRegen {
    pub last_regen_tick: u64,
}

fn spawn_player(mut commands: Commands) {
    commands.spawn((
        Transform::default(),
        Player {
            name: "Survivor".into(),
        },
        Health::new(PLAYER_MAX_HEALTH),
        Toolbelt::default(),
        CombatState::default(),
        ShieldRegen::default(),
    ));
}

/// Per-axis movement: x then y, each committed only when the moved box
/// overlaps no resource node and no solid building. Doors and slow traps are
/// skipped by the solidity filter, so walls placed after them still block.
fn apply_player_movement(
    input: Res<PlayerInput>,
    bounds: Res<WorldBounds>,
    mut players: Query<&mut Transform, With<Player>>,
    buildings: Query<(&Transform, &Building), Without<Player>>,
    nodes: Query<&Transform, (With<ResourceNode>, Without<Player>)>,
) {
    let Ok(mut transform) = players.get_single_mut() else {
        return;
    };
    let dx = (input.right as i32 - input.left as i32) as f32 * PLAYER_MOVE_SPEED;
    let dy = (input.up as i32 - input.down as i32) as f32 * PLAYER_MOVE_SPEED;
    if dx == 0.0 && dy == 0.0 {
        return;
    }

    let mut pos = transform.translation.truncate();
    for step in [Vec2::new(dx, 0.0), Vec2::new(0.0, dy)] {
        if step == Vec2::ZERO {
            continue;
        }
        let candidate = bounds.clamp_point(pos + step);
        let probe = collision::probe(candidate, PLAYER_SIZE);
        let blocked = collision::blocked_by_any(
            probe,
            buildings
                .iter()
                .filter(|(_, b)| b.kind.is_solid())
                .map(|(tf, _)| building_bounds(tf.translation.truncate())),
        ) || collision::blocked_by_any(
            probe,
            nodes.iter().map(|tf| node_bounds(tf.translation.truncate())),
        );
        if !blocked {
            pos = candidate;
        }
    }
    transform.translation = pos.extend(0.0);
}

/// Shield points restored per regeneration event for a given armor cap.
pub fn regen_rate(cap: f32) -> f32 {
    if cap <= 1000.0 {
        5.0
    } else if cap <= 10000.0 {
        50.0
    } else {
        500.0
    }
}

fn regen_shield(
    tick: Res<SimTick>,
    mut players: Query<(&Toolbelt, &mut Health, &mut ShieldRegen), With<Player>>,
) {
    let Ok((belt, mut health, mut regen)) = players.get_single_mut() else {
        return;
    };
    let cap = belt.armor_capacity();
    if cap <= 0.0 || health.shield >= cap {
        return;
    }
    if tick.0.saturating_sub(regen.last_regen_tick) < SHIELD_REGEN_INTERVAL_TICKS {
        return;
    }
    health.shield = (health.shield + regen_rate(cap)).min(cap);
    regen.last_regen_tick = tick.0;
}
