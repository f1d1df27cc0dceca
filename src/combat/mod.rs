//! Player-driven combat: the melee swing state machine, instant consumables,
//! ranged fire, and projectile flight/impact.
//!
//! A swing advances a fixed angular step per tick from 0 to a full turn and
//! lands exactly one hit per cycle, evaluated at the half-swing point with
//! the facing angle read *at that moment* — turning mid-swing moves the hit.

use bevy::math::bounding::IntersectsVolume;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::collision;
use crate::constants::{
    MELEE_PROBE_OFFSET, MELEE_PROBE_SIZE, PROJECTILE_LIFETIME_TICKS, PROJECTILE_SIZE,
    PROJECTILE_SPEED, SWING_STEP_RAD, ZOMBIE_SIZE,
};
use crate::economy::Wallet;
use crate::engine::{SimRng, SimSet, SimTick};
use crate::harvest::{node_bounds, NodeKind, ResourceNode};
use crate::health::Health;
use crate::player::{Player, PlayerInput};
use crate::tools::{ToolKind, Toolbelt};
use crate::zombies::Zombie;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (apply_tool_selection, update_swing)
                .chain()
                .in_set(SimSet::Player),
        )
        .add_systems(
            Update,
            (resolve_melee_hits, update_projectiles)
                .chain()
                .in_set(SimSet::Damage),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwingPhase {
    #[default]
    Idle,
    Swinging,
}

/// Per-player combat state.
#[derive(Component, Debug, Clone, Default)]
pub struct CombatState {
    pub phase: SwingPhase,
    /// Swing progress in radians, `[0, 2π)`
    pub swing_timer: f32,
    /// Whether this cycle's single hit already fired
    pub hit_consumed: bool,
    /// Hit angle captured at the half-swing evaluation, consumed by the
    /// damage stage in the same tick
    pub pending_hit_angle: Option<f32>,
    pub last_shot_tick: Option<u64>,
}

/// A projectile in flight, from the player's bow or a tower.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub angle: f32,
    pub speed: f32,
    pub damage: f32,
    pub ticks_remaining: u32,
    /// Player-sourced hits roll for aggro; tower-sourced hits do not
    pub from_player: bool,
}

fn apply_tool_selection(
    mut input: ResMut<PlayerInput>,
    mut players: Query<&mut Toolbelt, With<Player>>,
) {
    let Some(slot) = input.select_slot.take() else {
        return;
    };
    let Ok(mut belt) = players.get_single_mut() else {
        return;
    };
    belt.select_slot(slot);
}

fn update_swing(
    mut commands: Commands,
    tick: Res<SimTick>,
    mut input: ResMut<PlayerInput>,
    mut players: Query<(&Transform, &mut CombatState, &mut Toolbelt, &mut Health), With<Player>>,
) {
    let Ok((transform, mut state, mut belt, mut health)) = players.get_single_mut() else {
        return;
    };

    // holding the mouse cancels a prior space toggle
    if input.mouse_held && input.swing_toggle {
        input.swing_toggle = false;
    }
    let wants_action = input.mouse_held || input.swing_toggle;

    match state.phase {
        SwingPhase::Idle => {
            if !wants_action {
                return;
            }
            let tool = belt.active_tool();
            let (kind, level) = (tool.kind, tool.level);
            if !tool.unlocked {
                return;
            }
            match kind {
                ToolKind::HealthPotion => {
                    // instant consumable: no swing, single use
                    health.heal_full();
                    health.fill_shield(belt.armor_capacity());
                    belt.tool_mut(ToolKind::HealthPotion).unlocked = false;
                    belt.active_slot = 0;
                    input.swing_toggle = false;
                    tracing::info!("health potion consumed");
                }
                ToolKind::Bow => {
                    let interval = ToolKind::Bow.attack_interval_ticks(level);
                    let ready = state
                        .last_shot_tick
                        .map_or(true, |last| tick.0.saturating_sub(last) >= interval);
                    if ready {
                        commands.spawn((
                            Transform::from_translation(transform.translation),
                            Projectile {
                                angle: input.facing,
                                speed: PROJECTILE_SPEED,
                                damage: ToolKind::Bow.damage(level),
                                ticks_remaining: PROJECTILE_LIFETIME_TICKS,
                                from_player: true,
                            },
                        ));
                        state.last_shot_tick = Some(tick.0);
                    }
                }
                ToolKind::Armor => {}
                ToolKind::Pickaxe | ToolKind::Spear => {
                    state.phase = SwingPhase::Swinging;
                    state.swing_timer = 0.0;
                    state.hit_consumed = false;
                }
            }
        }
        SwingPhase::Swinging => {
            state.swing_timer += SWING_STEP_RAD;
            if !state.hit_consumed && state.swing_timer >= FRAC_PI_2 {
                state.hit_consumed = true;
                state.pending_hit_angle = Some(input.facing);
            }
            if state.swing_timer >= TAU {
                state.swing_timer = 0.0;
                state.hit_consumed = false;
                if !wants_action {
                    state.phase = SwingPhase::Idle;
                }
            }
        }
    }
}

/// Apply the swing's single hit: shake-and-harvest the first struck resource
/// node, damage every zombie overlapping the probe.
fn resolve_melee_hits(
    mut players: Query<(&Transform, &mut CombatState, &Toolbelt), With<Player>>,
    mut nodes: Query<(&Transform, &mut ResourceNode), Without<Player>>,
    mut zombies: Query<(&Transform, &mut Health, &mut Zombie), Without<Player>>,
    mut wallet: ResMut<Wallet>,
    mut rng: ResMut<SimRng>,
) {
    let Ok((transform, mut state, belt)) = players.get_single_mut() else {
        return;
    };
    let Some(angle) = state.pending_hit_angle.take() else {
        return;
    };
    let tool = belt.active_tool();
    let center = transform.translation.truncate() + Vec2::from_angle(angle) * MELEE_PROBE_OFFSET;
    let hit_probe = collision::probe(center, MELEE_PROBE_SIZE);

    let harvest = tool.kind.harvest_power(tool.level);
    if harvest > 0 {
        for (node_tf, mut node) in &mut nodes {
            if hit_probe.intersects(&node_bounds(node_tf.translation.truncate())) {
                node.strike();
                match node.kind {
                    NodeKind::Tree => wallet.credit_wood(harvest),
                    NodeKind::Stone => wallet.credit_stone(harvest),
                }
                break;
            }
        }
    }

    let damage = tool.kind.damage(tool.level);
    if damage > 0.0 {
        for (zombie_tf, mut health, mut zombie) in &mut zombies {
            let body = collision::probe(zombie_tf.translation.truncate(), ZOMBIE_SIZE);
            if hit_probe.intersects(&body) {
                health.take_damage(damage);
                zombie.register_player_hit(&mut rng.0);
            }
        }
    }
}

/// Advance every projectile one step, expire it, or expend it on the first
/// zombie it strikes.
fn update_projectiles(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Transform, &mut Projectile), Without<Zombie>>,
    mut zombies: Query<(&Transform, &mut Health, &mut Zombie)>,
    mut rng: ResMut<SimRng>,
) {
    for (entity, mut transform, mut projectile) in &mut projectiles {
        let step = Vec2::from_angle(projectile.angle) * projectile.speed;
        transform.translation += step.extend(0.0);
        projectile.ticks_remaining = projectile.ticks_remaining.saturating_sub(1);

        let probe = collision::probe(transform.translation.truncate(), PROJECTILE_SIZE);
        let mut struck = false;
        for (zombie_tf, mut health, mut zombie) in &mut zombies {
            let body = collision::probe(zombie_tf.translation.truncate(), ZOMBIE_SIZE);
            if probe.intersects(&body) {
                health.take_damage(projectile.damage);
                if projectile.from_player {
                    zombie.register_player_hit(&mut rng.0);
                }
                struck = true;
                break;
            }
        }
        if struck || projectile.ticks_remaining == 0 {
            commands.entity(entity).despawn();
        }
    }
}
