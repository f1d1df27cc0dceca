//! Active building behaviors: towers, traps, and passive income.
//!
//! Towers act on an interval timer; damage and pacing scale with building
//! level. Tower-sourced damage never aggros a zombie onto the player.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Building, BuildingKind};
use crate::combat::Projectile;
use crate::constants::{PROJECTILE_LIFETIME_TICKS, PROJECTILE_SPEED};
use crate::economy::Wallet;
use crate::health::Health;
use crate::zombies::Zombie;

/// Ticks between bomb-tower trigger checks is every tick; these bound the
/// one-shot detonation itself.
const BOMB_TRIGGER_RANGE: f32 = 80.0;
const BOMB_BLAST_RADIUS: f32 = 150.0;

/// Interval-driven work state for towers, mines, and harvesters.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct ActionTimer {
    pub remaining: u32,
}

impl ActionTimer {
    pub fn new(kind: BuildingKind, level: u32) -> Self {
        Self {
            remaining: action_interval(kind, level).unwrap_or(0),
        }
    }
}

/// Ranged/melee tower stats at `level`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackProfile {
    pub damage: f32,
    pub range: f32,
}

pub fn attack_profile(kind: BuildingKind, level: u32) -> Option<AttackProfile> {
    let level = level as f32;
    match kind {
        BuildingKind::ArrowTower => Some(AttackProfile {
            damage: 6.0 + 4.0 * level,
            range: 300.0,
        }),
        BuildingKind::CannonTower => Some(AttackProfile {
            damage: 25.0 + 15.0 * level,
            range: 350.0,
        }),
        BuildingKind::MageTower => Some(AttackProfile {
            damage: 15.0 + 8.0 * level,
            range: 320.0,
        }),
        BuildingKind::MeleeTower => Some(AttackProfile {
            damage: 10.0 + 5.0 * level,
            range: 90.0,
        }),
        _ => None,
    }
}

/// Ticks between actions for interval-driven kinds.
pub fn action_interval(kind: BuildingKind, level: u32) -> Option<u32> {
    match kind {
        BuildingKind::ArrowTower => Some(25_u32.saturating_sub(level)),
        BuildingKind::CannonTower => Some(80_u32.saturating_sub(5 * level)),
        BuildingKind::MageTower => Some(45_u32.saturating_sub(3 * level)),
        BuildingKind::MeleeTower => Some(20),
        BuildingKind::GoldMine | BuildingKind::Harvester => Some(150),
        _ => None,
    }
}

/// Interval-gated tower fire: ranged kinds emit a projectile at the nearest
/// zombie in range, the melee tower hits everything in reach at once.
pub fn tower_attacks(
    mut commands: Commands,
    mut towers: Query<(&Transform, &Building, &mut ActionTimer)>,
    mut zombies: Query<(&Transform, &mut Health), With<Zombie>>,
) {
    for (tower_tf, building, mut timer) in &mut towers {
        let Some(profile) = attack_profile(building.kind, building.level) else {
            continue;
        };
        if timer.remaining > 0 {
            timer.remaining -= 1;
            continue;
        }

        let origin = tower_tf.translation.truncate();
        let acted = match building.kind {
            BuildingKind::MeleeTower => {
                let mut hit_any = false;
                for (zombie_tf, mut health) in &mut zombies {
                    let pos = zombie_tf.translation.truncate();
                    if origin.distance(pos) <= profile.range {
                        health.take_damage(profile.damage);
                        hit_any = true;
                    }
                }
                hit_any
            }
            _ => {
                let nearest = zombies
                    .iter()
                    .map(|(tf, _)| tf.translation.truncate())
                    .filter(|pos| origin.distance(*pos) <= profile.range)
                    .min_by(|a, b| origin.distance(*a).total_cmp(&origin.distance(*b)));
                if let Some(target) = nearest {
                    commands.spawn((
                        Transform::from_translation(origin.extend(0.0)),
                        Projectile {
                            angle: (target - origin).to_angle(),
                            speed: PROJECTILE_SPEED,
                            damage: profile.damage,
                            ticks_remaining: PROJECTILE_LIFETIME_TICKS,
                            from_player: false,
                        },
                    ));
                }
                nearest.is_some()
            }
        };

        // hold fire (and the timer) until a target is actually in range
        if acted {
            timer.remaining = action_interval(building.kind, building.level).unwrap_or(0);
        }
    }
}

/// Bomb towers detonate once when a zombie wanders into trigger range,
/// damaging everything in the blast and destroying themselves.
pub fn bomb_detonations(
    mut towers: Query<(&Transform, &Building, &mut Health), Without<Zombie>>,
    mut zombies: Query<(&Transform, &mut Health), With<Zombie>>,
) {
    for (tower_tf, building, mut tower_health) in &mut towers {
        if building.kind != BuildingKind::BombTower || !tower_health.is_alive() {
            continue;
        }
        let origin = tower_tf.translation.truncate();
        let triggered = zombies
            .iter()
            .any(|(tf, _)| origin.distance(tf.translation.truncate()) <= BOMB_TRIGGER_RANGE);
        if !triggered {
            continue;
        }

        let damage = 60.0 + 30.0 * building.level as f32;
        let mut caught = 0;
        for (zombie_tf, mut health) in &mut zombies {
            if origin.distance(zombie_tf.translation.truncate()) <= BOMB_BLAST_RADIUS {
                health.take_damage(damage);
                caught += 1;
            }
        }
        tower_health.current = 0.0;
        tracing::info!(caught, "bomb tower detonated");
    }
}

/// Mines and harvesters trickle resources into the wallet.
pub fn passive_income(
    mut wallet: ResMut<Wallet>,
    mut buildings: Query<(&Building, &mut ActionTimer)>,
) {
    for (building, mut timer) in &mut buildings {
        if !matches!(
            building.kind,
            BuildingKind::GoldMine | BuildingKind::Harvester
        ) {
            continue;
        }
        if timer.remaining > 0 {
            timer.remaining -= 1;
            continue;
        }
        if building.kind == BuildingKind::GoldMine {
            wallet.credit_gold(5 * building.level);
        } else {
            wallet.credit_wood(3 * building.level);
            wallet.credit_stone(3 * building.level);
        }
        timer.remaining = action_interval(building.kind, building.level).unwrap_or(0);
    }
}
