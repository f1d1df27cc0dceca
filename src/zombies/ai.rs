//! Per-tick zombie behavior: target selection, per-axis movement with
//! solid-obstacle blocking, and contact damage.
//!
//! Movement is resolved one axis at a time (x, then y), so a zombie blocked
//! head-on still slides along the obstacle. A blocked axis step grinds the
//! blocking building down with the zombie's contact damage.

use bevy::math::bounding::IntersectsVolume;
use bevy::prelude::*;

use super::Zombie;
use crate::buildings::{building_bounds, Building, BuildingKind};
use crate::collision;
use crate::constants::{PLAYER_SIZE, SLOW_TRAP_FACTOR, ZOMBIE_SIZE, ZOMBIE_SPEED};
use crate::health::Health;
use crate::player::Player;

pub fn update_zombies(
    mut zombies: Query<(&mut Transform, &Zombie), (Without<Player>, Without<Building>)>,
    mut players: Query<(&Transform, &mut Health), With<Player>>,
    mut buildings: Query<
        (Entity, &Transform, &Building, &mut Health),
        (Without<Player>, Without<Zombie>),
    >,
) {
    let stash = buildings
        .iter()
        .find(|(_, _, b, _)| b.kind.is_unlocker())
        .map(|(_, tf, _, _)| tf.translation.truncate());
    let player = players
        .get_single_mut()
        .ok()
        .map(|(tf, health)| (tf.translation.truncate(), health));
    let player_pos = player.as_ref().map(|(pos, _)| *pos);
    let mut player_health = player.map(|(_, health)| health);

    for (mut transform, zombie) in &mut zombies {
        let pos = transform.translation.truncate();

        let target = if zombie.targeting_player {
            player_pos
        } else {
            stash
        };
        // no target, no movement
        let Some(target) = target else {
            continue;
        };

        let body = collision::probe(pos, ZOMBIE_SIZE);
        let slowed = buildings.iter().any(|(_, tf, b, _)| {
            b.kind == BuildingKind::SlowTrap
                && body.intersects(&building_bounds(tf.translation.truncate()))
        });
        let speed = ZOMBIE_SPEED * if slowed { SLOW_TRAP_FACTOR } else { 1.0 };
        let dir = (target - pos).normalize_or_zero();

        let mut new_pos = pos;
        let mut attacked: Option<Entity> = None;
        for step in [Vec2::new(dir.x * speed, 0.0), Vec2::new(0.0, dir.y * speed)] {
            if step == Vec2::ZERO {
                continue;
            }
            let candidate = new_pos + step;
            let probe = collision::probe(candidate, ZOMBIE_SIZE);
            let mut blocked = false;
            for (entity, building_tf, building, mut building_health) in &mut buildings {
                // doors and slow traps are walked through; keep scanning
                if !building.kind.is_solid() {
                    continue;
                }
                if probe.intersects(&building_bounds(building_tf.translation.truncate())) {
                    // one gnaw per building per tick, even when both axes jam
                    if attacked != Some(entity) {
                        building_health.take_damage(zombie.contact_damage());
                        attacked = Some(entity);
                    }
                    blocked = true;
                    break;
                }
            }
            if !blocked {
                new_pos = candidate;
            }
        }
        transform.translation = new_pos.extend(0.0);

        // continuous contact damage while overlapping the player
        if let (Some(player_pos), Some(health)) = (player_pos, player_health.as_mut()) {
            let zombie_box = collision::probe(new_pos, ZOMBIE_SIZE);
            if zombie_box.intersects(&collision::probe(player_pos, PLAYER_SIZE)) {
                health.take_damage(zombie.contact_damage());
            }
        }
    }
}
