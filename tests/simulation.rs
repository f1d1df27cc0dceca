//! Full-loop simulation scenarios: day/night waves, zombie movement and
//! siege pressure, swings, harvesting, towers, regen, and determinism.

use bevy::prelude::*;
use nightfall_core::buildings::{BuildCommand, Building, BuildingKind};
use nightfall_core::combat::Projectile;
use nightfall_core::economy::Wallet;
use nightfall_core::engine::config::CoreConfig;
use nightfall_core::engine::snapshot::WorldSnapshot;
use nightfall_core::harvest::{NodeKind, ResourceNode};
use nightfall_core::health::Health;
use nightfall_core::player::{Player, PlayerInput};
use nightfall_core::tools::{ToolKind, Toolbelt};
use nightfall_core::world::DayPhase;
use nightfall_core::zombies::Zombie;
use nightfall_core::CorePlugin;

const SHORT_DAY: u32 = 40;

fn test_app(config: CoreConfig) -> App {
    let mut app = App::new();
    app.insert_resource(config);
    app.add_plugins(CorePlugin);
    app.update();
    app
}

fn bare_config() -> CoreConfig {
    CoreConfig {
        resource_node_count: 0,
        ..Default::default()
    }
}

fn run_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        app.update();
    }
}

fn place(app: &mut App, kind: BuildingKind, position: Vec2) {
    app.world_mut()
        .send_event(BuildCommand::Place { kind, position });
    app.update();
}

fn spawn_zombie(app: &mut App, position: Vec2, tier: u32, level: u32) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            Zombie::new(tier, level),
            Health::new(Zombie::max_health(tier, level)),
        ))
        .id()
}

fn zombie_count(app: &mut App) -> usize {
    let mut query = app.world_mut().query::<&Zombie>();
    query.iter(app.world()).count()
}

fn player_pos(app: &mut App) -> Vec2 {
    let mut query = app
        .world_mut()
        .query_filtered::<&Transform, With<Player>>();
    query.single(app.world()).translation.truncate()
}

#[test]
fn one_wave_per_night_scaled_by_wave_number() {
    let mut app = test_app(CoreConfig {
        day_length_ticks: SHORT_DAY,
        ..bare_config()
    });
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);

    // into the first night
    run_ticks(&mut app, SHORT_DAY / 2);
    assert_eq!(zombie_count(&mut app), 12, "wave 1 is 10 + 1*2");
    {
        let mut query = app.world_mut().query::<&Zombie>();
        for zombie in query.iter(app.world()) {
            assert_eq!((zombie.tier, zombie.level), (1, 1));
            assert!(!zombie.targeting_player);
        }
    }

    // the rest of the night must not spawn a second batch
    run_ticks(&mut app, 5);
    assert_eq!(zombie_count(&mut app), 12);

    // through the day into the second night
    run_ticks(&mut app, SHORT_DAY);
    assert_eq!(zombie_count(&mut app), 12 + 14, "wave 2 is 10 + 2*2");
}

#[test]
fn no_wave_spawns_without_a_stash() {
    let mut app = test_app(CoreConfig {
        day_length_ticks: SHORT_DAY,
        ..bare_config()
    });
    run_ticks(&mut app, SHORT_DAY * 2);
    assert_eq!(zombie_count(&mut app), 0);
}

#[test]
fn day_phase_tracks_the_clock() {
    let mut app = test_app(CoreConfig {
        day_length_ticks: SHORT_DAY,
        ..bare_config()
    });
    run_ticks(&mut app, SHORT_DAY / 4 + 1);
    assert_eq!(
        app.world().resource::<WorldSnapshot>().phase,
        DayPhase::Night
    );
    run_ticks(&mut app, SHORT_DAY / 2);
    assert_eq!(app.world().resource::<WorldSnapshot>().phase, DayPhase::Day);
}

#[test]
fn zombies_walk_toward_the_stash() {
    let mut app = test_app(bare_config());
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
    let zombie = spawn_zombie(&mut app, Vec2::new(500.0, 0.0), 1, 1);
    run_ticks(&mut app, 10);
    let x = app
        .world()
        .get::<Transform>(zombie)
        .expect("zombie alive")
        .translation
        .x;
    assert!((469.0..471.0).contains(&x), "expected ~470, got {x}");
}

#[test]
fn zombies_idle_without_any_target() {
    let mut app = test_app(bare_config());
    let zombie = spawn_zombie(&mut app, Vec2::new(500.0, 300.0), 1, 1);
    run_ticks(&mut app, 10);
    let pos = app
        .world()
        .get::<Transform>(zombie)
        .expect("zombie alive")
        .translation
        .truncate();
    assert_eq!(pos, Vec2::new(500.0, 300.0));
}

#[test]
fn blocked_zombies_grind_down_the_wall() {
    let mut app = test_app(bare_config());
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
    place(&mut app, BuildingKind::Wall, Vec2::new(100.0, 0.0));
    let wall = {
        let mut query = app.world_mut().query::<(Entity, &Building)>();
        query
            .iter(app.world())
            .find(|(_, b)| b.kind == BuildingKind::Wall)
            .map(|(e, _)| e)
            .expect("wall placed")
    };
    spawn_zombie(&mut app, Vec2::new(160.0, 0.0), 1, 1);

    run_ticks(&mut app, 20);
    let health = app.world().get::<Health>(wall).expect("wall alive");
    assert!(
        health.current < BuildingKind::Wall.base_health(),
        "a blocked zombie must damage the wall"
    );
}

#[test]
fn a_wall_placed_after_a_door_still_blocks() {
    let mut app = test_app(bare_config());
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
    // door first in placement order, wall second, same cell
    place(&mut app, BuildingKind::Door, Vec2::new(100.0, 0.0));
    place(&mut app, BuildingKind::Wall, Vec2::new(100.0, 0.0));

    let zombie = spawn_zombie(&mut app, Vec2::new(160.0, 0.0), 1, 1);
    run_ticks(&mut app, 20);

    let x = app
        .world()
        .get::<Transform>(zombie)
        .expect("zombie alive")
        .translation
        .x;
    assert!(x > 130.0, "the wall must stop the zombie, got x={x}");

    let mut query = app.world_mut().query::<(&Building, &Health)>();
    for (building, health) in query.iter(app.world()) {
        match building.kind {
            BuildingKind::Wall => assert!(health.current < health.max),
            BuildingKind::Door => assert_eq!(health.current, health.max),
            _ => {}
        }
    }
}

#[test]
fn slow_traps_halve_zombie_speed() {
    let mut app = test_app(bare_config());
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
    place(&mut app, BuildingKind::SlowTrap, Vec2::new(500.0, 0.0));
    let zombie = spawn_zombie(&mut app, Vec2::new(500.0, 0.0), 1, 1);
    app.update();
    let x = app
        .world()
        .get::<Transform>(zombie)
        .expect("zombie alive")
        .translation
        .x;
    assert!((498.4..498.6).contains(&x), "expected ~498.5, got {x}");
}

#[test]
fn zombies_in_contact_chip_the_player() {
    let mut app = test_app(bare_config());
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
    // overlapping the player at the origin
    spawn_zombie(&mut app, Vec2::new(30.0, 0.0), 1, 1);
    run_ticks(&mut app, 10);
    let mut query = app
        .world_mut()
        .query_filtered::<&Health, With<Player>>();
    let health = query.single(app.world());
    assert!(health.current < 100.0);
    assert!(health.current >= 89.0, "contact damage is damage/10 per tick");
}

#[test]
fn player_movement_is_blocked_by_solid_buildings() {
    let mut app = test_app(bare_config());
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
    place(&mut app, BuildingKind::Wall, Vec2::new(60.0, 100.0));
    // stash is solid too; start clear of it
    {
        let mut query = app
            .world_mut()
            .query_filtered::<&mut Transform, With<Player>>();
        query.single_mut(app.world_mut()).translation = Vec3::new(0.0, 100.0, 0.0);
    }
    app.world_mut().resource_mut::<PlayerInput>().right = true;
    run_ticks(&mut app, 10);
    assert_eq!(player_pos(&mut app), Vec2::new(20.0, 100.0));
}

#[test]
fn swing_harvests_the_facing_node_and_shakes_it() {
    let mut app = test_app(bare_config());
    let node = app
        .world_mut()
        .spawn((
            Transform::from_translation(Vec3::new(100.0, 0.0, 0.0)),
            ResourceNode::new(NodeKind::Tree),
        ))
        .id();
    let wood_before = app.world().resource::<Wallet>().wood;

    {
        let mut input = app.world_mut().resource_mut::<PlayerInput>();
        input.mouse_held = true;
        input.facing = 0.0;
    }
    run_ticks(&mut app, 12);

    assert_eq!(app.world().resource::<Wallet>().wood, wood_before + 1);
    let shake = app
        .world()
        .get::<ResourceNode>(node)
        .expect("node exists")
        .shake;
    assert!(shake > 0.0, "a struck node must be shaking");
}

#[test]
fn mid_swing_turns_move_the_hit() {
    let mut app = test_app(bare_config());
    app.world_mut().spawn((
        Transform::from_translation(Vec3::new(100.0, 0.0, 0.0)),
        ResourceNode::new(NodeKind::Tree),
    ));
    let wood_before = app.world().resource::<Wallet>().wood;

    // start the swing facing away from the node
    {
        let mut input = app.world_mut().resource_mut::<PlayerInput>();
        input.mouse_held = true;
        input.facing = std::f32::consts::PI;
    }
    run_ticks(&mut app, 4);
    // turn toward the node before the half-swing evaluation
    app.world_mut().resource_mut::<PlayerInput>().facing = 0.0;
    run_ticks(&mut app, 8);

    assert_eq!(
        app.world().resource::<Wallet>().wood,
        wood_before + 1,
        "the hit must use the facing at evaluation time"
    );
}

#[test]
fn melee_swings_wound_zombies_in_the_probe() {
    let mut app = test_app(bare_config());
    let zombie = spawn_zombie(&mut app, Vec2::new(65.0, 0.0), 1, 1);
    {
        let mut input = app.world_mut().resource_mut::<PlayerInput>();
        input.select_slot = Some(1); // spear
        input.mouse_held = true;
        input.facing = 0.0;
    }
    run_ticks(&mut app, 12);
    let health = app.world().get::<Health>(zombie).expect("zombie alive");
    assert_eq!(health.current, 70.0 - ToolKind::Spear.damage(1));
}

#[test]
fn bow_fire_is_rate_limited() {
    let mut app = test_app(bare_config());
    {
        let mut query = app
            .world_mut()
            .query_filtered::<&mut Toolbelt, With<Player>>();
        let mut belt = query.single_mut(app.world_mut());
        belt.tool_mut(ToolKind::Bow).unlocked = true;
    }
    {
        let mut input = app.world_mut().resource_mut::<PlayerInput>();
        input.select_slot = Some(2);
        input.mouse_held = true;
        input.facing = 0.0;
    }
    run_ticks(&mut app, 5);
    let mut query = app.world_mut().query::<&Projectile>();
    assert_eq!(query.iter(app.world()).count(), 1, "cooldown must gate fire");

    run_ticks(&mut app, 30);
    let mut query = app.world_mut().query::<&Projectile>();
    assert_eq!(query.iter(app.world()).count(), 2);
}

#[test]
fn projectiles_expire_at_end_of_life() {
    let mut app = test_app(bare_config());
    app.world_mut().spawn((
        Transform::default(),
        Projectile {
            angle: 0.0,
            speed: 0.0,
            damage: 1.0,
            ticks_remaining: 5,
            from_player: false,
        },
    ));
    run_ticks(&mut app, 6);
    let mut query = app.world_mut().query::<&Projectile>();
    assert_eq!(query.iter(app.world()).count(), 0);
}

#[test]
fn arrow_towers_shoot_zombies_down() {
    let mut app = test_app(bare_config());
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
    place(&mut app, BuildingKind::ArrowTower, Vec2::new(200.0, 0.0));
    // parked against the stash: a stationary target inside tower range
    let zombie = spawn_zombie(&mut app, Vec2::new(30.0, 0.0), 1, 1);
    // tier 1 / level 1: 70 hp, arrow tower level 1: 10 damage per shot
    run_ticks(&mut app, 400);
    assert!(
        app.world().get::<Health>(zombie).is_none(),
        "the tower must eventually kill the zombie"
    );
}

#[test]
fn bomb_towers_detonate_once_and_self_destruct() {
    let mut app = test_app(bare_config());
    place(&mut app, BuildingKind::GoldStash, Vec2::new(-600.0, 0.0));
    place(&mut app, BuildingKind::BombTower, Vec2::new(0.0, 300.0));
    let zombie = spawn_zombie(&mut app, Vec2::new(50.0, 300.0), 1, 1);
    run_ticks(&mut app, 3);
    // blast: 90 damage vs 70 hp
    assert!(app.world().get::<Health>(zombie).is_none());
    let mut query = app.world_mut().query::<&Building>();
    assert!(
        query
            .iter(app.world())
            .all(|b| b.kind != BuildingKind::BombTower),
        "the tower must consume itself"
    );
}

#[test]
fn mines_and_harvesters_trickle_income() {
    let mut app = test_app(bare_config());
    {
        let mut wallet = app.world_mut().resource_mut::<Wallet>();
        wallet.wood = 1000;
        wallet.stone = 1000;
    }
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
    place(&mut app, BuildingKind::GoldMine, Vec2::new(200.0, 0.0));
    place(&mut app, BuildingKind::Harvester, Vec2::new(300.0, 0.0));
    let before = *app.world().resource::<Wallet>();
    run_ticks(&mut app, 160);
    let after = *app.world().resource::<Wallet>();
    assert_eq!(after.gold, before.gold + 5);
    assert_eq!(after.wood, before.wood + 3);
    assert_eq!(after.stone, before.stone + 3);
}

#[test]
fn shield_regenerates_to_the_armor_cap() {
    let mut app = test_app(bare_config());
    {
        let mut query = app
            .world_mut()
            .query_filtered::<&mut Toolbelt, With<Player>>();
        let mut belt = query.single_mut(app.world_mut());
        belt.tool_mut(ToolKind::Armor).unlocked = true;
    }
    // armor level 1 caps at 100; 5 points every 5 ticks
    run_ticks(&mut app, 150);
    let mut query = app
        .world_mut()
        .query_filtered::<&Health, With<Player>>();
    let health = query.single(app.world());
    assert_eq!(health.shield, 100.0);
}

#[test]
fn same_seed_same_world() {
    let build = || {
        let mut app = test_app(CoreConfig {
            seed: 1234,
            day_length_ticks: SHORT_DAY,
            resource_node_count: 10,
            ..Default::default()
        });
        place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
        run_ticks(&mut app, 120);
        app.world()
            .resource::<WorldSnapshot>()
            .to_json()
            .expect("snapshot serializes")
    };
    assert_eq!(build(), build());
}

#[test]
fn snapshot_reflects_the_world() {
    let mut app = test_app(CoreConfig {
        resource_node_count: 5,
        ..Default::default()
    });
    place(&mut app, BuildingKind::GoldStash, Vec2::ZERO);
    app.update();
    let snapshot = app.world().resource::<WorldSnapshot>();
    assert_eq!(snapshot.resources.len(), 5);
    assert_eq!(snapshot.buildings.len(), 1);
    assert_eq!(snapshot.buildings[0].kind, BuildingKind::GoldStash);
    assert_eq!(snapshot.player.max_health, 100.0);
    assert!(snapshot.tick > 0);
}
