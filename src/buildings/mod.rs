//! Building catalog, placement rules, upgrades, and selling.
//!
//! A catalog resource holds one template per kind with the session-wide
//! unlock state; placing clones the template into an ECS entity. All command
//! failures are rejection-as-no-op: typed error, log line, rejection event,
//! no state change.

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::collision;
use crate::constants::{BUILDING_MAX_LEVEL, BUILDING_SIZE, UPGRADE_HEALTH_SCALE};
use crate::economy::{ResourceCost, Wallet};
use crate::engine::SimSet;
use crate::health::Health;

pub mod defense;

pub struct BuildingsPlugin;

impl Plugin for BuildingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BuildingCatalog>()
            .add_event::<BuildCommand>()
            .add_event::<BuildRejected>()
            .add_systems(Update, process_build_commands.in_set(SimSet::Player))
            .add_systems(
                Update,
                (defense::tower_attacks, defense::bomb_detonations).in_set(SimSet::Damage),
            )
            .add_systems(Update, despawn_destroyed_buildings.in_set(SimSet::Cleanup))
            .add_systems(Update, defense::passive_income.in_set(SimSet::Ambient));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Wall,
    Door,
    SlowTrap,
    ArrowTower,
    BombTower,
    MeleeTower,
    CannonTower,
    MageTower,
    GoldMine,
    Harvester,
    GoldStash,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 11] = [
        BuildingKind::Wall,
        BuildingKind::Door,
        BuildingKind::SlowTrap,
        BuildingKind::ArrowTower,
        BuildingKind::BombTower,
        BuildingKind::MeleeTower,
        BuildingKind::CannonTower,
        BuildingKind::MageTower,
        BuildingKind::GoldMine,
        BuildingKind::Harvester,
        BuildingKind::GoldStash,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::Wall => "Wall",
            BuildingKind::Door => "Door",
            BuildingKind::SlowTrap => "Slow Trap",
            BuildingKind::ArrowTower => "Arrow Tower",
            BuildingKind::BombTower => "Bomb Tower",
            BuildingKind::MeleeTower => "Melee Tower",
            BuildingKind::CannonTower => "Cannon Tower",
            BuildingKind::MageTower => "Mage Tower",
            BuildingKind::GoldMine => "Gold Mine",
            BuildingKind::Harvester => "Harvester",
            BuildingKind::GoldStash => "Gold Stash",
        }
    }

    /// The stash is the singleton prerequisite for everything else.
    pub fn is_unlocker(self) -> bool {
        matches!(self, BuildingKind::GoldStash)
    }

    pub fn can_be_sold(self) -> bool {
        !self.is_unlocker()
    }

    /// Solid buildings block movement; doors and slow traps do not.
    pub fn is_solid(self) -> bool {
        !matches!(self, BuildingKind::Door | BuildingKind::SlowTrap)
    }

    /// Maximum simultaneous placed instances.
    pub fn limit(self) -> u32 {
        match self {
            BuildingKind::Wall => 50,
            BuildingKind::Door => 4,
            BuildingKind::SlowTrap => 6,
            BuildingKind::ArrowTower => 8,
            BuildingKind::BombTower => 4,
            BuildingKind::MeleeTower => 6,
            BuildingKind::CannonTower => 6,
            BuildingKind::MageTower => 4,
            BuildingKind::GoldMine => 4,
            BuildingKind::Harvester => 3,
            BuildingKind::GoldStash => 1,
        }
    }

    pub fn base_health(self) -> f32 {
        match self {
            BuildingKind::Wall => 300.0,
            BuildingKind::Door => 200.0,
            BuildingKind::SlowTrap => 100.0,
            BuildingKind::ArrowTower => 200.0,
            BuildingKind::BombTower => 150.0,
            BuildingKind::MeleeTower => 250.0,
            BuildingKind::CannonTower => 220.0,
            BuildingKind::MageTower => 180.0,
            BuildingKind::GoldMine => 150.0,
            BuildingKind::Harvester => 150.0,
            BuildingKind::GoldStash => 500.0,
        }
    }

    pub fn base_cost(self) -> ResourceCost {
        match self {
            BuildingKind::Wall => ResourceCost::new(2, 0),
            BuildingKind::Door => ResourceCost::new(4, 2),
            BuildingKind::SlowTrap => ResourceCost::new(6, 4),
            BuildingKind::ArrowTower => ResourceCost::new(10, 6),
            BuildingKind::BombTower => ResourceCost::new(12, 10),
            BuildingKind::MeleeTower => ResourceCost::new(10, 8),
            BuildingKind::CannonTower => ResourceCost::new(14, 12),
            BuildingKind::MageTower => ResourceCost::new(16, 14),
            BuildingKind::GoldMine => ResourceCost::new(10, 10),
            BuildingKind::Harvester => ResourceCost::new(12, 8),
            BuildingKind::GoldStash => ResourceCost::new(0, 0),
        }
    }

    /// Per-level upgrade prices; index = level - 1. The final entry exists
    /// only as the sell-value reference for max-level buildings.
    pub fn upgrade_costs(self) -> [UpgradeCost; 7] {
        const fn c(wood: u32, stone: u32, gold: u32) -> UpgradeCost {
            UpgradeCost { wood, stone, gold }
        }
        match self {
            BuildingKind::Wall => [
                c(4, 0, 0),
                c(8, 2, 0),
                c(14, 6, 0),
                c(24, 12, 2),
                c(40, 24, 5),
                c(70, 45, 10),
                c(120, 80, 20),
            ],
            BuildingKind::Door => [
                c(8, 4, 0),
                c(14, 8, 0),
                c(24, 14, 2),
                c(40, 24, 5),
                c(70, 45, 10),
                c(120, 80, 18),
                c(200, 140, 35),
            ],
            BuildingKind::SlowTrap => [
                c(12, 8, 0),
                c(20, 14, 2),
                c(34, 24, 4),
                c(55, 40, 8),
                c(90, 70, 15),
                c(150, 120, 28),
                c(250, 200, 50),
            ],
            BuildingKind::ArrowTower => [
                c(20, 12, 2),
                c(34, 22, 4),
                c(55, 38, 8),
                c(90, 65, 15),
                c(150, 110, 28),
                c(250, 190, 50),
                c(400, 320, 90),
            ],
            BuildingKind::BombTower => [
                c(24, 20, 3),
                c(40, 34, 6),
                c(65, 55, 10),
                c(110, 90, 18),
                c(180, 150, 32),
                c(300, 250, 60),
                c(500, 420, 110),
            ],
            BuildingKind::MeleeTower => [
                c(20, 16, 2),
                c(34, 28, 4),
                c(55, 45, 8),
                c(90, 75, 15),
                c(150, 125, 28),
                c(250, 210, 50),
                c(400, 340, 90),
            ],
            BuildingKind::CannonTower => [
                c(28, 24, 4),
                c(48, 40, 8),
                c(80, 65, 14),
                c(130, 110, 24),
                c(210, 180, 42),
                c(350, 300, 75),
                c(580, 500, 130),
            ],
            BuildingKind::MageTower => [
                c(32, 28, 5),
                c(55, 48, 10),
                c(90, 80, 18),
                c(150, 130, 30),
                c(250, 215, 52),
                c(420, 360, 90),
                c(700, 600, 160),
            ],
            BuildingKind::GoldMine => [
                c(20, 20, 0),
                c(34, 34, 0),
                c(55, 55, 5),
                c(90, 90, 10),
                c(150, 150, 20),
                c(250, 250, 40),
                c(400, 400, 75),
            ],
            BuildingKind::Harvester => [
                c(24, 16, 0),
                c(40, 28, 0),
                c(65, 45, 5),
                c(110, 75, 10),
                c(180, 125, 20),
                c(300, 210, 40),
                c(500, 350, 75),
            ],
            BuildingKind::GoldStash => [
                c(20, 20, 0),
                c(40, 40, 0),
                c(80, 80, 0),
                c(150, 150, 0),
                c(280, 280, 0),
                c(500, 500, 0),
                c(900, 900, 0),
            ],
        }
    }

    /// Wood/stone returned when selling at `level`: half the next upgrade,
    /// half the final-tier price when maxed, half the base cost at level 1.
    pub fn sell_refund(self, level: u32) -> ResourceCost {
        if level <= 1 {
            return self.base_cost().halved();
        }
        let costs = self.upgrade_costs();
        let reference = if level >= BUILDING_MAX_LEVEL {
            costs[(BUILDING_MAX_LEVEL - 1) as usize]
        } else {
            costs[(level - 1) as usize]
        };
        ResourceCost::new(reference.wood, reference.stone).halved()
    }
}

/// Wood/stone/gold price of one upgrade step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpgradeCost {
    pub wood: u32,
    pub stone: u32,
    pub gold: u32,
}

/// A placed building.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    pub level: u32,
}

impl Building {
    pub fn new(kind: BuildingKind) -> Self {
        Self { kind, level: 1 }
    }
}

/// Collision bounding box of a building centered at `center`.
pub fn building_bounds(center: Vec2) -> Aabb2d {
    collision::probe(center, BUILDING_SIZE)
}

/// Session catalog: one template per kind carrying the unlock flag.
#[derive(Resource, Debug, Clone)]
pub struct BuildingCatalog {
    unlocked: HashMap<BuildingKind, bool>,
}

impl Default for BuildingCatalog {
    fn default() -> Self {
        // only the stash starts unlocked; placing it opens the rest
        let unlocked = BuildingKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.is_unlocker()))
            .collect();
        Self { unlocked }
    }
}

impl BuildingCatalog {
    pub fn is_unlocked(&self, kind: BuildingKind) -> bool {
        self.unlocked.get(&kind).copied().unwrap_or(false)
    }

    pub fn unlock_all(&mut self) {
        for flag in self.unlocked.values_mut() {
            *flag = true;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("{kind:?} is still locked")]
    Locked { kind: BuildingKind },
    #[error("a {kind:?} is already placed")]
    SingletonViolation { kind: BuildingKind },
    #[error("placement limit {limit} reached for {kind:?}")]
    LimitReached { kind: BuildingKind, limit: u32 },
    #[error("cannot afford {kind:?} ({} wood, {} stone)", .cost.wood, .cost.stone)]
    InsufficientResources {
        kind: BuildingKind,
        cost: ResourceCost,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpgradeError {
    #[error("building no longer exists")]
    NotFound,
    #[error("{kind:?} is at max level")]
    AtMaxLevel { kind: BuildingKind },
    #[error("{kind:?} upgrades are gated by the stash (level {stash_level})")]
    GatedByStash {
        kind: BuildingKind,
        stash_level: u32,
    },
    #[error("cannot afford upgrade ({} wood, {} stone, {} gold)", .cost.wood, .cost.stone, .cost.gold)]
    InsufficientResources { cost: UpgradeCost },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SellError {
    #[error("building no longer exists")]
    NotFound,
    #[error("{kind:?} cannot be sold")]
    NotSellable { kind: BuildingKind },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Upgrade(#[from] UpgradeError),
    #[error(transparent)]
    Sell(#[from] SellError),
}

/// Command entry points invoked by UI collaborators.
#[derive(Event, Debug, Clone)]
pub enum BuildCommand {
    Place { kind: BuildingKind, position: Vec2 },
    Upgrade { entity: Entity },
    Sell { entity: Entity },
}

/// Rejection feedback for UI collaborators; the command was a no-op.
#[derive(Event, Debug)]
pub struct BuildRejected {
    pub command: BuildCommand,
    pub reason: BuildError,
}

fn process_build_commands(
    mut commands: Commands,
    mut events: EventReader<BuildCommand>,
    mut rejected: EventWriter<BuildRejected>,
    mut catalog: ResMut<BuildingCatalog>,
    mut wallet: ResMut<Wallet>,
    mut placed: Query<(Entity, &mut Building, &mut Health)>,
) {
    // Entities spawned this batch are not yet visible to the query, so
    // counts and the stash gate are tracked locally across the batch.
    let mut counts: HashMap<BuildingKind, u32> = HashMap::new();
    let mut stash_level = 0u32;
    for (_, building, _) in placed.iter() {
        *counts.entry(building.kind).or_default() += 1;
        if building.kind.is_unlocker() {
            stash_level = stash_level.max(building.level);
        }
    }

    for command in events.read() {
        let result = match *command {
            BuildCommand::Place { kind, position } => attempt_placement(
                &mut commands,
                &mut catalog,
                &mut wallet,
                &mut counts,
                &mut stash_level,
                kind,
                position,
            )
            .map_err(BuildError::from),
            BuildCommand::Upgrade { entity } => {
                attempt_upgrade(&mut placed, &mut wallet, stash_level, entity)
                    .map_err(BuildError::from)
            }
            BuildCommand::Sell { entity } => {
                attempt_sell(&mut commands, &mut placed, &mut wallet, &mut counts, entity)
                    .map_err(BuildError::from)
            }
        };
        if let Err(reason) = result {
            tracing::info!(%reason, ?command, "build command rejected");
            rejected.send(BuildRejected {
                command: command.clone(),
                reason,
            });
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn attempt_placement(
    commands: &mut Commands,
    catalog: &mut BuildingCatalog,
    wallet: &mut Wallet,
    counts: &mut HashMap<BuildingKind, u32>,
    stash_level: &mut u32,
    kind: BuildingKind,
    position: Vec2,
) -> Result<(), PlacementError> {
    if !catalog.is_unlocked(kind) {
        return Err(PlacementError::Locked { kind });
    }
    let count = counts.get(&kind).copied().unwrap_or(0);
    if kind.is_unlocker() && count > 0 {
        return Err(PlacementError::SingletonViolation { kind });
    }
    if count >= kind.limit() {
        return Err(PlacementError::LimitReached {
            kind,
            limit: kind.limit(),
        });
    }
    let cost = kind.base_cost();
    if !kind.is_unlocker() && !wallet.debit(cost) {
        return Err(PlacementError::InsufficientResources { kind, cost });
    }

    let entity = commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            Building::new(kind),
            Health::new(kind.base_health()),
        ))
        .id();
    if defense::action_interval(kind, 1).is_some() {
        commands
            .entity(entity)
            .insert(defense::ActionTimer::new(kind, 1));
    }
    *counts.entry(kind).or_default() += 1;
    if kind.is_unlocker() {
        *stash_level = 1;
        catalog.unlock_all();
        tracing::info!("stash placed, catalog unlocked");
    }
    tracing::info!(?kind, ?position, "building placed");
    Ok(())
}

fn attempt_upgrade(
    placed: &mut Query<(Entity, &mut Building, &mut Health)>,
    wallet: &mut Wallet,
    stash_level: u32,
    entity: Entity,
) -> Result<(), UpgradeError> {
    let Ok((_, mut building, mut health)) = placed.get_mut(entity) else {
        return Err(UpgradeError::NotFound);
    };
    let kind = building.kind;
    if building.level >= BUILDING_MAX_LEVEL {
        return Err(UpgradeError::AtMaxLevel { kind });
    }
    // every non-stash upgrade is capped by the stash's own level
    if !kind.is_unlocker() && building.level >= stash_level {
        return Err(UpgradeError::GatedByStash { kind, stash_level });
    }
    let cost = kind.upgrade_costs()[(building.level - 1) as usize];
    let wood_stone = ResourceCost::new(cost.wood, cost.stone);
    if !wallet.can_afford(wood_stone) || wallet.gold < cost.gold {
        return Err(UpgradeError::InsufficientResources { cost });
    }
    wallet.debit(wood_stone);
    wallet.spend_gold(cost.gold);

    building.level += 1;
    health.max *= UPGRADE_HEALTH_SCALE;
    health.heal_full();
    tracing::info!(?kind, level = building.level, "building upgraded");
    Ok(())
}

fn attempt_sell(
    commands: &mut Commands,
    placed: &mut Query<(Entity, &mut Building, &mut Health)>,
    wallet: &mut Wallet,
    counts: &mut HashMap<BuildingKind, u32>,
    entity: Entity,
) -> Result<(), SellError> {
    let Ok((entity, building, _)) = placed.get_mut(entity) else {
        return Err(SellError::NotFound);
    };
    let kind = building.kind;
    if !kind.can_be_sold() {
        return Err(SellError::NotSellable { kind });
    }
    let refund = kind.sell_refund(building.level);
    wallet.credit(refund);
    if let Some(count) = counts.get_mut(&kind) {
        *count = count.saturating_sub(1);
    }
    commands.entity(entity).despawn();
    tracing::info!(?kind, ?refund, "building sold");
    Ok(())
}

fn despawn_destroyed_buildings(
    mut commands: Commands,
    placed: Query<(Entity, &Building, &Health)>,
) {
    for (entity, building, health) in &placed {
        if !health.is_alive() {
            tracing::info!(kind = ?building.kind, "building destroyed");
            commands.entity(entity).despawn();
        }
    }
}
