//! Centralized game constants for the survival core.
//!
//! Eliminates magic numbers duplicated across systems. Per-module lookup
//! tables (building costs, tool stats, tower profiles) remain in their
//! respective modules as the single source of truth.

// =====================================================
// World & Grid
// =====================================================

/// One grid cell in world units (building footprint edge)
pub const GRID_UNIT: f32 = 35.0;

/// Fraction of the day cycle at which night begins
pub const NIGHT_START: f32 = 0.25;

/// Fraction of the day cycle at which night ends
pub const NIGHT_END: f32 = 0.75;

// =====================================================
// Player
// =====================================================

/// Player bounding box edge in world units
pub const PLAYER_SIZE: f32 = 50.0;

/// Player maximum health
pub const PLAYER_MAX_HEALTH: f32 = 100.0;

/// Player movement speed in world units per tick
pub const PLAYER_MOVE_SPEED: f32 = 5.0;

/// Minimum ticks between two shield regeneration events
pub const SHIELD_REGEN_INTERVAL_TICKS: u64 = 5;

// =====================================================
// Melee & Projectiles
// =====================================================

/// Swing phase advance per tick, in radians
pub const SWING_STEP_RAD: f32 = 0.20;

/// Melee hit probe edge length
pub const MELEE_PROBE_SIZE: f32 = 30.0;

/// Distance from player center to melee probe center
pub const MELEE_PROBE_OFFSET: f32 = 65.0;

/// Projectile travel speed in world units per tick
pub const PROJECTILE_SPEED: f32 = 15.0;

/// Projectile lifetime in ticks
pub const PROJECTILE_LIFETIME_TICKS: u32 = 100;

/// Projectile bounding box edge for impact tests
pub const PROJECTILE_SIZE: f32 = 10.0;

// =====================================================
// Resource Nodes
// =====================================================

/// Resource node sprite footprint edge
pub const RESOURCE_NODE_SIZE: f32 = 120.0;

/// Bounding box inset per side, as a fraction of the footprint
pub const RESOURCE_NODE_INSET: f32 = 0.25;

/// Shake displacement applied when a node is struck
pub const SHAKE_DISPLACEMENT: f32 = 15.0;

/// Multiplicative shake decay per tick
pub const SHAKE_DECAY: f32 = 0.9;

/// Shake magnitude below which the offset snaps to zero
pub const SHAKE_EPSILON: f32 = 0.5;

// =====================================================
// Buildings
// =====================================================

/// Building bounding box edge
pub const BUILDING_SIZE: f32 = 35.0;

/// Maximum building level
pub const BUILDING_MAX_LEVEL: u32 = 7;

/// Max-health multiplier applied on each upgrade
pub const UPGRADE_HEALTH_SCALE: f32 = 1.2;

// =====================================================
// Zombies & Waves
// =====================================================

/// Zombie bounding box edge
pub const ZOMBIE_SIZE: f32 = 35.0;

/// Zombie movement speed in world units per tick
pub const ZOMBIE_SPEED: f32 = 3.0;

/// Highest zombie tier
pub const ZOMBIE_MAX_TIER: u32 = 6;

/// Base wave size before per-wave scaling
pub const WAVE_BASE_COUNT: u32 = 10;

/// Additional zombies per wave number
pub const WAVE_COUNT_SCALE: u32 = 2;

/// Spawn ring radius around the stash, in grid units
pub const SPAWN_RING_GRID_RADIUS: f32 = 30.0;

/// Maximum radial jitter applied to spawn ring points
pub const SPAWN_RING_JITTER: f32 = 100.0;

/// Chance that a player-sourced hit permanently aggros a zombie
pub const AGGRO_CHANCE: f64 = 0.3;

/// Divisor applied to zombie damage for per-tick contact damage
pub const CONTACT_DAMAGE_DIVISOR: f32 = 10.0;

/// Speed multiplier applied to zombies overlapping a slow trap
pub const SLOW_TRAP_FACTOR: f32 = 0.5;
