//! Harvestable resource nodes.
//!
//! Trees and stones spawned at world generation, never consumed. Each node
//! carries a shake offset for the strike animation, decaying back to zero a
//! little each tick.

use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::collision;
use crate::constants::{
    RESOURCE_NODE_INSET, RESOURCE_NODE_SIZE, SHAKE_DECAY, SHAKE_DISPLACEMENT, SHAKE_EPSILON,
};
use crate::engine::config::CoreConfig;
use crate::engine::{SimRng, SimSet};
use crate::world::{random_point_in_bounds, WorldBounds};

pub struct HarvestPlugin;

impl Plugin for HarvestPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_resource_nodes)
            .add_systems(Update, decay_shake.in_set(SimSet::Ambient));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Tree,
    Stone,
}

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct ResourceNode {
    pub kind: NodeKind,
    /// Transient strike animation offset, decaying toward zero
    pub shake: f32,
}

impl ResourceNode {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, shake: 0.0 }
    }

    /// Kick the strike animation.
    pub fn strike(&mut self) {
        self.shake = SHAKE_DISPLACEMENT;
    }

    /// One tick of shake decay: multiplicative falloff, snapped to zero
    /// below the epsilon.
    pub fn decay(&mut self) {
        if self.shake == 0.0 {
            return;
        }
        self.shake *= SHAKE_DECAY;
        if self.shake.abs() < SHAKE_EPSILON {
            self.shake = 0.0;
        }
    }
}

/// Collision/harvest bounding box: the sprite footprint inset 25% per side.
pub fn node_bounds(center: Vec2) -> Aabb2d {
    let edge = RESOURCE_NODE_SIZE * (1.0 - 2.0 * RESOURCE_NODE_INSET);
    collision::probe(center, edge)
}

fn spawn_resource_nodes(
    mut commands: Commands,
    config: Res<CoreConfig>,
    bounds: Res<WorldBounds>,
    mut rng: ResMut<SimRng>,
) {
    for _ in 0..config.resource_node_count {
        let pos = random_point_in_bounds(&mut rng.0, &bounds);
        let kind = if rng.0.gen_bool(0.5) {
            NodeKind::Tree
        } else {
            NodeKind::Stone
        };
        commands.spawn((
            Transform::from_translation(pos.extend(0.0)),
            ResourceNode::new(kind),
        ));
    }
    tracing::info!(count = config.resource_node_count, "resource nodes spawned");
}

fn decay_shake(mut nodes: Query<&mut ResourceNode>) {
    for mut node in &mut nodes {
        node.decay();
    }
}
