//! Layered health/shield model.
//!
//! Shared by the player, buildings, and zombies; only the player carries a
//! non-zero shield. Damage depletes the shield first, overflow hits health,
//! and neither value goes negative.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub shield: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            shield: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Route damage through the shield, overflow into health.
    ///
    /// Returns the portion that reached health.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0);
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        let overflow = amount - absorbed;
        let applied = overflow.min(self.current);
        self.current -= applied;
        applied
    }

    /// Set the shield to the armor-derived cap.
    pub fn fill_shield(&mut self, cap: f32) {
        self.shield = cap.max(0.0);
    }

    pub fn heal_full(&mut self) {
        self.current = self.max;
    }
}
