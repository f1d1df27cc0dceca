//! Resource wallet.
//!
//! Wood, stone, and gold on hand. Placement and upgrades debit it; harvest
//! hits, passive building income, and sell refunds credit it. All mutation
//! goes through the methods here so balances can never underflow.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::config::CoreConfig;

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Wallet>()
            .add_systems(Startup, init_wallet);
    }
}

/// Wood/stone price of a placement or refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceCost {
    pub wood: u32,
    pub stone: u32,
}

impl ResourceCost {
    pub const fn new(wood: u32, stone: u32) -> Self {
        Self { wood, stone }
    }

    pub const fn halved(self) -> Self {
        Self {
            wood: self.wood / 2,
            stone: self.stone / 2,
        }
    }
}

/// Player resources on hand.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub wood: u32,
    pub stone: u32,
    pub gold: u32,
}

impl Wallet {
    pub fn can_afford(&self, cost: ResourceCost) -> bool {
        self.wood >= cost.wood && self.stone >= cost.stone
    }

    /// Deduct a wood/stone cost. Returns false (leaving the wallet
    /// untouched) when it cannot be covered.
    pub fn debit(&mut self, cost: ResourceCost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.wood -= cost.wood;
        self.stone -= cost.stone;
        true
    }

    pub fn credit(&mut self, cost: ResourceCost) {
        self.wood = self.wood.saturating_add(cost.wood);
        self.stone = self.stone.saturating_add(cost.stone);
    }

    pub fn credit_wood(&mut self, amount: u32) {
        self.wood = self.wood.saturating_add(amount);
    }

    pub fn credit_stone(&mut self, amount: u32) {
        self.stone = self.stone.saturating_add(amount);
    }

    pub fn credit_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Deduct gold. Returns false (leaving the wallet untouched) when short.
    pub fn spend_gold(&mut self, amount: u32) -> bool {
        if self.gold < amount {
            return false;
        }
        self.gold -= amount;
        true
    }
}

fn init_wallet(config: Res<CoreConfig>, mut wallet: ResMut<Wallet>) {
    *wallet = Wallet {
        wood: config.starting_wood,
        stone: config.starting_stone,
        gold: config.starting_gold,
    };
}
