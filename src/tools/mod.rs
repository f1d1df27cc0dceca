//! Tool catalog and the player's five-slot toolbelt.
//!
//! One instance of every tool variant exists for the whole session; tools
//! are only ever unlocked or upgraded. Stat lookups are per-level tables
//! keyed by the variant.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::economy::Wallet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Pickaxe,
    Spear,
    Bow,
    HealthPotion,
    Armor,
}

impl ToolKind {
    /// Fixed toolbelt slot order.
    pub const SLOTS: [ToolKind; 5] = [
        ToolKind::Pickaxe,
        ToolKind::Spear,
        ToolKind::Bow,
        ToolKind::HealthPotion,
        ToolKind::Armor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pickaxe => "Pickaxe",
            ToolKind::Spear => "Spear",
            ToolKind::Bow => "Bow",
            ToolKind::HealthPotion => "Health Potion",
            ToolKind::Armor => "Armor",
        }
    }

    pub fn max_level(self) -> u32 {
        match self {
            ToolKind::Armor => 10,
            _ => 7,
        }
    }

    /// Damage dealt to zombies by a melee hit or projectile at `level`.
    pub fn damage(self, level: u32) -> f32 {
        let i = level_index(level, self.max_level());
        match self {
            ToolKind::Pickaxe => [5.0, 8.0, 12.0, 17.0, 23.0, 30.0, 40.0][i],
            ToolKind::Spear => [15.0, 22.0, 30.0, 40.0, 55.0, 75.0, 100.0][i],
            ToolKind::Bow => [12.0, 18.0, 25.0, 34.0, 45.0, 60.0, 80.0][i],
            ToolKind::HealthPotion | ToolKind::Armor => 0.0,
        }
    }

    /// Resources granted per harvest hit at `level`.
    pub fn harvest_power(self, level: u32) -> u32 {
        let i = level_index(level, self.max_level());
        match self {
            ToolKind::Pickaxe => [1, 2, 3, 4, 6, 8, 10][i],
            ToolKind::Spear => [1, 1, 1, 2, 2, 2, 3][i],
            _ => 0,
        }
    }

    /// Minimum ticks between ranged shots at `level`.
    pub fn attack_interval_ticks(self, level: u32) -> u64 {
        let i = level_index(level, self.max_level());
        match self {
            ToolKind::Bow => [30, 27, 24, 21, 18, 15, 12][i],
            // melee pacing comes from the swing cycle itself
            _ => 0,
        }
    }

    /// Shield capacity granted by armor at `level`; zero for everything else.
    pub fn shield_capacity(self, level: u32) -> f32 {
        match self {
            ToolKind::Armor => {
                let i = level_index(level, self.max_level());
                [
                    100.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 7000.0, 10000.0, 15000.0,
                    20000.0,
                ][i]
            }
            _ => 0.0,
        }
    }

    /// Gold price of upgrading *from* `level`.
    pub fn upgrade_cost_gold(self, level: u32) -> u32 {
        let i = level_index(level, self.max_level());
        match self {
            ToolKind::Pickaxe => [10, 25, 60, 150, 350, 800, 1500][i],
            ToolKind::Spear => [15, 40, 90, 200, 450, 1000, 2000][i],
            ToolKind::Bow => [20, 50, 120, 280, 600, 1300, 2500][i],
            ToolKind::HealthPotion => [50, 50, 50, 50, 50, 50, 50][i],
            ToolKind::Armor => [25, 60, 140, 320, 700, 1500, 3000, 6000, 12000, 20000][i],
        }
    }

    pub fn unlock_cost_gold(self) -> u32 {
        match self {
            ToolKind::Pickaxe | ToolKind::Spear | ToolKind::HealthPotion => 0,
            ToolKind::Bow => 100,
            ToolKind::Armor => 150,
        }
    }
}

fn level_index(level: u32, max: u32) -> usize {
    (level.clamp(1, max) - 1) as usize
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub kind: ToolKind,
    pub level: u32,
    pub unlocked: bool,
}

impl Tool {
    fn new(kind: ToolKind, unlocked: bool) -> Self {
        Self {
            kind,
            level: 1,
            unlocked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("{0:?} is locked")]
    Locked(ToolKind),
    #[error("{0:?} is already unlocked")]
    AlreadyUnlocked(ToolKind),
    #[error("{0:?} is at max level")]
    AtMaxLevel(ToolKind),
    #[error("not enough gold ({required} required)")]
    NotEnoughGold { required: u32 },
}

/// Fixed five-slot tool array carried by the player.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Toolbelt {
    tools: [Tool; 5],
    pub active_slot: usize,
}

impl Default for Toolbelt {
    fn default() -> Self {
        Self {
            tools: ToolKind::SLOTS
                .map(|kind| Tool::new(kind, kind.unlock_cost_gold() == 0)),
            active_slot: 0,
        }
    }
}

impl Toolbelt {
    /// Tool in `slot`, or `None` for an out-of-range index.
    pub fn get(&self, slot: usize) -> Option<&Tool> {
        self.tools.get(slot)
    }

    pub fn active_tool(&self) -> &Tool {
        &self.tools[self.active_slot]
    }

    pub fn tool(&self, kind: ToolKind) -> &Tool {
        &self.tools[slot_of(kind)]
    }

    pub fn tool_mut(&mut self, kind: ToolKind) -> &mut Tool {
        &mut self.tools[slot_of(kind)]
    }

    /// Select `slot` as active. Out-of-range or locked slots are ignored.
    pub fn select_slot(&mut self, slot: usize) {
        match self.get(slot) {
            Some(tool) if tool.unlocked => self.active_slot = slot,
            _ => tracing::debug!(slot, "ignored invalid slot selection"),
        }
    }

    /// Current armor shield capacity; zero while armor is locked.
    pub fn armor_capacity(&self) -> f32 {
        let armor = self.tool(ToolKind::Armor);
        if armor.unlocked {
            ToolKind::Armor.shield_capacity(armor.level)
        } else {
            0.0
        }
    }

    pub fn unlock(&mut self, kind: ToolKind, wallet: &mut Wallet) -> Result<(), ToolError> {
        let cost = kind.unlock_cost_gold();
        let tool = self.tool_mut(kind);
        if tool.unlocked {
            return Err(ToolError::AlreadyUnlocked(kind));
        }
        if !wallet.spend_gold(cost) {
            return Err(ToolError::NotEnoughGold { required: cost });
        }
        tool.unlocked = true;
        tracing::info!(?kind, "tool unlocked");
        Ok(())
    }

    pub fn upgrade(&mut self, kind: ToolKind, wallet: &mut Wallet) -> Result<(), ToolError> {
        let tool = self.tool(kind);
        if !tool.unlocked {
            return Err(ToolError::Locked(kind));
        }
        if tool.level >= kind.max_level() {
            return Err(ToolError::AtMaxLevel(kind));
        }
        let cost = kind.upgrade_cost_gold(tool.level);
        if !wallet.spend_gold(cost) {
            return Err(ToolError::NotEnoughGold { required: cost });
        }
        let tool = self.tool_mut(kind);
        tool.level += 1;
        tracing::info!(?kind, level = tool.level, "tool upgraded");
        Ok(())
    }
}

fn slot_of(kind: ToolKind) -> usize {
    match kind {
        ToolKind::Pickaxe => 0,
        ToolKind::Spear => 1,
        ToolKind::Bow => 2,
        ToolKind::HealthPotion => 3,
        ToolKind::Armor => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_belt_unlocks_the_free_tools() {
        let belt = Toolbelt::default();
        assert!(belt.tool(ToolKind::Pickaxe).unlocked);
        assert!(belt.tool(ToolKind::Spear).unlocked);
        assert!(belt.tool(ToolKind::HealthPotion).unlocked);
        assert!(!belt.tool(ToolKind::Bow).unlocked);
        assert!(!belt.tool(ToolKind::Armor).unlocked);
    }

    #[test]
    fn invalid_slot_lookup_is_none() {
        let belt = Toolbelt::default();
        assert!(belt.get(5).is_none());
        assert!(belt.get(1).is_some());
    }

    #[test]
    fn selecting_a_locked_or_invalid_slot_is_ignored() {
        let mut belt = Toolbelt::default();
        belt.select_slot(9);
        assert_eq!(belt.active_slot, 0);
        belt.select_slot(2); // bow, locked
        assert_eq!(belt.active_slot, 0);
        belt.select_slot(1);
        assert_eq!(belt.active_slot, 1);
    }

    #[test]
    fn armor_caps_span_all_regen_brackets() {
        assert!(ToolKind::Armor.shield_capacity(1) <= 1000.0);
        assert!(ToolKind::Armor.shield_capacity(4) <= 1000.0);
        assert!(ToolKind::Armor.shield_capacity(8) <= 10000.0);
        assert!(ToolKind::Armor.shield_capacity(10) > 10000.0);
    }

    #[test]
    fn armor_capacity_is_zero_while_locked() {
        let belt = Toolbelt::default();
        assert_eq!(belt.armor_capacity(), 0.0);
    }

    #[test]
    fn upgrade_requires_gold_and_caps_at_max() {
        let mut belt = Toolbelt::default();
        let mut wallet = Wallet {
            gold: 10_000,
            ..Default::default()
        };
        for _ in 0..6 {
            belt.upgrade(ToolKind::Pickaxe, &mut wallet)
                .expect("upgrade should succeed");
        }
        assert_eq!(belt.tool(ToolKind::Pickaxe).level, 7);
        assert_eq!(
            belt.upgrade(ToolKind::Pickaxe, &mut wallet),
            Err(ToolError::AtMaxLevel(ToolKind::Pickaxe))
        );
    }

    #[test]
    fn upgrade_refuses_when_broke() {
        let mut belt = Toolbelt::default();
        let mut wallet = Wallet::default();
        assert_eq!(
            belt.upgrade(ToolKind::Spear, &mut wallet),
            Err(ToolError::NotEnoughGold { required: 15 })
        );
        assert_eq!(belt.tool(ToolKind::Spear).level, 1);
    }

    #[test]
    fn unlock_spends_gold_once() {
        let mut belt = Toolbelt::default();
        let mut wallet = Wallet {
            gold: 120,
            ..Default::default()
        };
        belt.unlock(ToolKind::Bow, &mut wallet)
            .expect("unlock should succeed");
        assert_eq!(wallet.gold, 20);
        assert_eq!(
            belt.unlock(ToolKind::Bow, &mut wallet),
            Err(ToolError::AlreadyUnlocked(ToolKind::Bow))
        );
    }

    #[test]
    fn stat_tables_grow_with_level() {
        for level in 1..7 {
            assert!(ToolKind::Spear.damage(level + 1) > ToolKind::Spear.damage(level));
            assert!(
                ToolKind::Bow.attack_interval_ticks(level + 1)
                    < ToolKind::Bow.attack_interval_ticks(level)
            );
        }
    }
}
