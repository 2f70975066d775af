use crate::{BalanceConfig, NextCardBoost, SynergyTag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SynergyStacks {
    pub fire: u32,
    pub mind: u32,
    pub blood: u32,
    pub luck: u32,
}

impl SynergyStacks {
    pub fn get(&self, tag: SynergyTag) -> u32 {
        match tag {
            SynergyTag::Fire => self.fire,
            SynergyTag::Mind => self.mind,
            SynergyTag::Blood => self.blood,
            SynergyTag::Luck => self.luck,
        }
    }

    /// Adds one stack and returns the new count.
    pub fn increment(&mut self, tag: SynergyTag) -> u32 {
        let slot = match tag {
            SynergyTag::Fire => &mut self.fire,
            SynergyTag::Mind => &mut self.mind,
            SynergyTag::Blood => &mut self.blood,
            SynergyTag::Luck => &mut self.luck,
        };
        *slot = slot.saturating_add(1);
        *slot
    }

    pub fn total(&self) -> u32 {
        self.fire + self.mind + self.blood + self.luck
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    pub score: i64,
    pub hp: i64,
    pub round: u32,
    pub synergy: SynergyStacks,
    pub last_heal_round: i64,
    /// Reduction applied to damage in the current round; armed by the previous one.
    pub temp_damage_reduction: f64,
    /// Boost shaping the hand drawn for the current round.
    pub next_card_boost: Option<NextCardBoost>,
    pub passive_immunity_rounds: u32,
}

impl PlayerState {
    pub fn new(config: &BalanceConfig) -> Self {
        Self {
            score: 0,
            hp: config.max_hp(),
            round: 1,
            synergy: SynergyStacks::default(),
            last_heal_round: config.initial_last_heal_round(),
            temp_damage_reduction: 0.0,
            next_card_boost: None,
            passive_immunity_rounds: 0,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    pub fn rounds_since_heal(&self) -> i64 {
        i64::from(self.round) - self.last_heal_round
    }

    pub fn heal_ready(&self, config: &BalanceConfig) -> bool {
        self.rounds_since_heal() >= i64::from(config.difficulty.heal_cooldown_rounds)
    }

    pub fn heal_cooldown_left(&self, config: &BalanceConfig) -> u32 {
        let left = i64::from(config.difficulty.heal_cooldown_rounds) - self.rounds_since_heal();
        left.clamp(0, i64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_matches_config() {
        let config = BalanceConfig::default();
        let state = PlayerState::new(&config);
        assert_eq!(state.score, 0);
        assert_eq!(state.hp, 100);
        assert_eq!(state.round, 1);
        assert_eq!(state.synergy.total(), 0);
        assert!(state.heal_ready(&config));
        assert_eq!(state.heal_cooldown_left(&config), 0);
    }

    #[test]
    fn cooldown_counts_down() {
        let config = BalanceConfig::default();
        let mut state = PlayerState::new(&config);
        state.round = 10;
        state.last_heal_round = 8;
        assert!(!state.heal_ready(&config));
        assert_eq!(state.heal_cooldown_left(&config), 3);
        state.round = 13;
        assert!(state.heal_ready(&config));
    }

    #[test]
    fn stacks_increment_per_tag() {
        let mut stacks = SynergyStacks::default();
        assert_eq!(stacks.increment(SynergyTag::Blood), 1);
        assert_eq!(stacks.increment(SynergyTag::Blood), 2);
        assert_eq!(stacks.increment(SynergyTag::Luck), 1);
        assert_eq!(stacks.get(SynergyTag::Blood), 2);
        assert_eq!(stacks.get(SynergyTag::Fire), 0);
        assert_eq!(stacks.total(), 3);
    }
}
