use serde::{Deserialize, Serialize};

/// Knobs that set how quickly a run gets harder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DifficultyRule {
    pub level: f64,
    pub chance_adjust: f64,
    pub passive_every_rounds: u32,
    pub passive_amount_base: i64,
    pub passive_scaling_per_100: f64,
    pub heal_cooldown_rounds: u32,
    pub max_hp_cap: i64,
}

impl Default for DifficultyRule {
    fn default() -> Self {
        Self {
            level: 0.4,
            chance_adjust: 0.15,
            passive_every_rounds: 10,
            passive_amount_base: 0,
            passive_scaling_per_100: 2.0,
            heal_cooldown_rounds: 5,
            max_hp_cap: 100,
        }
    }
}

/// Every tunable constant of the round engine.
///
/// No single tuning is canonical; `Default` carries the shipped balance and
/// JSON files can override any subset of fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BalanceConfig {
    pub difficulty: DifficultyRule,
    pub card_draw_count: usize,
    pub chance_min_adjusted: f64,
    pub chance_round_divisor: f64,
    pub luck_bonus_per_stack: f64,
    pub chance_failure_hp_penalty_multiplier: f64,
    pub chance_failure_min_hp_loss: i64,
    pub chance_failure_round_divisor: f64,
    pub chance_failure_score_penalty_divisor: u32,
    pub heal_base_multiplier: f64,
    pub heal_round_penalty_divisor: u32,
    pub normal_damage_round_divisor: u32,
    pub hp_change_max_positive: i64,
    pub hp_change_max_negative: i64,
    pub blood_synergy_threshold: u32,
    pub blood_penalty_per_stack: i64,
    pub blood_penalty_max: i64,
    pub blood_drain_per_stack: i64,
    pub round_multiplier_base: f64,
    pub round_multiplier_power_base: f64,
    pub round_multiplier_power_exponent: f64,
    pub round_alert_threshold: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyRule::default(),
            card_draw_count: 3,
            chance_min_adjusted: 0.15,
            chance_round_divisor: 600.0,
            luck_bonus_per_stack: 0.03,
            chance_failure_hp_penalty_multiplier: 0.8,
            chance_failure_min_hp_loss: 10,
            chance_failure_round_divisor: 20.0,
            chance_failure_score_penalty_divisor: 12,
            heal_base_multiplier: 1.0,
            heal_round_penalty_divisor: 70,
            normal_damage_round_divisor: 50,
            hp_change_max_positive: 25,
            hp_change_max_negative: -30,
            blood_synergy_threshold: 2,
            blood_penalty_per_stack: 1,
            blood_penalty_max: 8,
            blood_drain_per_stack: 2,
            round_multiplier_base: 80.0,
            round_multiplier_power_base: 300.0,
            round_multiplier_power_exponent: 1.5,
            round_alert_threshold: 100,
        }
    }
}

impl BalanceConfig {
    pub fn max_hp(&self) -> i64 {
        self.difficulty.max_hp_cap
    }

    /// Sentinel for a fresh run so the first heal is never on cooldown.
    pub fn initial_last_heal_round(&self) -> i64 {
        -i64::from(self.difficulty.heal_cooldown_rounds)
    }

    pub fn clamp_hp_change(&self, delta: i64) -> i64 {
        delta
            .min(self.hp_change_max_positive)
            .max(self.hp_change_max_negative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: BalanceConfig =
            serde_json::from_str(r#"{"card_draw_count": 4, "difficulty": {"level": 0.6}}"#)
                .expect("parse");
        assert_eq!(config.card_draw_count, 4);
        assert_eq!(config.difficulty.level, 0.6);
        assert_eq!(config.difficulty.max_hp_cap, 100);
        assert_eq!(config.hp_change_max_negative, -30);
    }

    #[test]
    fn clamp_window() {
        let config = BalanceConfig::default();
        assert_eq!(config.clamp_hp_change(-80), -30);
        assert_eq!(config.clamp_hp_change(40), 25);
        assert_eq!(config.clamp_hp_change(-7), -7);
    }

    #[test]
    fn first_heal_is_never_on_cooldown() {
        let config = BalanceConfig::default();
        assert_eq!(config.initial_last_heal_round(), -5);
    }
}
