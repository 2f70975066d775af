use crate::{
    adjusted_chance, blood_drain, damage_amount, gamble_failure_loss, heal_amount,
    round_multiplier, scaled_score, BalanceConfig, CardDef, PlayerState, SpecialEffect,
};
use serde::{Deserialize, Serialize};

/// What a card would do if chosen now, for display only.
///
/// Gamble cards preview the failure loss. Synergy penalties and armed
/// effects are left out, except blood drain which depends only on stacks
/// already held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardPreview {
    pub score: i64,
    pub hp: i64,
    pub on_cooldown: bool,
    pub chance_percent: Option<u32>,
    pub effective_chance: Option<f64>,
}

pub fn preview_card(state: &PlayerState, card: &CardDef, config: &BalanceConfig) -> CardPreview {
    let multiplier = round_multiplier(state.round, config);
    let mut on_cooldown = false;
    let (score, mut hp, chance_percent, effective_chance) = match &card.gamble {
        Some(gamble) => (
            scaled_score(gamble.score_win, multiplier),
            gamble_failure_loss(state.round, gamble, config),
            Some((gamble.chance * 100.0).round().max(0.0) as u32),
            Some(adjusted_chance(state, card, gamble, config).min(1.0)),
        ),
        None if card.hp > 0 => {
            on_cooldown = !state.heal_ready(config);
            let heal = if on_cooldown {
                0
            } else {
                heal_amount(card, state.round, config)
            };
            (scaled_score(card.score, multiplier), heal, None, None)
        }
        None => (
            scaled_score(card.score, multiplier),
            damage_amount(card, state.round, config),
            None,
            None,
        ),
    };
    if matches!(card.effect, Some(SpecialEffect::BloodDrainSynergy)) {
        hp -= blood_drain(state.synergy.blood, config);
    }
    CardPreview {
        score,
        hp: config.clamp_hp_change(hp),
        on_cooldown,
        chance_percent,
        effective_chance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SynergyTag;

    #[test]
    fn gamble_previews_worst_case() {
        let config = BalanceConfig::default();
        let state = PlayerState::new(&config);
        let card = CardDef::new("bet", 0, 0, 1.0)
            .with_synergy(SynergyTag::Luck)
            .with_gamble(0.6, 100, 20);
        let preview = preview_card(&state, &card, &config);
        assert_eq!(preview.score, 100);
        assert_eq!(preview.hp, -16);
        assert_eq!(preview.chance_percent, Some(60));
        assert!(!preview.on_cooldown);
    }

    #[test]
    fn heal_on_cooldown_previews_zero() {
        let config = BalanceConfig::default();
        let mut state = PlayerState::new(&config);
        state.round = 4;
        state.last_heal_round = 2;
        let card = CardDef::new("mend", 8, 12, 1.0);
        let preview = preview_card(&state, &card, &config);
        assert!(preview.on_cooldown);
        assert_eq!(preview.hp, 0);
        assert_eq!(preview.score, 8);
    }

    #[test]
    fn blood_drain_preview_uses_held_stacks() {
        let config = BalanceConfig::default();
        let mut state = PlayerState::new(&config);
        state.synergy.blood = 3;
        let card = CardDef::new("drain", 15, 5, 1.0)
            .with_synergy(SynergyTag::Blood)
            .with_effect(SpecialEffect::BloodDrainSynergy);
        let preview = preview_card(&state, &card, &config);
        assert_eq!(preview.hp, 5 - 6);
    }

    #[test]
    fn preview_is_clamped() {
        let config = BalanceConfig::default();
        let state = PlayerState::new(&config);
        let card = CardDef::new("cliff", 0, -90, 1.0);
        assert_eq!(preview_card(&state, &card, &config).hp, -30);
    }
}
