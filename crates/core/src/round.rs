use crate::scoring::ratio;
use crate::{
    round_multiplier, scaled_score, BalanceConfig, CardDef, Event, EventBus, Gamble,
    NextCardBoost, PlayerState, RngState, SpecialEffect, SynergyTag,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ResolutionPath {
    Gamble { chance: f64, won: bool },
    Heal { applied: bool },
    Damage,
}

/// Running HP delta after each resolution stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpStages {
    pub base: i64,
    pub after_synergy: i64,
    pub after_effect: i64,
    pub after_reduction: i64,
    pub applied: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub card: String,
    /// Round the card was played in; the state has already moved past it.
    pub round: u32,
    pub multiplier: f64,
    pub path: ResolutionPath,
    pub score_before: i64,
    pub score_after: i64,
    pub hp_before: i64,
    pub hp_after: i64,
    pub stages: HpStages,
    pub passive_drain: i64,
    pub new_best: bool,
    pub round_alert: bool,
    pub game_over: bool,
}

fn per(round: u32, divisor: u32) -> i64 {
    i64::from(round / divisor.max(1))
}

/// Success probability for `gamble` given the current stacks and round.
pub fn adjusted_chance(
    state: &PlayerState,
    card: &CardDef,
    gamble: &Gamble,
    config: &BalanceConfig,
) -> f64 {
    let mut chance = gamble.chance;
    if card.synergy == Some(SynergyTag::Luck) && state.synergy.luck > 0 {
        chance += f64::from(state.synergy.luck) * config.luck_bonus_per_stack;
    }
    let adjusted = chance + config.difficulty.chance_adjust
        - ratio(f64::from(state.round), config.chance_round_divisor);
    adjusted.max(config.chance_min_adjusted)
}

/// Negative HP delta of a failed gamble.
pub fn gamble_failure_loss(round: u32, gamble: &Gamble, config: &BalanceConfig) -> i64 {
    let scaled = (gamble.hp_lose as f64 * config.chance_failure_hp_penalty_multiplier
        + ratio(f64::from(round), config.chance_failure_round_divisor))
        .floor() as i64;
    -config.chance_failure_min_hp_loss.max(scaled)
}

pub fn gamble_failure_score_penalty(round: u32, config: &BalanceConfig) -> i64 {
    per(round, config.chance_failure_score_penalty_divisor)
}

pub fn heal_amount(card: &CardDef, round: u32, config: &BalanceConfig) -> i64 {
    let base = ((card.hp as f64 * config.heal_base_multiplier).floor() as i64).max(0);
    (base - per(round, config.heal_round_penalty_divisor)).max(0)
}

pub fn damage_amount(card: &CardDef, round: u32, config: &BalanceConfig) -> i64 {
    card.hp - per(round, config.normal_damage_round_divisor)
}

pub fn blood_penalty(stack: u32, config: &BalanceConfig) -> i64 {
    if stack < config.blood_synergy_threshold {
        return 0;
    }
    config
        .blood_penalty_max
        .min(i64::from(stack) * config.blood_penalty_per_stack)
}

pub fn blood_drain(stack: u32, config: &BalanceConfig) -> i64 {
    i64::from(stack) * config.blood_drain_per_stack
}

/// Passive HP loss due when the round counter lands on `round`.
pub fn passive_drain_amount(round: u32, config: &BalanceConfig) -> i64 {
    let difficulty = &config.difficulty;
    let scale = (f64::from(round) / 100.0 * difficulty.passive_scaling_per_100).floor() as i64;
    difficulty.passive_amount_base + scale
}

fn passive_due(state: &PlayerState, config: &BalanceConfig) -> bool {
    let every = config.difficulty.passive_every_rounds;
    state.passive_immunity_rounds == 0 && every > 0 && state.round % every == 0
}

fn resolve_gamble(
    state: &mut PlayerState,
    card: &CardDef,
    gamble: &Gamble,
    multiplier: f64,
    config: &BalanceConfig,
    rng: &mut RngState,
    events: &mut EventBus,
) -> (ResolutionPath, i64) {
    let chance = adjusted_chance(state, card, gamble, config);
    if rng.next_f64() < chance {
        let gained = scaled_score(gamble.score_win, multiplier);
        state.score = state.score.saturating_add(gained).max(0);
        events.push(Event::GambleWon {
            chance,
            score: gained,
        });
        return (ResolutionPath::Gamble { chance, won: true }, 0);
    }
    let hp_loss = gamble_failure_loss(state.round, gamble, config);
    let score_penalty = gamble_failure_score_penalty(state.round, config);
    state.score = state.score.saturating_sub(score_penalty).max(0);
    events.push(Event::GambleLost {
        chance,
        hp_loss,
        score_penalty,
    });
    (ResolutionPath::Gamble { chance, won: false }, hp_loss)
}

fn resolve_normal(
    state: &mut PlayerState,
    card: &CardDef,
    multiplier: f64,
    config: &BalanceConfig,
    events: &mut EventBus,
) -> (ResolutionPath, i64) {
    state.score = state
        .score
        .saturating_add(scaled_score(card.score, multiplier))
        .max(0);
    if card.hp <= 0 {
        return (ResolutionPath::Damage, damage_amount(card, state.round, config));
    }
    if !state.heal_ready(config) {
        events.push(Event::HealOnCooldown {
            rounds_left: state.heal_cooldown_left(config),
        });
        return (ResolutionPath::Heal { applied: false }, 0);
    }
    let amount = heal_amount(card, state.round, config);
    state.last_heal_round = i64::from(state.round);
    events.push(Event::HealApplied { amount });
    (ResolutionPath::Heal { applied: true }, amount)
}

/// Resolves one chosen card and advances the round.
///
/// Stage order matters: synergy reads the base delta, blood drain reads the
/// stack incremented by synergy, the reduction and clamp read everything
/// before them. Damage reduction and next-card boosts armed by `card` take
/// effect on the following round.
pub fn resolve_round(
    state: &mut PlayerState,
    card: &CardDef,
    config: &BalanceConfig,
    best_score: &mut i64,
    rng: &mut RngState,
    events: &mut EventBus,
) -> RoundReport {
    let round = state.round;
    let multiplier = round_multiplier(round, config);
    let score_before = state.score;
    let hp_before = state.hp;
    let active_reduction = state.temp_damage_reduction;
    events.push(Event::CardChosen {
        name: card.name.clone(),
        round,
    });

    let (path, base) = match &card.gamble {
        Some(gamble) => resolve_gamble(state, card, gamble, multiplier, config, rng, events),
        None => resolve_normal(state, card, multiplier, config, events),
    };

    let mut delta = base;
    if let Some(tag) = card.synergy {
        let stack = state.synergy.increment(tag);
        if tag == SynergyTag::Blood {
            let penalty = blood_penalty(stack, config);
            if penalty > 0 {
                delta -= penalty;
                events.push(Event::BloodPenalty { amount: penalty });
            }
        }
    }
    let after_synergy = delta;

    let mut armed_reduction = None;
    let mut armed_boost = None;
    if let Some(effect) = card.effect {
        match effect {
            SpecialEffect::DamageReduction { amount } => {
                armed_reduction = Some(amount.clamp(0.0, 1.0));
                events.push(Event::EffectArmed(effect));
            }
            SpecialEffect::NextCardBoost { tag, multiplier } => {
                armed_boost = Some(NextCardBoost { tag, multiplier });
                events.push(Event::EffectArmed(effect));
            }
            SpecialEffect::PassiveImmunity { rounds } => {
                state.passive_immunity_rounds = rounds;
                events.push(Event::EffectArmed(effect));
            }
            SpecialEffect::BloodDrainSynergy => {
                let drain = blood_drain(state.synergy.blood, config);
                if drain > 0 {
                    delta -= drain;
                    events.push(Event::BloodDrain { amount: drain });
                }
            }
        }
    }
    let after_effect = delta;

    if active_reduction > 0.0 && delta < 0 {
        let reduced = (delta as f64 * (1.0 - active_reduction)).floor() as i64;
        events.push(Event::DamageReduced {
            before: delta,
            after: reduced,
        });
        delta = reduced;
    }
    let after_reduction = delta;

    let applied = config.clamp_hp_change(delta);
    state.hp = (state.hp + applied).min(config.max_hp()).max(0);
    state.round = state.round.saturating_add(1);
    events.push(Event::HpChanged {
        delta: applied,
        hp: state.hp,
    });

    let new_best = state.score > *best_score;
    if new_best {
        *best_score = state.score;
        events.push(Event::NewBestScore { score: state.score });
    }

    let mut passive_drain = 0;
    if passive_due(state, config) {
        let drain = passive_drain_amount(state.round, config);
        if drain > 0 {
            state.hp = (state.hp - drain).max(0);
            passive_drain = drain;
            events.push(Event::PassiveDrain {
                amount: drain,
                hp: state.hp,
            });
        }
    }

    state.temp_damage_reduction = armed_reduction.unwrap_or(0.0);
    state.next_card_boost = armed_boost;
    if state.passive_immunity_rounds > 0 {
        state.passive_immunity_rounds -= 1;
    }

    let threshold = config.round_alert_threshold;
    let round_alert = threshold > 0 && state.round == threshold.saturating_add(1);
    if round_alert {
        events.push(Event::RoundAlert { round: threshold });
    }

    let game_over = state.hp == 0;
    if game_over {
        events.push(Event::GameOver {
            score: state.score,
            round: state.round,
        });
    }

    RoundReport {
        card: card.name.clone(),
        round,
        multiplier,
        path,
        score_before,
        score_after: state.score,
        hp_before,
        hp_after: state.hp,
        stages: HpStages {
            base,
            after_synergy,
            after_effect,
            after_reduction,
            applied,
        },
        passive_drain,
        new_best,
        round_alert,
        game_over,
    }
}
