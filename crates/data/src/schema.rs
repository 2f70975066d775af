use anyhow::{bail, Context};
use cardrush_core::{CardDef, Gamble, SpecialEffect, SynergyTag};
use serde::{Deserialize, Serialize};

/// One entry of `cards.json`.
///
/// The file format is flat: gamble fields sit next to the plain ones and a
/// special effect is named by `effect` with its parameter in a sibling field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub hp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_win: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_lose: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synergy: Option<String>,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immunity_rounds: Option<u32>,
}

impl CardRecord {
    pub fn to_card(&self) -> anyhow::Result<CardDef> {
        let synergy = match self.synergy.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_tag(raw).with_context(|| format!("card {}", self.name))?),
        };
        let gamble = match (self.chance, self.score_win, self.hp_lose) {
            (None, None, None) => None,
            (Some(chance), score_win, hp_lose) => Some(Gamble {
                chance,
                score_win: score_win.unwrap_or(0),
                hp_lose: hp_lose.unwrap_or(0),
            }),
            _ => bail!("card {} has gamble fields without a chance", self.name),
        };
        let effect = self
            .parse_effect()
            .with_context(|| format!("card {}", self.name))?;
        Ok(CardDef {
            name: self.name.clone(),
            description: self.description.clone(),
            score: self.score,
            hp: self.hp,
            gamble,
            synergy,
            weight: self.weight,
            effect,
        })
    }

    fn parse_effect(&self) -> anyhow::Result<Option<SpecialEffect>> {
        let Some(kind) = self.effect.as_deref() else {
            return Ok(None);
        };
        let effect = match kind.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "damage_reduction" => SpecialEffect::DamageReduction {
                amount: self
                    .effect_amount
                    .context("damage_reduction needs effect_amount")?,
            },
            "next_card_boost" => {
                let raw = self
                    .boost_type
                    .as_deref()
                    .context("next_card_boost needs boost_type")?;
                SpecialEffect::NextCardBoost {
                    tag: parse_tag(raw)?,
                    multiplier: self
                        .boost_amount
                        .context("next_card_boost needs boost_amount")?,
                }
            }
            "passive_immunity" => SpecialEffect::PassiveImmunity {
                rounds: self
                    .immunity_rounds
                    .context("passive_immunity needs immunity_rounds")?,
            },
            "blood_drain_synergy" => SpecialEffect::BloodDrainSynergy,
            other => bail!("unknown effect {}", other),
        };
        Ok(Some(effect))
    }

    pub fn from_card(card: &CardDef) -> Self {
        let mut record = CardRecord {
            name: card.name.clone(),
            description: card.description.clone(),
            score: card.score,
            hp: card.hp,
            synergy: card.synergy.map(|tag| tag.id().to_string()),
            weight: card.weight,
            ..CardRecord::default()
        };
        if let Some(gamble) = &card.gamble {
            record.chance = Some(gamble.chance);
            record.score_win = Some(gamble.score_win);
            record.hp_lose = Some(gamble.hp_lose);
        }
        match card.effect {
            None => {}
            Some(SpecialEffect::DamageReduction { amount }) => {
                record.effect = Some("damage_reduction".to_string());
                record.effect_amount = Some(amount);
            }
            Some(SpecialEffect::NextCardBoost { tag, multiplier }) => {
                record.effect = Some("next_card_boost".to_string());
                record.boost_type = Some(tag.id().to_string());
                record.boost_amount = Some(multiplier);
            }
            Some(SpecialEffect::PassiveImmunity { rounds }) => {
                record.effect = Some("passive_immunity".to_string());
                record.immunity_rounds = Some(rounds);
            }
            Some(SpecialEffect::BloodDrainSynergy) => {
                record.effect = Some("blood_drain_synergy".to_string());
            }
        }
        record
    }
}

fn parse_tag(raw: &str) -> anyhow::Result<SynergyTag> {
    match SynergyTag::from_id(raw) {
        Some(tag) => Ok(tag),
        None => bail!("unknown synergy tag {}", raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> CardRecord {
        serde_json::from_str(json).expect("parse record")
    }

    #[test]
    fn flat_gamble_record_converts() {
        let card = record(
            r#"{"name":"Gambler","chance":0.6,"score_win":100,"hp_lose":20,"synergy":"luck","weight":10}"#,
        )
        .to_card()
        .expect("card");
        assert_eq!(card.synergy, Some(SynergyTag::Luck));
        let gamble = card.gamble.expect("gamble");
        assert_eq!(gamble.score_win, 100);
        assert_eq!(gamble.hp_lose, 20);
        assert_eq!(card.score, 0);
    }

    #[test]
    fn effect_parameters_are_required() {
        let err = record(r#"{"name":"Stance","weight":1,"effect":"damage_reduction"}"#)
            .to_card()
            .expect_err("missing amount");
        assert!(format!("{err:#}").contains("effect_amount"));
    }

    #[test]
    fn unknown_effect_is_rejected() {
        let err = record(r#"{"name":"Odd","weight":1,"effect":"teleport"}"#)
            .to_card()
            .expect_err("unknown effect");
        assert!(format!("{err:#}").contains("teleport"));
    }

    #[test]
    fn gamble_fields_without_chance_are_rejected() {
        assert!(record(r#"{"name":"Half","weight":1,"score_win":5}"#)
            .to_card()
            .is_err());
    }

    #[test]
    fn record_survives_card_conversion() {
        let card = CardDef::new("Price of Blood", 50, -20, 6.0)
            .with_synergy(SynergyTag::Blood)
            .with_effect(SpecialEffect::NextCardBoost {
                tag: SynergyTag::Blood,
                multiplier: 1.8,
            });
        let back = CardRecord::from_card(&card).to_card().expect("card");
        assert_eq!(back, card);
    }
}
