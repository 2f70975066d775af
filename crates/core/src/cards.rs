use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SynergyTag {
    Fire,
    Mind,
    Blood,
    Luck,
}

pub const UNTAGGED_COLOR: &str = "#cccccc";

impl SynergyTag {
    pub const ALL: [SynergyTag; 4] = [Self::Fire, Self::Mind, Self::Blood, Self::Luck];

    pub fn id(self) -> &'static str {
        match self {
            Self::Fire => "FIRE",
            Self::Mind => "MIND",
            Self::Blood => "BLOOD",
            Self::Luck => "LUCK",
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.id().eq_ignore_ascii_case(value.trim()))
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Fire => "#e74c3c",
            Self::Mind => "#2ecc71",
            Self::Blood => "#9b59b6",
            Self::Luck => "#f1c40f",
        }
    }
}

pub fn tag_color(tag: Option<SynergyTag>) -> &'static str {
    tag.map(SynergyTag::color).unwrap_or(UNTAGGED_COLOR)
}

/// Weight multiplier applied to one tag for the next hand only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NextCardBoost {
    pub tag: SynergyTag,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecialEffect {
    DamageReduction { amount: f64 },
    NextCardBoost { tag: SynergyTag, multiplier: f64 },
    PassiveImmunity { rounds: u32 },
    BloodDrainSynergy,
}

/// Chance-gated payout. A card carrying one skips the normal score/HP path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Gamble {
    pub chance: f64,
    pub score_win: i64,
    pub hp_lose: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardDef {
    /// Unique within a catalog; hands are deduplicated on it.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub score: i64,
    pub hp: i64,
    #[serde(default)]
    pub gamble: Option<Gamble>,
    #[serde(default)]
    pub synergy: Option<SynergyTag>,
    pub weight: f64,
    #[serde(default)]
    pub effect: Option<SpecialEffect>,
}

impl CardDef {
    pub fn new(name: impl Into<String>, score: i64, hp: i64, weight: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            score,
            hp,
            gamble: None,
            synergy: None,
            weight,
            effect: None,
        }
    }

    #[must_use]
    pub fn with_synergy(mut self, tag: SynergyTag) -> Self {
        self.synergy = Some(tag);
        self
    }

    #[must_use]
    pub fn with_gamble(mut self, chance: f64, score_win: i64, hp_lose: i64) -> Self {
        self.gamble = Some(Gamble {
            chance,
            score_win,
            hp_lose,
        });
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: SpecialEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn is_gamble(&self) -> bool {
        self.gamble.is_some()
    }

    /// Heal-type cards are selected by the sign of `hp`, never by a flag.
    pub fn is_heal(&self) -> bool {
        self.gamble.is_none() && self.hp > 0
    }

    pub fn color(&self) -> &'static str {
        tag_color(self.synergy)
    }
}
