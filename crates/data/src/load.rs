use crate::schema::CardRecord;
use anyhow::{bail, Context};
use cardrush_core::{BalanceConfig, Catalog, SpecialEffect};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const CARDS_FILE: &str = "cards.json";
pub const BALANCE_FILE: &str = "balance.json";

const BUILTIN_CARDS: &[u8] = include_bytes!("../builtin/cards.json");
const BUILTIN_BALANCE: &[u8] = include_bytes!("../builtin/balance.json");

/// Config and catalog ready for a session, plus notes about any fallbacks.
#[derive(Debug, Clone)]
pub struct Assets {
    pub config: BalanceConfig,
    pub catalog: Catalog,
    pub warnings: Vec<String>,
}

pub fn builtin_balance_config() -> BalanceConfig {
    parse_balance_config(BUILTIN_BALANCE).expect("built-in balance.json must be valid")
}

pub fn builtin_catalog() -> Catalog {
    parse_catalog(BUILTIN_CARDS).expect("built-in cards.json must be valid")
}

pub fn builtin_assets() -> Assets {
    Assets {
        config: builtin_balance_config(),
        catalog: builtin_catalog(),
        warnings: Vec::new(),
    }
}

pub fn parse_balance_config(bytes: &[u8]) -> anyhow::Result<BalanceConfig> {
    let config: BalanceConfig = serde_json::from_slice(bytes).context("parse balance JSON")?;
    validate_balance_config(&config)?;
    Ok(config)
}

pub fn parse_catalog(bytes: &[u8]) -> anyhow::Result<Catalog> {
    let records: Vec<CardRecord> = serde_json::from_slice(bytes).context("parse cards JSON")?;
    catalog_from_records(&records)
}

pub fn catalog_from_records(records: &[CardRecord]) -> anyhow::Result<Catalog> {
    let cards = records
        .iter()
        .map(CardRecord::to_card)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let catalog = Catalog::new(cards);
    validate_catalog(&catalog)?;
    Ok(catalog)
}

pub fn load_balance_config(dir: &Path) -> anyhow::Result<BalanceConfig> {
    let path = dir.join(BALANCE_FILE);
    let config: BalanceConfig = load_json(&path)?;
    validate_balance_config(&config).with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

pub fn load_catalog(dir: &Path) -> anyhow::Result<Catalog> {
    let path = dir.join(CARDS_FILE);
    let records: Vec<CardRecord> = load_json(&path)?;
    catalog_from_records(&records).with_context(|| format!("validate {}", path.display()))
}

/// Loads both files from `dir`, falling back to the built-in copy for any
/// file the directory does not contain. A file that exists but is broken is
/// an error.
pub fn load_assets(dir: Option<&Path>) -> anyhow::Result<Assets> {
    let Some(dir) = dir else {
        return Ok(builtin_assets());
    };
    if !dir.is_dir() {
        bail!("assets directory {} does not exist", dir.display());
    }
    let mut warnings = Vec::new();
    let config = if dir.join(BALANCE_FILE).exists() {
        load_balance_config(dir)?
    } else {
        warnings.push(format!(
            "{} has no {}, using built-in balance",
            dir.display(),
            BALANCE_FILE
        ));
        builtin_balance_config()
    };
    let catalog = if dir.join(CARDS_FILE).exists() {
        load_catalog(dir)?
    } else {
        warnings.push(format!(
            "{} has no {}, using built-in cards",
            dir.display(),
            CARDS_FILE
        ));
        builtin_catalog()
    };
    Ok(Assets {
        config,
        catalog,
        warnings,
    })
}

pub fn validate_balance_config(config: &BalanceConfig) -> anyhow::Result<()> {
    let positive = [
        ("chance_round_divisor", config.chance_round_divisor),
        (
            "chance_failure_round_divisor",
            config.chance_failure_round_divisor,
        ),
        ("round_multiplier_base", config.round_multiplier_base),
        ("round_multiplier_power_base", config.round_multiplier_power_base),
    ];
    for (field, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            bail!("{} must be positive, got {}", field, value);
        }
    }
    let divisors = [
        (
            "chance_failure_score_penalty_divisor",
            config.chance_failure_score_penalty_divisor,
        ),
        ("heal_round_penalty_divisor", config.heal_round_penalty_divisor),
        ("normal_damage_round_divisor", config.normal_damage_round_divisor),
    ];
    for (field, value) in divisors {
        if value == 0 {
            bail!("{} must be positive", field);
        }
    }
    if !(0.0..=1.0).contains(&config.chance_min_adjusted) {
        bail!(
            "chance_min_adjusted must be within [0, 1], got {}",
            config.chance_min_adjusted
        );
    }
    if config.hp_change_max_negative > 0 || config.hp_change_max_positive < 0 {
        bail!(
            "hp change window [{}, {}] must contain 0",
            config.hp_change_max_negative,
            config.hp_change_max_positive
        );
    }
    if config.difficulty.max_hp_cap <= 0 {
        bail!("max_hp_cap must be positive");
    }
    if config.card_draw_count == 0 {
        bail!("card_draw_count must be at least 1");
    }
    if !config.difficulty.level.is_finite() || config.difficulty.level < 0.0 {
        bail!("difficulty level must be non-negative");
    }
    Ok(())
}

pub fn validate_catalog(catalog: &Catalog) -> anyhow::Result<()> {
    if catalog.is_empty() {
        bail!("card catalog is empty");
    }
    let mut seen = HashSet::new();
    for card in catalog.cards() {
        if card.name.trim().is_empty() {
            bail!("card name cannot be empty");
        }
        if !seen.insert(card.name.as_str()) {
            bail!("duplicate card {}", card.name);
        }
        if !card.weight.is_finite() || card.weight <= 0.0 {
            bail!("card {} weight must be positive, got {}", card.name, card.weight);
        }
        if let Some(gamble) = &card.gamble {
            if !(0.0..=1.0).contains(&gamble.chance) {
                bail!(
                    "card {} chance must be within [0, 1], got {}",
                    card.name,
                    gamble.chance
                );
            }
            if gamble.hp_lose < 0 {
                bail!("card {} hp_lose must not be negative", card.name);
            }
        }
        match card.effect {
            Some(SpecialEffect::DamageReduction { amount }) if !(0.0..=1.0).contains(&amount) => {
                bail!(
                    "card {} damage reduction must be within [0, 1], got {}",
                    card.name,
                    amount
                );
            }
            Some(SpecialEffect::NextCardBoost { multiplier, .. })
                if !multiplier.is_finite() || multiplier <= 0.0 =>
            {
                bail!("card {} boost must be positive, got {}", card.name, multiplier);
            }
            _ => {}
        }
    }
    Ok(())
}

pub(crate) fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
