use crate::{
    draw_hand, preview_card, resolve_round, round_multiplier, BalanceConfig, CardDef,
    CardPreview, Catalog, Event, EventBus, MemoryStore, NextCardBoost, PlayerState, RngState,
    RoundReport, ScoreStore,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("card {name:?} is not in the current hand")]
    InvalidSelection { name: String },
    #[error("no hand has been drawn")]
    NoHandDrawn,
    #[error("session over at round {round} with score {score}; reset to play again")]
    GameOver { score: i64, round: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOutcome {
    pub state: PlayerState,
    pub game_over: bool,
    pub report: RoundReport,
}

/// Read-only snapshot for a heads-up display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub round: u32,
    pub score: i64,
    pub hp: i64,
    pub max_hp: i64,
    pub best_score: i64,
    pub new_record: bool,
    pub damage_reduction_percent: u32,
    pub passive_immunity_rounds: u32,
    pub boost: Option<NextCardBoost>,
    pub heal_cooldown_left: u32,
}

/// Owns one player's run: state, best score, the current hand and the RNG.
#[derive(Debug)]
pub struct Session<S: ScoreStore = MemoryStore> {
    config: BalanceConfig,
    catalog: Catalog,
    rng: RngState,
    state: PlayerState,
    best_score: i64,
    store: S,
    hand: Vec<CardDef>,
    hand_boost: Option<NextCardBoost>,
    over: bool,
}

impl Session<MemoryStore> {
    pub fn in_memory(config: BalanceConfig, catalog: Catalog, seed: u64) -> Self {
        Self::new(config, catalog, RngState::from_seed(seed), MemoryStore::default())
    }
}

impl<S: ScoreStore> Session<S> {
    pub fn new(config: BalanceConfig, catalog: Catalog, rng: RngState, store: S) -> Self {
        let state = PlayerState::new(&config);
        let best_score = store.load().max(0);
        Self {
            config,
            catalog,
            rng,
            state,
            best_score,
            store,
            hand: Vec::new(),
            hand_boost: None,
            over: false,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn best_score(&self) -> i64 {
        self.best_score
    }

    pub fn hand(&self) -> &[CardDef] {
        &self.hand
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn multiplier(&self) -> f64 {
        round_multiplier(self.state.round, &self.config)
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        if self.over {
            return Err(SessionError::GameOver {
                score: self.state.score,
                round: self.state.round,
            });
        }
        Ok(())
    }

    /// Draws a hand of the configured size, replacing any previous one.
    pub fn draw_hand(&mut self, events: &mut EventBus) -> Result<&[CardDef], SessionError> {
        let count = self.config.card_draw_count;
        self.draw_hand_of(count, events)
    }

    /// Draws `count` cards. A pending next-card boost is spent by this draw;
    /// redrawing before a choice samples unboosted.
    pub fn draw_hand_of(
        &mut self,
        count: usize,
        events: &mut EventBus,
    ) -> Result<&[CardDef], SessionError> {
        self.ensure_running()?;
        let boost = self.state.next_card_boost.take();
        self.hand_boost = boost;
        self.hand = draw_hand(&self.catalog, boost.as_ref(), count, &mut self.rng)
            .into_iter()
            .cloned()
            .collect();
        events.push(Event::HandDrawn {
            count: self.hand.len(),
            boosted: boost.map(|boost| boost.tag),
        });
        Ok(&self.hand)
    }

    /// Plays the card named `name` from the current hand. A successful choice
    /// spends the hand; a rejected name leaves it untouched.
    pub fn choose_card(
        &mut self,
        name: &str,
        events: &mut EventBus,
    ) -> Result<ChoiceOutcome, SessionError> {
        self.ensure_running()?;
        if self.hand.is_empty() {
            return Err(SessionError::NoHandDrawn);
        }
        let Some(index) = self.hand.iter().position(|card| card.name == name) else {
            return Err(SessionError::InvalidSelection {
                name: name.to_string(),
            });
        };
        let card = self.hand.swap_remove(index);
        self.hand.clear();
        self.hand_boost = None;

        let previous_best = self.best_score;
        let report = resolve_round(
            &mut self.state,
            &card,
            &self.config,
            &mut self.best_score,
            &mut self.rng,
            events,
        );
        if self.best_score > previous_best {
            self.store.save(self.best_score);
        }
        self.over = report.game_over;
        Ok(ChoiceOutcome {
            state: self.state.clone(),
            game_over: report.game_over,
            report,
        })
    }

    pub fn choose_index(
        &mut self,
        index: usize,
        events: &mut EventBus,
    ) -> Result<ChoiceOutcome, SessionError> {
        self.ensure_running()?;
        let Some(card) = self.hand.get(index) else {
            if self.hand.is_empty() {
                return Err(SessionError::NoHandDrawn);
            }
            return Err(SessionError::InvalidSelection {
                name: format!("#{}", index.saturating_add(1)),
            });
        };
        let name = card.name.clone();
        self.choose_card(&name, events)
    }

    pub fn preview(&self, card: &CardDef) -> CardPreview {
        preview_card(&self.state, card, &self.config)
    }

    pub fn hud(&self) -> Hud {
        Hud {
            round: self.state.round,
            score: self.state.score,
            hp: self.state.hp,
            max_hp: self.config.max_hp(),
            best_score: self.best_score,
            new_record: self.best_score > 0 && self.state.score >= self.best_score,
            damage_reduction_percent: (self.state.temp_damage_reduction * 100.0).round() as u32,
            passive_immunity_rounds: self.state.passive_immunity_rounds,
            boost: self.state.next_card_boost.or(self.hand_boost),
            heal_cooldown_left: self.state.heal_cooldown_left(&self.config),
        }
    }

    /// Starts a fresh run. The best score is kept.
    pub fn reset(&mut self, events: &mut EventBus) {
        self.state = PlayerState::new(&self.config);
        self.hand.clear();
        self.hand_boost = None;
        self.over = false;
        events.push(Event::SessionReset);
    }
}
