use crate::{SpecialEffect, SynergyTag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    HandDrawn {
        count: usize,
        boosted: Option<SynergyTag>,
    },
    CardChosen {
        name: String,
        round: u32,
    },
    GambleWon {
        chance: f64,
        score: i64,
    },
    GambleLost {
        chance: f64,
        hp_loss: i64,
        score_penalty: i64,
    },
    HealApplied { amount: i64 },
    HealOnCooldown { rounds_left: u32 },
    BloodPenalty { amount: i64 },
    BloodDrain { amount: i64 },
    DamageReduced { before: i64, after: i64 },
    EffectArmed(SpecialEffect),
    HpChanged { delta: i64, hp: i64 },
    PassiveDrain { amount: i64, hp: i64 },
    NewBestScore { score: i64 },
    RoundAlert { round: u32 },
    GameOver { score: i64, round: u32 },
    SessionReset,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.queue.iter()
    }
}
