use crate::{CardDef, Catalog, NextCardBoost, RngState};
use std::collections::HashSet;

/// Weight of `card` once the pending boost (if any) is applied.
pub fn effective_weight(card: &CardDef, boost: Option<&NextCardBoost>) -> f64 {
    match boost {
        Some(boost) if card.synergy == Some(boost.tag) => card.weight * boost.multiplier,
        _ => card.weight,
    }
}

/// Number of pool entries for a weight. Fractional weights round up.
pub fn pool_copies(weight: f64) -> usize {
    if !weight.is_finite() || weight <= 0.0 {
        return 0;
    }
    weight.ceil() as usize
}

/// Multiset of card references, one entry per unit of effective weight.
#[derive(Debug, Default, Clone)]
pub struct WeightedDeck<'a> {
    pub draw: Vec<&'a CardDef>,
}

impl<'a> WeightedDeck<'a> {
    pub fn build(cards: &'a [CardDef], boost: Option<&NextCardBoost>) -> Self {
        let mut draw = Vec::new();
        for card in cards {
            let copies = pool_copies(effective_weight(card, boost));
            draw.extend(std::iter::repeat(card).take(copies));
        }
        Self { draw }
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.draw);
    }

    /// Scans the pool front to back, keeping the first `count` distinct names.
    pub fn take_distinct(&self, count: usize) -> Vec<&'a CardDef> {
        let mut hand = Vec::with_capacity(count);
        let mut seen: HashSet<&str> = HashSet::new();
        for card in &self.draw {
            if hand.len() >= count {
                break;
            }
            if seen.insert(card.name.as_str()) {
                hand.push(*card);
            }
        }
        hand
    }
}

/// Draws up to `count` distinct cards, weight-proportional.
///
/// Shuffle-then-scan only approximates weighted sampling without replacement;
/// later picks lean slightly toward light cards compared to an exact draw.
pub fn draw_hand<'a>(
    catalog: &'a Catalog,
    boost: Option<&NextCardBoost>,
    count: usize,
    rng: &mut RngState,
) -> Vec<&'a CardDef> {
    let mut deck = WeightedDeck::build(catalog.cards(), boost);
    deck.shuffle(rng);
    deck.take_distinct(count)
}
