use crate::CardDef;

/// Read-only card definitions shared by the sampler and the session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<CardDef>,
}

impl Catalog {
    pub fn new(cards: Vec<CardDef>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[CardDef] {
        &self.cards
    }

    pub fn get(&self, name: &str) -> Option<&CardDef> {
        self.cards.iter().find(|card| card.name == name)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
