use crate::{AutoplayConfig, PolicyKind};
use cardrush_core::{CardDef, CardPreview, PlayerState, RngState};

/// What a policy may look at when picking a card.
#[derive(Debug, Clone)]
pub struct PolicyView<'a> {
    pub state: &'a PlayerState,
    pub hand: &'a [CardDef],
    pub previews: &'a [CardPreview],
}

pub trait Policy {
    fn name(&self) -> &'static str;

    /// Returns an index into `view.hand`. Never called with an empty hand.
    fn choose(&mut self, view: &PolicyView, rng: &mut RngState) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose(&mut self, view: &PolicyView, rng: &mut RngState) -> usize {
        if view.hand.len() <= 1 {
            return 0;
        }
        (rng.next_u64() % view.hand.len() as u64) as usize
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyScorePolicy;

impl Policy for GreedyScorePolicy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose(&mut self, view: &PolicyView, _rng: &mut RngState) -> usize {
        best_by(view.previews, |preview| (preview.score, preview.hp)).unwrap_or(0)
    }
}

/// Plays for score while the worst case keeps HP above `reserve`, otherwise
/// takes whatever hurts least.
#[derive(Debug, Clone, Copy)]
pub struct CautiousPolicy {
    pub reserve: i64,
}

impl Policy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "cautious"
    }

    fn choose(&mut self, view: &PolicyView, _rng: &mut RngState) -> usize {
        let hp = view.state.hp;
        let safe = view
            .previews
            .iter()
            .enumerate()
            .filter(|(_, preview)| hp + preview.hp > self.reserve)
            .max_by_key(|(index, preview)| (preview.score, preview.hp, usize::MAX - index))
            .map(|(index, _)| index);
        safe.or_else(|| best_by(view.previews, |preview| (preview.hp, preview.score)))
            .unwrap_or(0)
    }
}

/// First index with the largest key.
fn best_by<K: Ord>(previews: &[CardPreview], key: impl Fn(&CardPreview) -> K) -> Option<usize> {
    let mut best: Option<(usize, K)> = None;
    for (index, preview) in previews.iter().enumerate() {
        let candidate = key(preview);
        match &best {
            Some((_, current)) if *current >= candidate => {}
            _ => best = Some((index, candidate)),
        }
    }
    best.map(|(index, _)| index)
}

pub fn policy_for(config: &AutoplayConfig) -> Box<dyn Policy> {
    match config.policy {
        PolicyKind::Random => Box::new(RandomPolicy),
        PolicyKind::Greedy => Box::new(GreedyScorePolicy),
        PolicyKind::Cautious => Box::new(CautiousPolicy {
            reserve: config.cautious_reserve,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardrush_core::BalanceConfig;

    fn preview(score: i64, hp: i64) -> CardPreview {
        CardPreview {
            score,
            hp,
            on_cooldown: false,
            chance_percent: None,
            effective_chance: None,
        }
    }

    fn hand(len: usize) -> Vec<CardDef> {
        (0..len)
            .map(|index| CardDef::new(format!("card{index}"), 1, 0, 1.0))
            .collect()
    }

    #[test]
    fn greedy_takes_highest_score_then_first() {
        let state = PlayerState::new(&BalanceConfig::default());
        let cards = hand(3);
        let previews = [preview(10, -5), preview(40, -8), preview(40, -8)];
        let view = PolicyView {
            state: &state,
            hand: &cards,
            previews: &previews,
        };
        let mut rng = RngState::from_seed(1);
        assert_eq!(GreedyScorePolicy.choose(&view, &mut rng), 1);
    }

    #[test]
    fn cautious_avoids_lethal_cards() {
        let mut state = PlayerState::new(&BalanceConfig::default());
        state.hp = 20;
        let cards = hand(3);
        let previews = [preview(50, -20), preview(8, 12), preview(25, -4)];
        let view = PolicyView {
            state: &state,
            hand: &cards,
            previews: &previews,
        };
        let mut rng = RngState::from_seed(1);
        let mut policy = CautiousPolicy { reserve: 15 };
        assert_eq!(policy.choose(&view, &mut rng), 2);
        state.hp = 10;
        let view = PolicyView {
            state: &state,
            hand: &cards,
            previews: &previews,
        };
        assert_eq!(policy.choose(&view, &mut rng), 1);
    }

    #[test]
    fn random_stays_in_hand() {
        let state = PlayerState::new(&BalanceConfig::default());
        let cards = hand(3);
        let previews = [preview(0, 0); 3];
        let view = PolicyView {
            state: &state,
            hand: &cards,
            previews: &previews,
        };
        let mut rng = RngState::from_seed(9);
        for _ in 0..200 {
            assert!(RandomPolicy.choose(&view, &mut rng) < 3);
        }
    }

    #[test]
    fn policy_kind_ids_parse() {
        for kind in PolicyKind::ALL {
            assert_eq!(PolicyKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(PolicyKind::from_id(" GREEDY "), Some(PolicyKind::Greedy));
        assert_eq!(PolicyKind::from_id("mcts"), None);
    }
}
