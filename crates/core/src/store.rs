/// Durable home of the best score.
///
/// Saves are fire-and-forget: implementations report their own failures and
/// the engine keeps playing regardless.
pub trait ScoreStore {
    fn load(&self) -> i64;
    fn save(&mut self, best: i64);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: i64,
    saves: usize,
}

impl MemoryStore {
    pub fn with_best(best: i64) -> Self {
        Self { best, saves: 0 }
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> i64 {
        self.best
    }

    fn save(&mut self, best: i64) {
        self.best = best;
        self.saves += 1;
    }
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn load(&self) -> i64 {
        (**self).load()
    }

    fn save(&mut self, best: i64) {
        (**self).save(best)
    }
}
