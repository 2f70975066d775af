use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Random,
    Greedy,
    Cautious,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [Self::Random, Self::Greedy, Self::Cautious];

    pub fn id(self) -> &'static str {
        match self {
            PolicyKind::Random => "random",
            PolicyKind::Greedy => "greedy",
            PolicyKind::Cautious => "cautious",
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    pub seed: u64,
    pub runs: u32,
    pub max_rounds: u32,
    pub policy: PolicyKind,
    /// HP the cautious policy tries to stay above.
    pub cautious_reserve: i64,
    pub record_steps: bool,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            runs: 20,
            max_rounds: 500,
            policy: PolicyKind::Greedy,
            cautious_reserve: 15,
            record_steps: false,
        }
    }
}
