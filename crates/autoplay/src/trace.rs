use crate::{AutoplayError, PolicyKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunStatus {
    GameOver,
    MaxRounds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub round: u32,
    pub offered: Vec<String>,
    pub card: String,
    pub score_before: i64,
    pub score_after: i64,
    pub hp_before: i64,
    pub hp_after: i64,
    pub event_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionCounters {
    pub gambles: u32,
    pub gambles_won: u32,
    pub heals: u32,
    pub heals_on_cooldown: u32,
    pub passive_drain_total: i64,
    pub blood_penalty_total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTrace {
    pub seed: u64,
    pub status: RunStatus,
    /// Rounds fully resolved.
    pub rounds_played: u32,
    pub final_score: i64,
    pub final_hp: i64,
    pub best_score: i64,
    pub counters: SessionCounters,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub policy: PolicyKind,
    pub seed: u64,
    pub runs: u32,
    pub max_rounds: u32,
    pub mean_rounds: f64,
    pub min_rounds: u32,
    pub max_rounds_played: u32,
    pub mean_score: f64,
    pub min_score: i64,
    pub max_score: i64,
    pub game_over_rate: f64,
    pub gamble_win_rate: Option<f64>,
    pub best_score: i64,
    pub sessions: Vec<SessionTrace>,
}

impl BatchReport {
    pub fn from_traces(
        policy: PolicyKind,
        seed: u64,
        max_rounds: u32,
        sessions: Vec<SessionTrace>,
    ) -> Self {
        let runs = sessions.len() as u32;
        let count = f64::from(runs.max(1));
        let rounds = sessions.iter().map(|trace| trace.rounds_played);
        let scores = sessions.iter().map(|trace| trace.final_score);
        let game_overs = sessions
            .iter()
            .filter(|trace| trace.status == RunStatus::GameOver)
            .count();
        let gambles: u32 = sessions.iter().map(|trace| trace.counters.gambles).sum();
        let gambles_won: u32 = sessions.iter().map(|trace| trace.counters.gambles_won).sum();
        Self {
            policy,
            seed,
            runs,
            max_rounds,
            mean_rounds: rounds.clone().map(f64::from).sum::<f64>() / count,
            min_rounds: rounds.clone().min().unwrap_or(0),
            max_rounds_played: rounds.max().unwrap_or(0),
            mean_score: scores.clone().map(|score| score as f64).sum::<f64>() / count,
            min_score: scores.clone().min().unwrap_or(0),
            max_score: scores.max().unwrap_or(0),
            game_over_rate: game_overs as f64 / count,
            gamble_win_rate: (gambles > 0).then(|| f64::from(gambles_won) / f64::from(gambles)),
            best_score: sessions
                .iter()
                .map(|trace| trace.best_score)
                .max()
                .unwrap_or(0),
            sessions,
        }
    }

    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!(
                "policy: {} seed: {} runs: {} max rounds: {}",
                self.policy.id(),
                self.seed,
                self.runs,
                self.max_rounds
            ),
            format!(
                "rounds: mean {:.1} min {} max {}",
                self.mean_rounds, self.min_rounds, self.max_rounds_played
            ),
            format!(
                "score: mean {:.1} min {} max {} best {}",
                self.mean_score, self.min_score, self.max_score, self.best_score
            ),
            format!("game over rate: {:.1}%", self.game_over_rate * 100.0),
            match self.gamble_win_rate {
                Some(rate) => format!("gamble win rate: {:.1}%", rate * 100.0),
                None => "gamble win rate: (no gambles)".to_string(),
            },
            String::new(),
            "sessions:".to_string(),
        ];
        for trace in &self.sessions {
            lines.push(format!(
                "  seed {:>20} | {} | rounds {:>4} | score {:>7} | hp {:>3} | gambles {}/{} | passive {}",
                trace.seed,
                status_label(trace.status),
                trace.rounds_played,
                trace.final_score,
                trace.final_hp,
                trace.counters.gambles_won,
                trace.counters.gambles,
                trace.counters.passive_drain_total
            ));
            for step in &trace.steps {
                lines.push(format!(
                    "    round {:>4}: {} [{}] score {} -> {} hp {} -> {}",
                    step.round,
                    step.card,
                    step.offered.join(", "),
                    step.score_before,
                    step.score_after,
                    step.hp_before,
                    step.hp_after
                ));
            }
        }
        lines.join("\n")
    }
}

fn status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::GameOver => "game over",
        RunStatus::MaxRounds => "max rounds",
    }
}

pub fn write_json(path: &Path, report: &BatchReport) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(report)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn write_text(path: &Path, report: &BatchReport) -> Result<(), AutoplayError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report.to_text_report())?;
    Ok(())
}

/// JSON for `.json` paths, the plain-text report otherwise.
pub fn write_report(path: &Path, report: &BatchReport) -> Result<(), AutoplayError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        write_json(path, report)
    } else {
        write_text(path, report)
    }
}
