use crate::{
    policy_for, AutoplayConfig, AutoplayError, BatchReport, Policy, PolicyView, RunStatus,
    SessionCounters, SessionTrace, StepRecord,
};
use cardrush_core::{
    CardPreview, Event, EventBus, ResolutionPath, RngState, ScoreStore, Session,
};

/// Plays `session` with `policy` until game over or `max_rounds` choices.
pub fn simulate_session<S: ScoreStore>(
    session: &mut Session<S>,
    policy: &mut dyn Policy,
    max_rounds: u32,
    record_steps: bool,
    rng: &mut RngState,
) -> Result<SessionTrace, AutoplayError> {
    let mut events = EventBus::default();
    let mut counters = SessionCounters::default();
    let mut steps = Vec::new();
    let mut played = 0;
    let mut status = RunStatus::MaxRounds;

    while played < max_rounds {
        if session.is_over() {
            status = RunStatus::GameOver;
            break;
        }
        session.draw_hand(&mut events)?;
        let hand = session.hand().to_vec();
        if hand.is_empty() {
            return Err(AutoplayError::EmptyHand);
        }
        let previews: Vec<CardPreview> = hand.iter().map(|card| session.preview(card)).collect();
        let index = {
            let view = PolicyView {
                state: session.state(),
                hand: &hand,
                previews: &previews,
            };
            policy.choose(&view, rng)
        };
        if index >= hand.len() {
            return Err(AutoplayError::InvalidChoice {
                index,
                len: hand.len(),
            });
        }

        let outcome = session.choose_index(index, &mut events)?;
        played += 1;
        match outcome.report.path {
            ResolutionPath::Gamble { won, .. } => {
                counters.gambles += 1;
                counters.gambles_won += u32::from(won);
            }
            ResolutionPath::Heal { applied: true } => counters.heals += 1,
            ResolutionPath::Heal { applied: false } => counters.heals_on_cooldown += 1,
            ResolutionPath::Damage => {}
        }
        counters.passive_drain_total += outcome.report.passive_drain;
        let mut event_count = 0;
        for event in events.drain() {
            event_count += 1;
            if let Event::BloodPenalty { amount } = event {
                counters.blood_penalty_total += amount;
            }
        }
        if record_steps {
            steps.push(StepRecord {
                round: outcome.report.round,
                offered: hand.iter().map(|card| card.name.clone()).collect(),
                card: outcome.report.card.clone(),
                score_before: outcome.report.score_before,
                score_after: outcome.report.score_after,
                hp_before: outcome.report.hp_before,
                hp_after: outcome.report.hp_after,
                event_count,
            });
        }
    }
    if session.is_over() {
        status = RunStatus::GameOver;
    }

    let state = session.state();
    Ok(SessionTrace {
        seed: session.seed(),
        status,
        rounds_played: played,
        final_score: state.score,
        final_hp: state.hp,
        best_score: session.best_score(),
        counters,
        steps,
    })
}

/// Runs `config.runs` sessions, each built by `factory` from its own seed.
pub fn simulate_batch<F, S>(factory: &F, config: &AutoplayConfig) -> Result<BatchReport, AutoplayError>
where
    F: Fn(u64) -> Result<Session<S>, AutoplayError>,
    S: ScoreStore,
{
    let mut policy = policy_for(config);
    let mut policy_rng = RngState::from_seed(config.seed ^ 0x9E37_79B9_7F4A_7C15);
    let mut traces = Vec::with_capacity(config.runs as usize);
    for run in 0..config.runs {
        let seed = config.seed.wrapping_add(u64::from(run));
        let mut session = factory(seed)?;
        let trace = simulate_session(
            &mut session,
            policy.as_mut(),
            config.max_rounds,
            config.record_steps,
            &mut policy_rng,
        )?;
        traces.push(trace);
    }
    Ok(BatchReport::from_traces(
        config.policy,
        config.seed,
        config.max_rounds,
        traces,
    ))
}
