use cardrush_autoplay::{
    simulate_batch, simulate_session, write_json, write_report, AutoplayConfig, AutoplayError,
    BatchReport, GreedyScorePolicy, PolicyKind, RunStatus, SessionCounters, SessionTrace,
};
use cardrush_core::{BalanceConfig, CardDef, Catalog, MemoryStore, RngState, Session};
use cardrush_data::builtin_assets;
use std::time::{SystemTime, UNIX_EPOCH};

fn builtin_session(seed: u64) -> Result<Session<MemoryStore>, AutoplayError> {
    let assets = builtin_assets();
    Ok(Session::in_memory(assets.config, assets.catalog, seed))
}

fn config(policy: PolicyKind, runs: u32, max_rounds: u32) -> AutoplayConfig {
    AutoplayConfig {
        seed: 2024,
        runs,
        max_rounds,
        policy,
        ..AutoplayConfig::default()
    }
}

macro_rules! policy_case {
    ($name:ident, $policy:expr) => {
        #[test]
        fn $name() {
            let cfg = config($policy, 6, 120);
            let first = simulate_batch(&builtin_session, &cfg).expect("batch");
            let second = simulate_batch(&builtin_session, &cfg).expect("batch");
            assert_eq!(first.runs, 6);
            assert_eq!(first.sessions.len(), 6);
            for (a, b) in first.sessions.iter().zip(&second.sessions) {
                assert_eq!(a.final_score, b.final_score);
                assert_eq!(a.rounds_played, b.rounds_played);
            }
            for trace in &first.sessions {
                assert!(trace.rounds_played <= 120);
                match trace.status {
                    RunStatus::GameOver => assert!(trace.final_hp <= 0),
                    RunStatus::MaxRounds => {
                        assert_eq!(trace.rounds_played, 120);
                        assert!(trace.final_hp > 0);
                    }
                }
                assert!(trace.best_score >= trace.final_score);
                assert!(trace.counters.gambles_won <= trace.counters.gambles);
            }
        }
    };
}

policy_case!(random_policy_is_reproducible, PolicyKind::Random);
policy_case!(greedy_policy_is_reproducible, PolicyKind::Greedy);
policy_case!(cautious_policy_is_reproducible, PolicyKind::Cautious);

#[test]
fn recorded_steps_follow_rounds() {
    let mut session = builtin_session(77).expect("session");
    let mut rng = RngState::from_seed(1);
    let trace = simulate_session(&mut session, &mut GreedyScorePolicy, 30, true, &mut rng)
        .expect("trace");
    assert_eq!(trace.steps.len() as u32, trace.rounds_played);
    for (index, step) in trace.steps.iter().enumerate() {
        assert_eq!(step.round, index as u32 + 1);
        assert!(step.offered.contains(&step.card));
        assert!(step.offered.len() <= 3);
    }
    for pair in trace.steps.windows(2) {
        assert_eq!(pair[0].score_after, pair[1].score_before);
        assert_eq!(pair[0].hp_after, pair[1].hp_before);
    }
}

#[test]
fn lethal_catalog_ends_in_game_over() {
    let factory = |seed: u64| -> Result<Session<MemoryStore>, AutoplayError> {
        let catalog = Catalog::new(vec![CardDef::new("cliff", 5, -30, 1.0)]);
        Ok(Session::in_memory(BalanceConfig::default(), catalog, seed))
    };
    let report = simulate_batch(&factory, &config(PolicyKind::Greedy, 3, 50)).expect("batch");
    assert_eq!(report.game_over_rate, 1.0);
    assert_eq!(report.max_rounds_played, 4);
    assert_eq!(report.min_rounds, 4);
    assert_eq!(report.gamble_win_rate, None);
}

#[test]
fn batch_aggregates_traces() {
    let trace = |status, rounds, score, gambles, won| SessionTrace {
        seed: 0,
        status,
        rounds_played: rounds,
        final_score: score,
        final_hp: if status == RunStatus::GameOver { 0 } else { 10 },
        best_score: score,
        counters: SessionCounters {
            gambles,
            gambles_won: won,
            ..SessionCounters::default()
        },
        steps: Vec::new(),
    };
    let report = BatchReport::from_traces(
        PolicyKind::Random,
        5,
        100,
        vec![
            trace(RunStatus::GameOver, 10, 100, 4, 3),
            trace(RunStatus::MaxRounds, 100, 900, 4, 1),
        ],
    );
    assert_eq!(report.mean_rounds, 55.0);
    assert_eq!(report.mean_score, 500.0);
    assert_eq!(report.min_score, 100);
    assert_eq!(report.best_score, 900);
    assert_eq!(report.game_over_rate, 0.5);
    assert_eq!(report.gamble_win_rate, Some(0.5));
    let text = report.to_text_report();
    assert!(text.contains("game over rate: 50.0%"));
    assert!(text.contains("policy: random"));
}

#[test]
fn report_json_roundtrip() {
    let report = simulate_batch(&builtin_session, &config(PolicyKind::Cautious, 2, 20))
        .expect("batch");
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let path = std::env::temp_dir()
        .join(format!("cardrush_autoplay_{}_{}", std::process::id(), nanos))
        .join("report.json");
    write_json(&path, &report).expect("write");
    let body = std::fs::read_to_string(&path).expect("read");
    let loaded: BatchReport = serde_json::from_str(&body).expect("parse");
    assert_eq!(loaded.runs, 2);
    assert_eq!(loaded.policy, PolicyKind::Cautious);
    if let Some(parent) = path.parent() {
        let _ = std::fs::remove_dir_all(parent);
    }
}

#[test]
fn report_extension_picks_the_format() {
    let report = simulate_batch(&builtin_session, &config(PolicyKind::Random, 2, 15))
        .expect("batch");
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "cardrush_autoplay_fmt_{}_{}",
        std::process::id(),
        nanos
    ));
    let text_path = dir.join("report.txt");
    let json_path = dir.join("report.JSON");
    write_report(&text_path, &report).expect("write text");
    write_report(&json_path, &report).expect("write json");

    let text = std::fs::read_to_string(&text_path).expect("read text");
    assert_eq!(text, report.to_text_report());
    let body = std::fs::read_to_string(&json_path).expect("read json");
    let loaded: BatchReport = serde_json::from_str(&body).expect("parse");
    assert_eq!(loaded.runs, 2);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_hands_and_factory_failures_abort_the_batch() {
    let no_draws = |seed: u64| -> Result<Session<MemoryStore>, AutoplayError> {
        let mut config = BalanceConfig::default();
        config.card_draw_count = 0;
        let catalog = Catalog::new(vec![CardDef::new("coin", 10, 0, 1.0)]);
        Ok(Session::in_memory(config, catalog, seed))
    };
    let err = simulate_batch(&no_draws, &config(PolicyKind::Greedy, 1, 5)).unwrap_err();
    assert!(matches!(err, AutoplayError::EmptyHand));

    let broken = |_seed: u64| -> Result<Session<MemoryStore>, AutoplayError> {
        Err(AutoplayError::Factory("no assets".to_string()))
    };
    let err = simulate_batch(&broken, &config(PolicyKind::Greedy, 1, 5)).unwrap_err();
    assert_eq!(err.to_string(), "factory error: no assets");
}
