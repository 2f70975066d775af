use cardrush_autoplay::{
    policy_for, simulate_batch, write_report, AutoplayConfig, AutoplayError, PolicyKind, PolicyView,
};
use cardrush_core::{
    BalanceConfig, CardDef, ChoiceOutcome, Event, EventBus, MemoryStore, PlayerState, RngState,
    ScoreStore, Session, SessionError,
};
use cardrush_data::{default_best_path, load_assets, Assets, FileScoreStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiLocale {
    EnUs,
    ZhCn,
}

impl UiLocale {
    fn from_opt(value: Option<&str>) -> Self {
        let normalized = value
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
            .replace('-', "_");
        if normalized.starts_with("zh") {
            Self::ZhCn
        } else {
            Self::EnUs
        }
    }

    fn text<'a>(self, en: &'a str, zh: &'a str) -> &'a str {
        if matches!(self, Self::ZhCn) {
            zh
        } else {
            en
        }
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    seed: Option<u64>,
    assets: Option<PathBuf>,
    auto: bool,
    simulate: Option<u32>,
    policy: PolicyKind,
    max_rounds: u32,
    json: bool,
    report: Option<PathBuf>,
    locale: UiLocale,
}

const DEFAULT_AUTO_ROUNDS: u32 = 500;

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        seed: None,
        assets: std::env::var_os("CARDRUSH_ASSETS").map(PathBuf::from),
        auto: false,
        simulate: None,
        policy: PolicyKind::Greedy,
        max_rounds: DEFAULT_AUTO_ROUNDS,
        json: false,
        report: None,
        locale: UiLocale::from_opt(std::env::var("CARDRUSH_LANG").ok().as_deref()),
    };
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        let mut value = || {
            idx += 1;
            args.get(idx)
                .cloned()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match flag {
            "--auto" => options.auto = true,
            "--json" => options.json = true,
            "--seed" => {
                let raw = value()?;
                options.seed = Some(
                    raw.parse::<u64>()
                        .map_err(|_| format!("invalid seed '{raw}'"))?,
                );
            }
            "--assets" => options.assets = Some(PathBuf::from(value()?)),
            "--simulate" => {
                let raw = value()?;
                options.simulate = Some(
                    raw.parse::<u32>()
                        .map_err(|_| format!("invalid run count '{raw}'"))?,
                );
            }
            "--policy" => {
                let raw = value()?;
                options.policy = PolicyKind::from_id(&raw)
                    .ok_or_else(|| format!("unknown policy '{raw}' (random|greedy|cautious)"))?;
            }
            "--max-rounds" => {
                let raw = value()?;
                options.max_rounds = raw
                    .parse::<u32>()
                    .map_err(|_| format!("invalid round limit '{raw}'"))?;
            }
            "--report" => options.report = Some(PathBuf::from(value()?)),
            "--lang" | "-l" => {
                let raw = value()?;
                options.locale = UiLocale::from_opt(Some(&raw));
            }
            other => eprintln!("option warning: ignoring unknown option {other}"),
        }
        idx += 1;
    }
    Ok(options)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("option error: {err}");
            std::process::exit(1);
        }
    };
    let assets = match load_assets(options.assets.as_deref()) {
        Ok(assets) => assets,
        Err(err) => {
            eprintln!("assets error: {err:#}");
            std::process::exit(1);
        }
    };
    for warning in &assets.warnings {
        eprintln!("assets warning: {warning}");
    }
    if let Some(runs) = options.simulate {
        if let Err(err) = run_simulation(&options, &assets, runs) {
            eprintln!("simulation error: {err}");
            std::process::exit(1);
        }
        return;
    }
    if options.auto {
        run_auto(&options, assets);
        return;
    }
    if let Err(err) = run_interactive(&options, assets) {
        eprintln!("terminal error: {err}");
        std::process::exit(1);
    }
}

fn new_rng(seed: Option<u64>) -> RngState {
    match seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    }
}

fn run_simulation(options: &CliOptions, assets: &Assets, runs: u32) -> Result<(), AutoplayError> {
    let config = AutoplayConfig {
        seed: options.seed.unwrap_or(AutoplayConfig::default().seed),
        runs,
        max_rounds: options.max_rounds,
        policy: options.policy,
        ..AutoplayConfig::default()
    };
    let factory = |seed: u64| -> Result<Session<MemoryStore>, AutoplayError> {
        Ok(Session::in_memory(
            assets.config.clone(),
            assets.catalog.clone(),
            seed,
        ))
    };
    let report = simulate_batch(&factory, &config)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.to_text_report());
    }
    if let Some(path) = options.report.as_deref() {
        write_report(path, &report)?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

/// Plays one session with the chosen policy and narrates every event.
fn run_auto(options: &CliOptions, assets: Assets) {
    let locale = options.locale;
    let autoplay = AutoplayConfig {
        policy: options.policy,
        ..AutoplayConfig::default()
    };
    let mut policy = policy_for(&autoplay);
    let mut session = Session::new(
        assets.config,
        assets.catalog,
        new_rng(options.seed),
        MemoryStore::default(),
    );
    let mut policy_rng = RngState::from_seed(session.seed());
    let mut events = EventBus::default();
    println!("seed: {} policy: {}", session.seed(), policy.name());
    while !session.is_over() && session.state().round <= options.max_rounds {
        if let Err(err) = session.draw_hand(&mut events) {
            eprintln!("session error: {err}");
            break;
        }
        drain_events(locale, &mut events);
        let hand = session.hand().to_vec();
        let previews: Vec<_> = hand.iter().map(|card| session.preview(card)).collect();
        let pick = policy.choose(
            &PolicyView {
                state: session.state(),
                hand: &hand,
                previews: &previews,
            },
            &mut policy_rng,
        );
        if let Some(card) = hand.get(pick) {
            println!("{} {}", locale.text("plays", "打出"), paint(card.color(), &card.name));
        }
        match session.choose_index(pick, &mut events) {
            Ok(outcome) => {
                drain_events(locale, &mut events);
                println!(
                    "{} {} | {} {} | HP {}",
                    locale.text("round", "回合"),
                    outcome.report.round,
                    locale.text("score", "分数"),
                    outcome.state.score,
                    outcome.state.hp
                );
            }
            Err(err) => {
                eprintln!("session error: {err}");
                break;
            }
        }
    }
    print_final(locale, &session);
}

fn open_store() -> Box<dyn ScoreStore> {
    match default_best_path() {
        Some(path) => Box::new(FileScoreStore::new(path)),
        None => {
            eprintln!("best score warning: no home directory, best score will not be kept");
            Box::new(MemoryStore::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Pick(usize),
    PickName(String),
    Reset,
    State,
    Help,
    Quit,
    Empty,
}

fn parse_command(line: &str) -> Command {
    let input = line.trim();
    if input.is_empty() {
        return Command::Empty;
    }
    match input.to_ascii_lowercase().as_str() {
        "r" | "reset" | "restart" => return Command::Reset,
        "s" | "state" => return Command::State,
        "h" | "help" | "?" => return Command::Help,
        "q" | "quit" | "exit" => return Command::Quit,
        _ => {}
    }
    match input.parse::<usize>() {
        Ok(number) if number > 0 => Command::Pick(number - 1),
        Ok(_) => Command::PickName(input.to_string()),
        Err(_) => Command::PickName(input.to_string()),
    }
}

/// Resolves a typed name against the hand, ignoring case.
fn match_hand_name(hand: &[CardDef], typed: &str) -> Option<String> {
    hand.iter()
        .find(|card| card.name.eq_ignore_ascii_case(typed.trim()))
        .map(|card| card.name.clone())
}

fn run_interactive(options: &CliOptions, assets: Assets) -> io::Result<()> {
    let locale = options.locale;
    let mut session = Session::new(
        assets.config,
        assets.catalog,
        new_rng(options.seed),
        open_store(),
    );
    let mut events = EventBus::default();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print_help(locale);
    loop {
        if session.is_over() {
            print_final(locale, &session);
            prompt(locale.text(
                "r to play again, q to quit > ",
                "输入 r 重新开始，q 退出 > ",
            ))?;
        } else {
            if session.hand().is_empty() {
                if let Err(err) = session.draw_hand(&mut events) {
                    print_session_error(locale, &err);
                    continue;
                }
                drain_events(locale, &mut events);
            }
            print_hud(locale, &session);
            print_hand(locale, &session);
            prompt(locale.text("pick a card > ", "选择卡牌 > "))?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => print_help(locale),
            Command::State => print_state(locale, session.state(), session.config()),
            Command::Reset => {
                session.reset(&mut events);
                drain_events(locale, &mut events);
            }
            Command::Pick(index) => {
                let result = session.choose_index(index, &mut events);
                report_choice(locale, result, &mut events);
            }
            Command::PickName(typed) => {
                let name = match_hand_name(session.hand(), &typed).unwrap_or(typed);
                let result = session.choose_card(&name, &mut events);
                report_choice(locale, result, &mut events);
            }
        }
    }
    println!("{}", locale.text("bye", "再见"));
    Ok(())
}

fn prompt(text: &str) -> io::Result<()> {
    print!("{text}");
    io::stdout().flush()
}

fn report_choice(
    locale: UiLocale,
    result: Result<ChoiceOutcome, SessionError>,
    events: &mut EventBus,
) {
    match result {
        Ok(_) => drain_events(locale, events),
        Err(err) => print_session_error(locale, &err),
    }
}

fn print_session_error(locale: UiLocale, err: &SessionError) {
    let hint = match err {
        SessionError::InvalidSelection { .. } => {
            locale.text("type a card number or its name", "请输入卡牌序号或名称")
        }
        SessionError::NoHandDrawn => locale.text("no cards on the table yet", "还没有发牌"),
        SessionError::GameOver { .. } => locale.text("press r to start over", "输入 r 重新开始"),
    };
    println!("{}: {err} ({hint})", locale.text("error", "错误"));
}

fn print_help(locale: UiLocale) {
    println!("{}", locale.text("Commands:", "命令："));
    println!(
        "  1..n | name              {}",
        locale.text("play the card with that number or name", "打出对应序号或名称的卡牌")
    );
    println!(
        "  state|s                  {}",
        locale.text("detailed player state", "详细状态")
    );
    println!(
        "  reset|r                  {}",
        locale.text("start a new run (best score is kept)", "重新开始（保留最高分）")
    );
    println!("  help|h|?                 {}", locale.text("show help", "显示帮助"));
    println!("  quit|q                   {}", locale.text("exit", "退出"));
}

fn print_hud<S: ScoreStore>(locale: UiLocale, session: &Session<S>) {
    let hud = session.hud();
    let mut line = format!(
        "{} {} | {} {}{} | {} {} | HP {}/{}",
        locale.text("Round", "回合"),
        hud.round,
        locale.text("Score", "分数"),
        hud.score,
        if hud.new_record {
            locale.text(" (new record!)", "（新纪录！）")
        } else {
            ""
        },
        locale.text("Best", "最高"),
        hud.best_score,
        hud.hp,
        hud.max_hp
    );
    if hud.damage_reduction_percent > 0 {
        line.push_str(&format!(
            " | {} {}%",
            locale.text("guard", "减伤"),
            hud.damage_reduction_percent
        ));
    }
    if hud.passive_immunity_rounds > 0 {
        line.push_str(&format!(
            " | {} {}",
            locale.text("immune", "免疫"),
            hud.passive_immunity_rounds
        ));
    }
    if let Some(boost) = hud.boost {
        line.push_str(&format!(
            " | {} {} x{:.1}",
            locale.text("boost", "加成"),
            paint(boost.tag.color(), boost.tag.id()),
            boost.multiplier
        ));
    }
    if hud.heal_cooldown_left > 0 {
        line.push_str(&format!(
            " | {} {}",
            locale.text("heal cooldown", "治疗冷却"),
            hud.heal_cooldown_left
        ));
    }
    println!("{line}");
}

/// Printed odds for a gamble; shows the adjusted chance when stacks or the
/// round moved it off the printed one.
fn chance_label(printed: Option<u32>, effective: Option<f64>) -> Option<String> {
    let printed = printed?;
    match effective.map(|chance| (chance * 100.0).round() as u32) {
        Some(effective) if effective != printed => Some(format!("{printed}% -> {effective}%")),
        _ => Some(format!("{printed}%")),
    }
}

fn print_hand<S: ScoreStore>(locale: UiLocale, session: &Session<S>) {
    println!(
        "{} x{:.2}",
        locale.text("== Hand ==", "== 手牌 =="),
        session.multiplier()
    );
    for (idx, card) in session.hand().iter().enumerate() {
        let preview = session.preview(card);
        let tag = card.synergy.map(|tag| tag.id()).unwrap_or("-");
        let mut detail = format!(
            "{:+} {} / {:+} HP",
            preview.score,
            locale.text("pts", "分"),
            preview.hp
        );
        if let Some(label) = chance_label(preview.chance_percent, preview.effective_chance) {
            detail.push_str(&format!(" ({label})"));
        }
        if preview.on_cooldown {
            detail.push_str(locale.text(" (cooldown)", "（冷却中）"));
        }
        println!(
            "{:>3}. {} {:<6} {}",
            idx + 1,
            paint(card.color(), &format!("{:<24}", card.name)),
            tag,
            detail
        );
        if !card.description.is_empty() {
            println!("     {}", card.description);
        }
    }
}

fn print_state(locale: UiLocale, state: &PlayerState, config: &BalanceConfig) {
    println!("{}", locale.text("== State ==", "== 状态 =="));
    println!(
        "{} {} | {} {} | HP {}/{}",
        locale.text("Round", "回合"),
        state.round,
        locale.text("Score", "分数"),
        state.score,
        state.hp,
        config.max_hp()
    );
    println!(
        "FIRE {} | MIND {} | BLOOD {} | LUCK {}",
        state.synergy.fire, state.synergy.mind, state.synergy.blood, state.synergy.luck
    );
    println!(
        "{} {} | {} {:.0}% | {} {}",
        locale.text("last heal", "上次治疗"),
        state.last_heal_round,
        locale.text("guard", "减伤"),
        state.temp_damage_reduction * 100.0,
        locale.text("immune", "免疫"),
        state.passive_immunity_rounds
    );
}

fn print_final<S: ScoreStore>(locale: UiLocale, session: &Session<S>) {
    let state = session.state();
    println!(
        "{} {} | {} {} | {} {}",
        if session.is_over() {
            locale.text("Game over at round", "游戏结束，回合")
        } else {
            locale.text("Stopped at round", "停止于回合")
        },
        state.round,
        locale.text("final score", "最终分数"),
        state.score,
        locale.text("best", "最高分"),
        session.best_score()
    );
}

fn drain_events(locale: UiLocale, events: &mut EventBus) {
    for event in events.drain() {
        if let Some(text) = format_event(locale, &event) {
            println!("  {text}");
        }
    }
}

/// One line per event worth narrating; bookkeeping events print nothing.
fn format_event(locale: UiLocale, event: &Event) -> Option<String> {
    let text = match event {
        Event::HandDrawn { boosted: Some(tag), .. } => format!(
            "{} {}",
            paint(tag.color(), tag.id()),
            locale.text("cards are favoured this draw", "卡牌出现几率提升")
        ),
        Event::HandDrawn { .. } | Event::CardChosen { .. } | Event::SessionReset => return None,
        Event::GambleWon { chance, score } => format!(
            "{} {:.0}%: +{score}",
            locale.text("gamble won at", "赌博成功，几率"),
            chance * 100.0
        ),
        Event::GambleLost {
            chance,
            hp_loss,
            score_penalty,
        } => format!(
            "{} {:.0}%: {hp_loss} HP, -{score_penalty}",
            locale.text("gamble lost at", "赌博失败，几率"),
            chance * 100.0
        ),
        Event::HealApplied { amount } => {
            format!("{} +{amount}", locale.text("healed", "治疗"))
        }
        Event::HealOnCooldown { rounds_left } => format!(
            "{} ({rounds_left})",
            locale.text("heal on cooldown", "治疗冷却中")
        ),
        Event::BloodPenalty { amount } => {
            format!("{} -{amount} HP", locale.text("blood price", "鲜血代价"))
        }
        Event::BloodDrain { amount } => {
            format!("{} -{amount} HP", locale.text("blood drain", "鲜血汲取"))
        }
        Event::DamageReduced { before, after } => format!(
            "{} {before} -> {after}",
            locale.text("damage reduced", "伤害减免")
        ),
        Event::HpChanged { delta, hp } => format!("HP {delta:+} -> {hp}"),
        Event::EffectArmed(effect) => {
            format!("{}: {effect:?}", locale.text("effect", "效果"))
        }
        Event::PassiveDrain { amount, hp } => format!(
            "{} -{amount} HP -> {hp}",
            locale.text("fatigue", "疲劳")
        ),
        Event::NewBestScore { score } => {
            format!("{} {score}", locale.text("new best", "新最高分"))
        }
        Event::RoundAlert { round } => format!(
            "{} {round}!",
            locale.text("you reached round", "你已到达回合")
        ),
        Event::GameOver { score, round } => format!(
            "{} {round}, {} {score}",
            locale.text("defeated at round", "倒在回合"),
            locale.text("score", "分数")
        ),
    };
    Some(text)
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn paint(hex: &str, text: &str) -> String {
    if std::env::var_os("NO_COLOR").is_some() {
        return text.to_string();
    }
    match hex_rgb(hex) {
        Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        None => text.to_string(),
    }
}
