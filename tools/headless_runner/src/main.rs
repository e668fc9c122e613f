use clap::Parser;
use sim_cleanwater::{
    CellIndex, CleanwaterGame, CwCommand, CwConfig, CwEvent, CwObservation, Difficulty, ObsPhase,
    TowerKind,
};
use sim_core::Game;
use sim_host::SessionHost;
use sim_server::{spawn_session_loop, EventCursor, SessionHandle, SessionStatus};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

/// Headless run of the cleanwater defense sim.
///
/// Fast mode steps the simulation as quickly as possible; --realtime drives
/// it through the async session runtime at the configured tick rate.
#[derive(Parser, Debug)]
#[command(name = "headless-runner")]
#[command(about = "Run a scripted cleanwater defense session without a frontend")]
struct Args {
    /// Difficulty preset: easy, normal or hard
    #[arg(long, default_value = "normal")]
    difficulty: String,

    /// Simulation seed
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Stop after this many simulated seconds if the run has not ended
    #[arg(long, default_value = "600")]
    max_secs: u64,

    /// Drive the session through the real-time tick loop
    #[arg(long)]
    realtime: bool,

    /// Dump the final observation as JSON
    #[arg(long)]
    json: bool,
}

fn parse_difficulty(name: &str) -> Result<Difficulty, String> {
    match name {
        "easy" => Ok(Difficulty::Easy),
        "normal" => Ok(Difficulty::Normal),
        "hard" => Ok(Difficulty::Hard),
        other => Err(format!("unknown difficulty: {other}")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let difficulty = parse_difficulty(&args.difficulty)?;

    let config = CwConfig::default();
    let max_ticks = args.max_secs * config.tick_hz as u64;

    tracing::info!(
        "starting cleanwater run: difficulty={}, seed={}, realtime={}",
        args.difficulty,
        args.seed,
        args.realtime
    );

    if args.realtime {
        run_realtime(config, difficulty, args.seed, max_ticks, args.json).await
    } else {
        run_fast(config, difficulty, args.seed, max_ticks, args.json)
    }
}

/// Scripted player: flanks the path with purifiers, scrubs drops that are
/// about to leak, and sinks spare coins into upgrades.
struct Planner {
    build_sites: Vec<CellIndex>,
    next_site: usize,
}

impl Planner {
    fn new(obs: &CwObservation) -> Self {
        let path_row = obs.path[0] / obs.cols;

        let mut near_rows = Vec::new();
        if path_row > 0 {
            near_rows.push(path_row - 1);
        }
        if path_row + 1 < obs.rows {
            near_rows.push(path_row + 1);
        }

        let mut build_sites = Vec::new();
        for row in near_rows {
            for col in 0..obs.cols {
                build_sites.push(row * obs.cols + col);
            }
        }

        Self {
            build_sites,
            next_site: 0,
        }
    }

    fn decide(&mut self, obs: &CwObservation, commands: &mut Vec<CwCommand>) {
        if obs.phase != ObsPhase::Running {
            return;
        }

        // Emergency scrub: dismiss dirty drops about to reach the village
        let path_len = obs.path.len();
        for drop in &obs.drops {
            if !drop.cleaned && drop.path_index + 2 >= path_len {
                commands.push(CwCommand::DismissDrop { id: drop.id });
            }
        }

        // Build out the flanking purifier line while coins allow
        let mut coins = obs.coins;
        while self.next_site < self.build_sites.len() && coins >= obs.basic_cost {
            commands.push(CwCommand::PlaceOrUpgrade {
                cell: self.build_sites[self.next_site],
            });
            self.next_site += 1;
            coins -= obs.basic_cost;
        }

        // Once the line is complete, upgrade the lowest-level purifier
        if self.next_site == self.build_sites.len() {
            if let Some(tower) = obs.towers.iter().min_by_key(|t| (t.level, t.cell)) {
                if coins >= tower.upgrade_cost {
                    commands.push(CwCommand::PlaceOrUpgrade { cell: tower.cell });
                }
            }
        }

        // Waves re-queue themselves; this only fires at the checkpoint pause
        // (or when auto-advance is off)
        if obs.can_start_wave {
            commands.push(CwCommand::StartNextWave);
        }
    }
}

fn run_fast(
    config: CwConfig,
    difficulty: Difficulty,
    seed: u64,
    max_ticks: u64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_hz = config.tick_hz;
    let mut host: SessionHost<CleanwaterGame> = SessionHost::new(config, seed, tick_hz);

    host.submit_now(CwCommand::SelectDifficulty(difficulty));
    host.submit_now(CwCommand::StartGame);
    host.submit_now(CwCommand::SelectTower(TowerKind::Basic));

    let mut planner: Option<Planner> = None;
    let mut all_events = Vec::new();

    while host.current_tick() < max_ticks {
        // One planning pass per simulated second
        if host.current_tick() % tick_hz as u64 == 0 {
            let obs = host.game().observe(host.current_tick());
            let planner = planner.get_or_insert_with(|| Planner::new(&obs));
            let mut commands = Vec::new();
            planner.decide(&obs, &mut commands);
            for command in commands {
                host.submit_now(command);
            }
        }

        let Some(events) = host.step_one_tick() else {
            break; // Session is terminal
        };
        for event in &events {
            print_event(host.current_tick(), event);
        }
        all_events.extend(events);
    }

    println!("\n=== Cleanwater Run Complete ===");
    match host.is_terminal() {
        Some(outcome) => println!("Outcome: {:?}", outcome),
        None => println!("Outcome: still running at tick cap"),
    }
    println!("Final tick: {}", host.current_tick());

    let obs = host.game().observe(host.current_tick());
    print_final(&obs);
    print_event_summary(&all_events);

    if json {
        println!("{}", serde_json::to_string_pretty(&obs)?);
    }

    Ok(())
}

async fn run_realtime(
    config: CwConfig,
    difficulty: Difficulty,
    seed: u64,
    max_ticks: u64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_hz = config.tick_hz;
    let host: SessionHost<CleanwaterGame> = SessionHost::new(config, seed, tick_hz);
    let handle = SessionHandle::new(host, 4096);

    handle.submit(CwCommand::SelectDifficulty(difficulty), 1).await?;
    handle.submit(CwCommand::StartGame, 1).await?;
    handle.submit(CwCommand::SelectTower(TowerKind::Basic), 1).await?;

    tracing::info!("running in real time at {} Hz", tick_hz);
    let loop_task = spawn_session_loop(handle.clone());

    let mut planner: Option<Planner> = None;
    let mut all_events = Vec::new();
    let mut cursor = EventCursor(0);
    let mut last_status = Instant::now();

    loop {
        sleep(Duration::from_millis(250)).await;

        let (entries, next_cursor) = handle.poll_events(cursor).await;
        cursor = next_cursor;
        for entry in &entries {
            print_event(entry.tick, &entry.event);
        }
        all_events.extend(entries.into_iter().map(|entry| entry.event));

        let status = handle.status().await;
        let obs = handle.observe().await;

        if last_status.elapsed() >= Duration::from_secs(1) {
            print_status(&obs);
            last_status = Instant::now();
        }

        if status != SessionStatus::Running {
            break;
        }
        if obs.tick >= max_ticks {
            handle.stop().await;
            break;
        }

        let planner = planner.get_or_insert_with(|| Planner::new(&obs));
        let mut commands = Vec::new();
        planner.decide(&obs, &mut commands);
        for command in commands {
            // The loop may finish between the status check and here
            if handle.submit(command, obs.tick + 1).await.is_err() {
                break;
            }
        }
    }

    loop_task.await?;

    // Drain whatever arrived after the last poll
    let (entries, _) = handle.poll_events(cursor).await;
    for entry in &entries {
        print_event(entry.tick, &entry.event);
    }
    all_events.extend(entries.into_iter().map(|entry| entry.event));

    println!("\n=== Cleanwater Run Complete ===");
    match handle.status().await {
        SessionStatus::Finished(outcome) => println!("Outcome: {:?}", outcome),
        SessionStatus::Stopped => println!("Outcome: stopped at tick cap"),
        SessionStatus::Running => {}
    }
    println!("Final tick: {}", handle.current_tick().await);

    let obs = handle.observe().await;
    print_final(&obs);
    print_event_summary(&all_events);

    if json {
        println!("{}", serde_json::to_string_pretty(&obs)?);
    }

    Ok(())
}

fn print_event(tick: u64, event: &CwEvent) {
    match event {
        CwEvent::SessionStarted { difficulty } => {
            println!("[{:>6}] Session started ({:?})", tick, difficulty)
        }
        CwEvent::WaveStarted { wave, count } => {
            println!("[{:>6}] === Wave {} started ({} drops) ===", tick, wave, count)
        }
        CwEvent::DropSpawned { id, hp } => {
            println!("[{:>6}] Drop {} spawned (hp {})", tick, id.0, hp)
        }
        CwEvent::DropCleaned { id, dismissed } => {
            if *dismissed {
                println!("[{:>6}] Drop {} scrubbed by hand", tick, id.0)
            } else {
                println!("[{:>6}] Drop {} cleaned", tick, id.0)
            }
        }
        CwEvent::DropLeaked { id } => {
            println!("[{:>6}] Drop {} reached the village!", tick, id.0)
        }
        CwEvent::TowerPlaced { cell, kind } => {
            println!("[{:>6}] Purifier placed at cell {} ({:?})", tick, cell, kind)
        }
        CwEvent::TowerUpgraded { cell, level, power } => {
            println!(
                "[{:>6}] Purifier at cell {} upgraded to level {} (power {})",
                tick, cell, level, power
            )
        }
        CwEvent::PlacementRejected { cell, reason } => {
            println!("[{:>6}] Placement at cell {} rejected: {:?}", tick, cell, reason)
        }
        CwEvent::UpgradeRejected { cell, reason } => {
            println!("[{:>6}] Upgrade at cell {} rejected: {:?}", tick, cell, reason)
        }
        CwEvent::WaveCompleted { wave } => {
            println!("[{:>6}] === Wave {} completed ===", tick, wave)
        }
        CwEvent::WaveTimePenalty { wave, health } => {
            println!(
                "[{:>6}] Wave {} overran its timer (health now {})",
                tick, wave, health
            )
        }
        CwEvent::CheckpointReached { wave } => {
            println!("[{:>6}] Checkpoint reached at wave {}", tick, wave)
        }
        CwEvent::MilestoneReached { title, message, .. } => {
            println!("[{:>6}] Milestone: {} - {}", tick, title, message)
        }
        CwEvent::GameEnded { outcome, wave, score } => {
            println!(
                "[{:>6}] Game ended: {:?} at wave {} with score {}",
                tick, outcome, wave, score
            )
        }
    }
}

fn print_status(obs: &CwObservation) {
    let time_secs = obs.tick as f64 / obs.ticks_per_second as f64;
    println!(
        "  [{:>5.1}s] Wave {}/{}, Drops: {}, Towers: {}, Coins: {}, Score: {}, Health: {}, Polluted: {}/{}",
        time_secs,
        obs.wave,
        obs.wave_target,
        obs.drops.len(),
        obs.towers.len(),
        obs.coins,
        obs.score,
        obs.health,
        obs.polluted,
        obs.polluted_limit
    );
}

fn print_final(obs: &CwObservation) {
    println!("Wave: {}/{}", obs.wave, obs.wave_target);
    println!("Score: {}", obs.score);
    println!("Coins: {}", obs.coins);
    println!("Health: {}", obs.health);
    println!("Polluted: {}/{}", obs.polluted, obs.polluted_limit);
    println!("Towers: {}", obs.towers.len());
}

fn print_event_summary(events: &[CwEvent]) {
    let mut spawned = 0;
    let mut cleaned = 0;
    let mut scrubbed = 0;
    let mut leaked = 0;
    let mut towers_placed = 0;
    let mut towers_upgraded = 0;
    let mut placements_rejected = 0;
    let mut waves_started = 0;
    let mut waves_completed = 0;
    let mut penalties = 0;
    let mut milestones = 0;

    for event in events {
        match event {
            CwEvent::DropSpawned { .. } => spawned += 1,
            CwEvent::DropCleaned { dismissed: true, .. } => scrubbed += 1,
            CwEvent::DropCleaned { dismissed: false, .. } => cleaned += 1,
            CwEvent::DropLeaked { .. } => leaked += 1,
            CwEvent::TowerPlaced { .. } => towers_placed += 1,
            CwEvent::TowerUpgraded { .. } => towers_upgraded += 1,
            CwEvent::PlacementRejected { .. } => placements_rejected += 1,
            CwEvent::WaveStarted { .. } => waves_started += 1,
            CwEvent::WaveCompleted { .. } => waves_completed += 1,
            CwEvent::WaveTimePenalty { .. } => penalties += 1,
            CwEvent::MilestoneReached { .. } => milestones += 1,
            _ => {}
        }
    }

    println!("\n=== Event Summary ===");
    println!("Drops spawned: {}", spawned);
    println!("Drops cleaned by purifiers: {}", cleaned);
    println!("Drops scrubbed by hand: {}", scrubbed);
    println!("Drops leaked: {}", leaked);
    println!("Purifiers placed: {}", towers_placed);
    println!("Purifier upgrades: {}", towers_upgraded);
    println!("Placements rejected: {}", placements_rejected);
    println!("Waves started: {}", waves_started);
    println!("Waves completed: {}", waves_completed);
    println!("Timer penalties: {}", penalties);
    println!("Milestones: {}", milestones);
}
