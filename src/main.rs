//! # Delve Main Entry Point
//!
//! Runs a seeded game headlessly on the built-in layouts, driven either by
//! a key script or by the autoexplore player, and prints the narration and
//! the final score.

use clap::Parser;
use delve::{
    AsciiLayouts, Autoexplore, DelveResult, GameEvent, GameSession, InputHandler, PlayerCommand,
    PlayerInput, ScoreSnapshot,
};
use log::{info, warn};

/// Command line arguments for the Delve simulation driver.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Headless driver for the Delve roguelike simulation core")]
#[command(version)]
struct Args {
    /// Random seed for level population and enemy decisions
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Stop after this many player turns
    #[arg(long, default_value_t = 500)]
    max_turns: u64,

    /// Depth to start on
    #[arg(long, default_value_t = 1)]
    depth: u32,

    /// Name of the player character
    #[arg(long, default_value = "Adventurer")]
    name: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Keys to play instead of the autoexplore player (WASD, '.', 1-9)
    #[arg(long)]
    script: Option<String>,

    /// Print the final score as JSON
    #[arg(long)]
    json: bool,

    /// Hide per-turn narration
    #[arg(short, long)]
    quiet: bool,

    /// Print the explored map when the run ends
    #[arg(long)]
    show_map: bool,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting Delve v{} with seed {}", delve::VERSION, args.seed);

    let mut session = GameSession::starting_at(
        AsciiLayouts::builtin(),
        args.name.clone(),
        args.seed,
        args.depth,
    )?;
    print_events(&mut session, args.quiet);

    let input_handler = InputHandler::new();
    let mut script = args
        .script
        .as_deref()
        .map(|keys| input_handler.parse_inputs(keys).into_iter());
    let mut autoexplore = Autoexplore::new();
    let mut rejected_in_a_row = 0;

    while !session.is_over() && session.world().player_state.turns < args.max_turns {
        let command = match script.as_mut() {
            Some(inputs) => match inputs.next() {
                Some(PlayerInput::Help) => {
                    println!("{}", input_handler.help_text());
                    continue;
                }
                Some(input) => match input_handler.input_to_command(input) {
                    Some(command) => command,
                    None => break,
                },
                None => break,
            },
            None => match autoexplore.next_command(session.world()) {
                Some(command) => command,
                None => break,
            },
        };

        let outcome = session.submit(command)?;
        print_events(&mut session, args.quiet);

        if outcome.is_performed() {
            rejected_in_a_row = 0;
        } else {
            rejected_in_a_row += 1;
            if rejected_in_a_row > 3 && script.is_none() {
                warn!("autoexplore stuck on {:?}; waiting", command);
                autoexplore.clear();
                session.submit(PlayerCommand::Wait)?;
                print_events(&mut session, args.quiet);
                rejected_in_a_row = 0;
            }
        }
    }

    if args.show_map {
        println!("{}", session.world().render_ascii());
    }

    let score = session
        .final_score()
        .unwrap_or_else(|| session.world().score_snapshot());
    report(&score, session.depth(), session.is_over(), args.json)
}

/// Initializes logging. With `dev-tools` the tracing subscriber also
/// collects the library's `log` records.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .init();
    }
}

fn print_events(session: &mut GameSession<AsciiLayouts>, quiet: bool) {
    let depth = session.depth();
    for event in session.drain_events() {
        match event {
            GameEvent::Message { text, .. } if !quiet => println!("[{}] {}", depth, text),
            GameEvent::LevelCompleted { depth } => println!("== Depth {} cleared ==", depth),
            GameEvent::PlayerDied => println!("== You died on depth {} ==", depth),
            _ => {}
        }
    }
}

fn report(score: &ScoreSnapshot, depth: u32, died: bool, json: bool) -> DelveResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(score)?);
        return Ok(());
    }
    println!();
    println!("{}", if died { "Final score" } else { "Run stopped" });
    println!("  depth reached:    {}", depth);
    println!("  turns:            {}", score.turns);
    println!("  steps:            {}", score.steps);
    println!("  coins collected:  {}", score.coins_collected);
    println!("  enemies defeated: {}", score.enemies_defeated);
    Ok(())
}
