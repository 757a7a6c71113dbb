//! # Delve Main Entry Point
//!
//! Parses the command line, builds a game session and runs a line-oriented
//! console loop over standard input.

use clap::{ArgAction, Parser};
use delve::{
    ActionOutcome, DelveResult, GameState, GameView, GenerationConfig, InputHandler,
    LocationKind, PlayerAction, PlayerInput, PlayerStatus, Smell, Sound, HELP_TEXT,
};
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Command line arguments for Delve.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Hunt the Otyugh through a maze of caves and tunnels")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file; flags given here override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Number of grid columns
    #[arg(long)]
    columns: Option<usize>,

    /// Whether edges wrap around the grid border (true or false)
    #[arg(long, action = ArgAction::Set)]
    wrapping: Option<bool>,

    /// Extra edges beyond the spanning tree
    #[arg(short, long)]
    interconnectivity: Option<usize>,

    /// Percentage of caves with treasure and of locations with arrows
    #[arg(short, long)]
    treasure_percent: Option<u32>,

    /// Number of Otyughs, the boss included
    #[arg(short, long)]
    monsters: Option<usize>,

    /// Number of thieves
    #[arg(long)]
    thieves: Option<usize>,

    /// Number of pits
    #[arg(long)]
    pits: Option<usize>,

    /// Print the location view as JSON instead of prose
    #[arg(long)]
    json: bool,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// Layers the flags over the configuration file, or over the defaults.
    fn to_config(&self) -> DelveResult<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::from_json_file(path)?,
            None => GenerationConfig::new(rand::random()),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(wrapping) = self.wrapping {
            config.wrapping = wrapping;
        }
        if let Some(interconnectivity) = self.interconnectivity {
            config.interconnectivity = interconnectivity;
        }
        if let Some(percent) = self.treasure_percent {
            config.treasure_percent = percent;
        }
        if let Some(monsters) = self.monsters {
            config.monsters = monsters;
        }
        if let Some(thieves) = self.thieves {
            config.thieves = thieves;
        }
        if let Some(pits) = self.pits {
            config.pits = pits;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    info!("Starting Delve v{}", delve::VERSION);

    if let Err(e) = run(&args) {
        error!("Delve stopped: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> DelveResult<()> {
    let config = args.to_config()?;
    let mut game = GameState::new(config)?;
    let input_handler = InputHandler::new();

    println!(
        "Welcome to Delve (seed {}). Slay the Otyugh guarding the goal and walk in. Type ? for help.",
        game.config().seed
    );
    show(&game, args.json)?;

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = match input_handler.parse_line(&line) {
            Ok(input) => input,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match input {
            PlayerInput::Quit => break,
            PlayerInput::Help => println!("{}", HELP_TEXT),
            PlayerInput::Look => show(&game, args.json)?,
            PlayerInput::Restart => {
                game.restart()?;
                println!("The dungeon resets around you.");
                show(&game, args.json)?;
            }
            PlayerInput::Action(action) => play(&mut game, action, args.json)?,
        }
    }

    let stats = game.statistics();
    println!(
        "Steps: {}, arrows fired: {}, treasure collected: {}, robbed {} times.",
        stats.steps_taken, stats.arrows_fired, stats.treasure_collected, stats.times_robbed
    );
    Ok(())
}

/// Runs one action, reports the outcome and lets any thief act after a move.
fn play(game: &mut GameState, action: PlayerAction, json: bool) -> DelveResult<()> {
    let outcome = match action.execute(game) {
        Ok(outcome) => outcome,
        Err(e) if e.is_recoverable() => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    match outcome {
        ActionOutcome::ArrowsPicked(count) => println!("You pick up {} arrows.", count),
        ActionOutcome::Completed => match action {
            PlayerAction::Shoot { .. } => println!("You loose an arrow into the dark."),
            PlayerAction::PickTreasure(kind) => println!("You pick up a {}.", kind),
            _ => {}
        },
        ActionOutcome::Moved(_) | ActionOutcome::TheftChecked { .. } => {}
    }

    if action.is_move() && !game.is_game_over() {
        let check = PlayerAction::CheckTheft {
            now_millis: now_millis(),
        };
        if let ActionOutcome::TheftChecked { robbed: true } = check.execute(game)? {
            println!("A cackling thief snatches some of your treasure!");
        }
    }

    show(game, json)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

fn show(game: &GameState, json: bool) -> DelveResult<()> {
    let view = game.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", describe(&view));
    }
    Ok(())
}

fn describe(view: &GameView) -> String {
    let mut lines = Vec::new();

    match view.status {
        PlayerStatus::Killed => {
            lines.push("An Otyugh devours you. Type restart or quit.".to_string());
            return lines.join("\n");
        }
        PlayerStatus::FallenInPit => {
            lines.push("You fall into a bottomless pit. Type restart or quit.".to_string());
            return lines.join("\n");
        }
        PlayerStatus::ReachedEnd => {
            lines.push("You step over the slain Otyugh and out of the dungeon. You win!".to_string());
        }
        PlayerStatus::Playing => {}
    }

    let kind = match view.kind {
        LocationKind::Cave => "cave",
        LocationKind::Tunnel => "tunnel",
    };
    lines.push(format!("You are in a {} at {}.", kind, view.position));

    if let Some(monster) = view.monster {
        let who = if monster.boss { "The great Otyugh" } else { "An Otyugh" };
        match monster.health {
            0 => lines.push(format!("{} lies dead here.", who)),
            1 => lines.push(format!("{} lies wounded here, too weak to strike.", who)),
            _ => lines.push(format!("{} glares at you, but lets you pass.", who)),
        }
    }
    if view.has_thief {
        lines.push("A thief lurks in the shadows.".to_string());
    }
    match view.smell {
        Smell::Strong => lines.push("A terrible stench fills the air.".to_string()),
        Smell::Faint => lines.push("A faint stench drifts by.".to_string()),
        Smell::Nothing => {}
    }
    if view.sound == Sound::Cackling {
        lines.push("You hear cackling nearby.".to_string());
    }

    for (kind, count) in &view.location_treasure {
        lines.push(format!("On the ground: {} x {}.", kind, count));
    }
    if view.location_arrows > 0 {
        lines.push(format!("On the ground: {} arrows.", view.location_arrows));
    }

    let exits: Vec<String> = view.possible_moves.iter().map(|d| d.to_string()).collect();
    lines.push(format!("Exits: {}.", exits.join(", ")));

    let carried: Vec<String> = view
        .player_treasure
        .iter()
        .map(|(kind, count)| format!("{} x {}", kind, count))
        .collect();
    lines.push(format!(
        "You carry {} arrows{}{}.",
        view.player_arrows,
        if carried.is_empty() { "" } else { " and " },
        carried.join(", ")
    ));
    lines.push(format!("Locations explored: {}.", view.visited_count));

    lines.join("\n")
}
