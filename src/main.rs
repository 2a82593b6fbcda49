//! Mech Tactics - headless duel runner
//!
//! Deploys a demo lance per side on a generated map and plays a scripted
//! exchange: each unit closes on the nearest enemy, turns to face it and
//! fires when a target is offered. Prints the combat log or a JSON summary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use mech_tactics::battle::execution::{GameOutcome, GameSession};
use mech_tactics::battle::hex::HexCoord;
use mech_tactics::battle::units::UnitClass;
use mech_tactics::core::config::RulesConfig;
use mech_tactics::core::error::Result;
use mech_tactics::core::types::{Side, UnitId};

#[derive(Parser, Debug)]
#[command(name = "mech-tactics")]
#[command(about = "Deterministic hex-grid mech combat simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted lance-vs-lance duel
    Duel {
        /// Random seed for the map and hit rolls (overrides the rules file)
        #[arg(long)]
        seed: Option<u64>,

        /// Rules file (TOML)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// JSON output structure
#[derive(Serialize)]
struct DuelSummary {
    seed: u64,
    turns: u32,
    outcome: GameOutcome,
    survivors: Vec<SurvivorSummary>,
    log: Vec<String>,
}

#[derive(Serialize)]
struct SurvivorSummary {
    name: String,
    side: Side,
    row: i32,
    col: i32,
    health_percent: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mech_tactics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Duel {
            seed,
            rules,
            format,
        } => run_duel(seed, rules, format),
    }
}

fn run_duel(seed: Option<u64>, rules: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let mut config = match rules {
        Some(path) => RulesConfig::load(&path)?,
        None => RulesConfig::default(),
    };
    let seed = seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let mut game = GameSession::generate(config)?;
    deploy_lances(&mut game)?;

    let opening = preview_opening_range(&mut game);
    tracing::info!(hexes = opening.len(), "Movement range of the first Axis unit");
    play_out(&mut game)?;

    match format {
        OutputFormat::Text => {
            for message in game.log().messages() {
                println!("{}", message.render());
            }
        }
        OutputFormat::Json => {
            let summary = DuelSummary {
                seed,
                turns: game.turn(),
                outcome: game.outcome(),
                survivors: game
                    .units()
                    .iter()
                    .map(|(_, unit)| SurvivorSummary {
                        name: unit.name.clone(),
                        side: unit.side,
                        row: unit.position.row,
                        col: unit.position.col,
                        health_percent: unit.overall_health_percent(),
                    })
                    .collect(),
                log: game.log().messages().iter().map(|m| m.render()).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Highlight where the first Axis unit can go
fn preview_opening_range(game: &mut GameSession) -> Vec<HexCoord> {
    let first = game.units().living(Side::Axis).next().map(|(id, _)| id);
    match first {
        Some(first) => game.reachable_set(first),
        None => Vec::new(),
    }
}

/// Alternate sides until the game is decided
fn play_out(game: &mut GameSession) -> Result<()> {
    while !game.is_game_over() {
        let seen = game.log().len();
        let side = game.current_side();
        let ids: Vec<UnitId> = game.units().living(side).map(|(id, _)| id).collect();
        for id in ids {
            play_unit(game, id)?;
            if game.is_game_over() {
                break;
            }
        }
        for message in game.log().since(seen) {
            tracing::debug!(turn = message.turn, "{}", message.render());
        }
        if !game.is_game_over() {
            game.end_turn();
        }
    }
    Ok(())
}

/// Three mechs per side in opposite corners
fn deploy_lances(game: &mut GameSession) -> Result<()> {
    let rows = game.map().rows as i32;
    let cols = game.map().cols as i32;
    let axis = [
        (UnitClass::Light, HexCoord::new(2, 2)),
        (UnitClass::Medium, HexCoord::new(2, 3)),
        (UnitClass::Heavy, HexCoord::new(1, 2)),
    ];
    let allied = [
        (UnitClass::Light, HexCoord::new(rows - 4, cols - 6)),
        (UnitClass::Medium, HexCoord::new(rows - 3, cols - 6)),
        (UnitClass::Assault, HexCoord::new(rows - 4, cols - 5)),
    ];

    for (side, lance) in [(Side::Axis, axis), (Side::Allied, allied)] {
        for (class, coord) in lance {
            let coord = HexCoord::new(coord.row.clamp(0, rows - 1), coord.col.clamp(0, cols - 1));
            if game.unit_at(coord).is_none() {
                game.deploy_unit(class, side, coord)?;
            }
        }
    }
    Ok(())
}

/// Fire if possible, otherwise close in and try again
fn play_unit(game: &mut GameSession, id: UnitId) -> Result<()> {
    if let Some(target) = pick_target(game, id) {
        game.perform_attack(id, target)?;
        return Ok(());
    }

    let Some(unit) = game.unit(id) else {
        return Ok(());
    };
    let Some(enemy_at) = nearest_enemy(game, id) else {
        return Ok(());
    };
    let position = unit.position;
    let destination = game
        .reachable_hexes(id)
        .into_iter()
        .filter(|coord| *coord != position)
        .min_by_key(|coord| coord.distance(&enemy_at));
    if let Some(destination) = destination {
        game.move_unit(id, destination)?;
    }
    game.face_toward(id, enemy_at)?;

    if let Some(target) = pick_target(game, id) {
        game.perform_attack(id, target)?;
    }
    Ok(())
}

fn pick_target(game: &GameSession, id: UnitId) -> Option<UnitId> {
    let position = game.unit(id)?.position;
    game.valid_targets(id).into_iter().min_by_key(|target| {
        game.unit(*target)
            .map(|unit| unit.position.distance(&position))
            .unwrap_or(u32::MAX)
    })
}

fn nearest_enemy(game: &GameSession, id: UnitId) -> Option<HexCoord> {
    let unit = game.unit(id)?;
    game.units()
        .living(unit.side.opponent())
        .map(|(_, enemy)| enemy.position)
        .min_by_key(|coord| coord.distance(&unit.position))
}
