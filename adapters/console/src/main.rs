#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interactive harness that hosts the mitigation plugin over a simulated
//! server, mixing admin console commands with simulation verbs.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hudshield_console::CommandRegistry;
use hudshield_core::{Command, PlayerId};
use hudshield_plugin::MitigationPlugin;
use hudshield_world::{self as world, query, World};
use ini::Ini;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hudshield", about = "Triggerbot mitigation plugin harness")]
struct Args {
    /// Host settings file with the [General] section.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Backing file for the exception store.
    #[arg(long, default_value = "MitigationExceptions.ini")]
    exceptions: PathBuf,

    /// Fixed seed for the passive-jitter generator.
    #[arg(long)]
    seed: Option<u64>,
}

const SIM_HELP: &str = "\
join <id> <name>   connect a player
enter <id>         complete a player's join handshake
spawn <id>         give a player a game-world object
leave <id>         disconnect a player
tick               advance the server one tick
hud <id>           print a player's HUD state
unload             unload the map
help               print this text and the admin commands
quit               exit";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut plugin = match args.seed {
        Some(seed) => MitigationPlugin::with_seed(&args.exceptions, seed),
        None => MitigationPlugin::new(&args.exceptions),
    };

    if let Some(path) = &args.settings {
        let file = Ini::load_from_file(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        plugin.on_settings_load(&file);
    }

    let mut world = World::new();
    plugin.on_level_load(&world);

    let registry = CommandRegistry::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "hudshield harness ready; type `help` for commands")?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read console input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        if handle_sim_verb(line, &mut plugin, &mut world, &registry, &mut out)? {
            continue;
        }
        if !registry.dispatch(line, &mut plugin, &mut world, &mut out)? {
            writeln!(out, "Unknown command: {line}")?;
        }
    }
    Ok(())
}

fn handle_sim_verb(
    line: &str,
    plugin: &mut MitigationPlugin,
    world: &mut World,
    registry: &CommandRegistry,
    out: &mut dyn Write,
) -> Result<bool> {
    let (verb, rest) = match line.split_once(' ') {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "join" => {
            let Some((id, name)) = rest.split_once(' ') else {
                writeln!(out, "Usage: join <id> <name>")?;
                return Ok(true);
            };
            let id = parse_id(id, out)?;
            if let Some(id) = id {
                drive(
                    world,
                    vec![Command::ConnectPlayer {
                        id,
                        name: name.to_string(),
                    }],
                );
                plugin.on_player_join(world, id);
                writeln!(out, "{name} joined as {}", id.get())?;
            }
        }
        "enter" => {
            if let Some(id) = parse_id(rest, out)? {
                drive(world, vec![Command::EnterGame { id }]);
            }
        }
        "spawn" => {
            if let Some(id) = parse_id(rest, out)? {
                drive(world, vec![Command::SpawnAvatar { id }]);
            }
        }
        "leave" => {
            if let Some(id) = parse_id(rest, out)? {
                drive(world, vec![Command::DisconnectPlayer { id }]);
            }
        }
        "tick" => {
            drive(world, vec![Command::Tick]);
            let commands = plugin.on_think(world);
            drive(world, commands);
            writeln!(
                out,
                "tick {} complete; {} waiting",
                query::tick_index(world),
                plugin.waiting_count()
            )?;
        }
        "hud" => {
            if let Some(id) = parse_id(rest, out)? {
                match query::hud(world, id) {
                    Some(hud) => writeln!(out, "{hud:?}")?,
                    None => writeln!(out, "No such player: {}", id.get())?,
                }
            }
        }
        "unload" => {
            plugin.on_map_unload();
            *world = World::new();
            writeln!(out, "map unloaded")?;
        }
        "help" => {
            writeln!(out, "{SIM_HELP}")?;
            for help in registry.help_lines() {
                writeln!(out, "{help}")?;
            }
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_id(raw: &str, out: &mut dyn Write) -> Result<Option<PlayerId>> {
    match raw.trim().parse::<i32>() {
        Ok(id) => Ok(Some(PlayerId::new(id))),
        Err(_) => {
            writeln!(out, "Expected a numeric player id, got {raw:?}")?;
            Ok(None)
        }
    }
}

fn drive(world: &mut World, commands: Vec<Command>) {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
}
