//! Bounce Arena headless runner
//!
//! Drives the world with a scripted input sequence and reports what it sees.
//! Useful for profiling the collision space without a window.
//!
//! Usage: bounce-arena [--seed N] [--frames N] [--config PATH] [--restart-at N] [--dump]

use std::process;

use bounce_arena::render::{draw_list, help_lines};
use bounce_arena::{BounceWorld, FrameInput, WorldConfig};

struct Args {
    seed: u64,
    frames: u64,
    config: Option<String>,
    restart_at: Option<u64>,
    dump: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: 0xB0_0C_E5,
            frames: 600,
            config: None,
            restart_at: None,
            dump: false,
        }
    }
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--seed" => args.seed = parse_num(&arg, it.next())?,
            "--frames" => args.frames = parse_num(&arg, it.next())?,
            "--restart-at" => args.restart_at = Some(parse_num(&arg, it.next())?),
            "--config" => {
                args.config = Some(it.next().ok_or("--config needs a path")?);
            }
            "--dump" => args.dump = true,
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(args)
}

fn parse_num(flag: &str, value: Option<String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|e| format!("{} {}: {}", flag, value, e))
}

/// Hold spawn for the first second, flip solidity once, drain near the end
fn scripted_input(frame: u64, total: u64) -> FrameInput {
    FrameInput {
        spawn: frame < 60,
        remove: frame + 30 >= total,
        toggle_solid: frame == total / 2,
    }
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{}", e);
            process::exit(2);
        }
    };

    let config = match &args.config {
        Some(path) => WorldConfig::load(path),
        None => WorldConfig::default(),
    };

    let mut world = match BounceWorld::new(config, args.seed) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Invalid world config: {}", e);
            process::exit(1);
        }
    };
    world.create();
    log::info!("Bounce Arena (headless) starting, {} frames", args.frames);

    let mut peak = world.squares().len();
    for frame in 0..args.frames {
        if args.restart_at == Some(frame) {
            world.reset(world.seed().wrapping_add(1));
        }
        world.update(&scripted_input(frame, args.frames));
        peak = peak.max(world.squares().len());
    }

    for line in help_lines(&world) {
        println!("{}", line);
    }
    println!("peak squares: {}", peak);

    if args.dump {
        match serde_json::to_string_pretty(&draw_list(&world)) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize draw list: {}", e);
                process::exit(1);
            }
        }
    }
}
