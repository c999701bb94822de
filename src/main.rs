mod args;
mod sim;

use std::process::ExitCode;

use bevy::{asset::AssetMetaCheck, log::{Level, LogPlugin}, prelude::*};
use clap::Parser;
use game::{config::{load_session_config, SessionConfig}, plugins::BaseZombieGamePlugin};

use args::{Command, Opt};
use sim::{run_simulation, RunError};


fn log_plugin(verbose: bool) -> LogPlugin {
    LogPlugin {
        level: if verbose { Level::DEBUG } else { Level::INFO },
        filter: "wgpu=error,naga=warn".to_string(),
        ..Default::default()
    }
}

fn simulate(args: &args::SimulateArgs, verbose: bool) -> Result<(), RunError> {
    let report = run_simulation(args, Some(log_plugin(verbose)))?;
    let json = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");
    Ok(())
}

fn play(config: Option<&std::path::Path>, verbose: bool) -> Result<(), RunError> {
    let session = match config {
        Some(path) => load_session_config(path)?,
        None => SessionConfig::default(),
    };

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(AssetPlugin {
                    meta_check: AssetMetaCheck::Never,
                    ..Default::default()
                })
                .set(log_plugin(verbose)),
        )
        .add_plugins(BaseZombieGamePlugin::new(session))
        .run();
    Ok(())
}

fn main() -> ExitCode {
    let opt = Opt::parse();

    let result = match &opt.command {
        Command::Simulate(args) => simulate(args, opt.verbose),
        Command::Play { config } => play(config.as_deref(), opt.verbose),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
