use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};


/// Zombie survival: enemy AI and spawn director
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Opt {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a headless session against a scripted turret and print a JSON report
    Simulate(SimulateArgs),
    /// Run the full game stack in a window: loads the config assets from
    /// `assets/config`, routes audio and runs the director around a stationary
    /// player. Nothing is rendered and there is no input, so this is a smoke
    /// check for asset loading and sound, not a playable game.
    Play {
        /// Session file (RON) for the player and navigation settings
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Session file (RON); defaults are used for anything it leaves out
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Seed for spawn placement and the turret's aim
    #[arg(short, long, default_value_t = 1)]
    pub seed: u32,
    /// Simulated seconds; the run ends early on game over
    #[arg(long, default_value_t = 120.0)]
    pub seconds: f32,
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
    #[arg(long, default_value_t = 25)]
    pub turret_damage: i32,
    /// Seconds between turret shots
    #[arg(long, default_value_t = 0.6)]
    pub turret_interval: f32,
    #[arg(long, default_value_t = 25.0)]
    pub turret_range: f32,
    /// Chance in [0, 1] that a shot lands on the head
    #[arg(long, default_value_t = 0.25)]
    pub headshot_chance: f32,
    /// Print the report on a single line
    #[arg(long)]
    pub compact: bool,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            config: None,
            seed: 1,
            seconds: 120.0,
            fps: 60,
            turret_damage: 25,
            turret_interval: 0.6,
            turret_range: 25.0,
            headshot_chance: 0.25,
            compact: false,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_subcommands() {
        let opt = Opt::try_parse_from(["zombie_survival", "-v", "simulate", "--seed", "9", "--compact"]).unwrap();
        assert!(opt.verbose);
        let Command::Simulate(args) = opt.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.seed, 9);
        assert!(args.compact);
        assert_eq!(args.fps, SimulateArgs::default().fps);

        let opt = Opt::try_parse_from(["zombie_survival", "play", "--config", "assets/config/session.ron"]).unwrap();
        assert!(matches!(opt.command, Command::Play { config: Some(_) }));
    }

    #[test]
    fn play_help_says_it_is_not_playable() {
        use clap::CommandFactory;
        let mut command = Opt::command();
        let play = command.find_subcommand_mut("play").unwrap();
        let help = play.render_long_help().to_string();
        assert!(help.contains("not a playable game"));
    }
}
