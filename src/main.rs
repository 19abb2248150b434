//! notify-me: command-line alarm clock for Linux.

mod alarm_time;
mod asset;
mod config;
mod error;
mod notifier;
mod player;
mod scheduler;

use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use alarm_time::AlarmTime;
use asset::{HttpFetcher, SoundAsset};
use notifier::Notifier;
use player::Player;
use scheduler::AlarmMoment;

const EXAMPLES: &str = "\
Examples:
  notify-me 14:30 \"Go to the gym\"
  notify-me 09:00 \"Join the meeting\"
  notify-me 1:15 \"Take a break\"

The program will also play a sound when the alarm triggers.";

#[derive(Parser, Debug)]
#[command(
    name = "notify-me",
    version,
    about = "Alarm program that notifies the user with a message at the specified time",
    after_help = EXAMPLES
)]
struct Args {
    /// Alarm time, HH:MM or H:MM (24-hour clock)
    time: AlarmTime,

    /// Message shown in the notification
    message: String,

    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug,hyper=info,hyper_util=info,reqwest=info")
    } else {
        EnvFilter::new("info,hyper=warn,hyper_util=warn,reqwest=warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config::Config::load(args.config.as_deref());

    let Some(moment) = AlarmMoment::next(args.time, &Local::now()) else {
        error!("No upcoming local time matches {}", args.time);
        return ExitCode::FAILURE;
    };
    info!(
        "Alarm set for {} on {}",
        moment.time(),
        moment.at().format("%Y-%m-%d")
    );

    let asset = match SoundAsset::from_config(&config.sound) {
        Ok(asset) => asset,
        Err(e) => {
            error!("Error locating sound file: {}", error::chain(&e));
            return ExitCode::FAILURE;
        }
    };
    let fetcher = HttpFetcher::new(Duration::from_secs(config.sound.timeout_secs));
    if let Err(e) = asset.ensure(&fetcher).await {
        error!("Error downloading sound: {}", error::chain(&e));
        return ExitCode::FAILURE;
    }

    let notifier = Notifier::new(&config.notification);
    let player = Player::new(&config.playback);

    moment.wait().await;

    notifier.notify(&args.message).await;
    player.play(asset.path()).await;

    info!("Alarm completed!");
    ExitCode::SUCCESS
}
