// src/main.rs
// Entry point: pick a motion profile, open the sensor logs, then spin the
// ROS 2 node until Ctrl+C.

use anyhow::Context as _;
use clap::Parser;
use log::{error, info};
use motion_profiles::{MotionConfig, MotionNode, open_session, ros_interface::RosInterface};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Drive the robot through a motion profile while logging its sensors
#[derive(Parser, Debug)]
#[command(name = "motion_executor", version, about)]
struct Args {
    /// Motion type: circle, spiral or line (case-insensitive)
    #[arg(long, default_value = "circle")]
    motion: String,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the sensor CSV files (overrides the config file)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => MotionConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MotionConfig::default(),
    };
    if let Some(dir) = &args.log_dir {
        config.logging.output_dir = dir.clone();
    }

    // An unknown selector fails here, before any log file exists
    let (profile, loggers) = open_session(&args.motion, &config)?;
    info!("Starting motion executor with {} profile", profile);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("installing Ctrl+C handler")?;

    let (mut ros, publisher) = RosInterface::new(&config.ros).context("creating ROS 2 node")?;

    let period = config.control.tick_period_secs;
    let mut node = MotionNode::new(profile, period, loggers, publisher);

    ros.run(&mut node, Duration::from_secs_f64(period), &running);
    info!("Exiting");
    Ok(())
}
