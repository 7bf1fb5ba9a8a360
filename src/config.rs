use std::{env, io::Write, path::PathBuf};

use clap::Parser;
use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter, info, warn};

use crate::DEFAULT_THERMAL_PATH;

const START_THRESHOLD: i32 = 68;
const STOP_THRESHOLD: i32 = 60;
const SLEEP_TIME: u64 = 5;
const GPIO_PIN: u8 = 2;

#[derive(Parser)]
#[command(name = "pi-fan", version, about = "Threshold fan control over a GPIO pin")]
#[command(after_help = "EXAMPLE:
    pi-fan --start 68 --stop 60 --timeout 5 \\
        --thermal /sys/class/thermal/thermal_zone0/temp --gpio 2")]
struct Cli {
    /// Temperature (°C) at or above which the fan turns on
    #[arg(long, default_value_t = START_THRESHOLD)]
    start: i32,

    /// Temperature (°C) at or below which the fan turns off
    #[arg(long, default_value_t = STOP_THRESHOLD)]
    stop: i32,

    /// Poll interval in seconds
    #[arg(long, default_value_t = SLEEP_TIME)]
    timeout: u64,

    /// Thermal information source (integer millidegrees Celsius)
    #[arg(long, default_value = DEFAULT_THERMAL_PATH)]
    thermal: PathBuf,

    /// BCM GPIO pin driving the fan
    #[arg(long, default_value_t = GPIO_PIN)]
    gpio: u8,
}

pub struct Config {
    pub start: i32,
    pub stop: i32,
    pub sleep_time: u64,
    pub thermal: PathBuf,
    pub gpio: u8,
    pub debug: bool,
}

impl Config {
    fn setup_logging(debug_mode: bool) {
        let fallback = if debug_mode { "debug" } else { "info" };
        let level_filter = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| fallback.into())
            .to_ascii_lowercase()
            .as_str()
        {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => LevelFilter::Info,
        };

        let mut builder = Builder::new();

        if !debug_mode {
            builder.format(|f, r| {
                let color = match r.level() {
                    Level::Warn => r.args().to_string().yellow(),
                    Level::Error => r.args().to_string().red(),
                    Level::Info => r.args().to_string().green(),
                    Level::Debug => r.args().to_string().blue(),
                    Level::Trace => r.args().to_string().cyan(),
                };
                writeln!(f, "{color}")
            });
        }

        builder.filter_level(level_filter).init();

        println!("Log level set to: {level_filter}");
        let msg = format!("Starting fan monitor v{}", env!("CARGO_PKG_VERSION"));

        if debug_mode {
            info!("{msg}");
        } else {
            println!("{msg}");
        }
    }

    /// Command line and environment are read exactly once; nothing consults
    /// them again after startup.
    #[must_use]
    pub fn new() -> Self {
        let cli = Cli::parse();

        let debug = debug_mode();
        Self::setup_logging(debug);

        let config = Self {
            start: cli.start,
            stop: cli.stop,
            sleep_time: cli.timeout,
            thermal: cli.thermal,
            gpio: cli.gpio,
            debug,
        };
        config.check_config();
        config
    }

    /// Start at or below stop leaves no dead-band: the start check runs
    /// first, so once the fan is on the stop branch is unreachable and the
    /// fan stays on. Surfaced at startup, not rejected.
    pub fn check_config(&self) {
        if self.start <= self.stop {
            warn!(
                "start threshold {} <= stop threshold {}: fan will latch on permanently",
                self.start, self.stop
            );
        }
    }
}

fn debug_mode() -> bool {
    env::var("MODE").is_ok_and(|mode| mode == "debug")
}
