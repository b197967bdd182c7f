mod logging;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use ev3link::supervisor::{Supervisor, SupervisorConfig};
use ev3link::watcher::PairingWatcher;

use crate::logging::{init_logging, LogFormat, LogLevel};

const SUCCESS: i32 = 0;
const FAILURE: i32 = 1;
const USAGE: i32 = 64;

#[derive(Parser, Debug)]
#[command(
    name = "ev3link",
    version,
    about = "Bridge the direction finder to an EV3 brick over Bluetooth serial"
)]
struct Cli {
    /// Serial device node created by the pairing watcher.
    #[arg(long, default_value = "/dev/rfcomm0")]
    device: PathBuf,

    /// Nominal baud rate for the serial device.
    #[arg(long, default_value_t = ev3link::serial::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Path to the compute binary.
    #[arg(long, default_value = "/home/pi/FFT_Iterator.bin")]
    compute: PathBuf,

    /// Argument for the compute binary (repeatable; three microphone ports
    /// plus the frequency band).
    #[arg(long = "compute-arg", value_name = "ARG")]
    compute_args: Vec<String>,

    /// Delay between telemetry cycles (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    cadence: String,

    /// Device poll interval while disconnected.
    #[arg(long, default_value = "500ms")]
    poll_interval: String,

    /// Pairing watcher command launched once at startup.
    #[arg(long, default_value = "rfcomm watch hci0")]
    pairing_watcher: String,

    /// Skip launching the pairing watcher (pairing handled out of band).
    #[arg(long)]
    no_pairing_watcher: bool,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

fn main() {
    // Exit through here so the watcher and any open session drop first.
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            return USAGE;
        }
    };

    let _watcher = if cli.no_pairing_watcher {
        None
    } else {
        match PairingWatcher::spawn(&cli.pairing_watcher) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                eprintln!("error: failed to start pairing watcher: {err}");
                return FAILURE;
            }
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    if let Err(err) = ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    }) {
        eprintln!("error: signal handler setup failed: {err}");
        return FAILURE;
    }

    Supervisor::new(config, running).run();

    info!("exiting");
    SUCCESS
}

fn build_config(cli: &Cli) -> Result<SupervisorConfig, String> {
    let defaults = SupervisorConfig::default();
    let compute_args = if cli.compute_args.is_empty() {
        defaults.compute_args
    } else {
        cli.compute_args.clone()
    };

    Ok(SupervisorConfig {
        device_path: cli.device.clone(),
        baud_rate: cli.baud,
        compute_program: cli.compute.clone(),
        compute_args,
        poll_interval: parse_duration(&cli.poll_interval)?,
        cadence: parse_duration(&cli.cadence)?,
    })
}

fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration value: {input}"))?;

    if value == 0 {
        return Err("duration must be greater than zero".to_string());
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(format!("unsupported duration unit: {unit}")),
    }
}
