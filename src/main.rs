use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use compass::{Compass, CompassConfig, CompassError};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .compact();
    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .try_init()
        .ok();
}

/// Usage: compass [--title <title>] [--scale <n>] [--font <path>]
///
/// Reads update frames such as `heading=215` or `heading=-2` from stdin,
/// one per line.
fn main() -> Result<(), CompassError> {
    init_logging();

    let mut title = None;
    let mut scale = None;
    let mut font_path = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => title = args.next(),
            "--scale" => match args.next().map(|s| s.parse::<u32>()) {
                Some(Ok(n)) if n > 0 => scale = Some(n),
                _ => warn!("--scale expects a positive integer"),
            },
            "--font" => font_path = args.next().map(PathBuf::from),
            other => warn!(arg = other, "ignoring unknown argument"),
        }
    }

    let config = CompassConfig::builder()
        .maybe_title(title)
        .maybe_window_scale(scale)
        .maybe_font_path(font_path)
        .build();

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line.into_bytes()).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(%err, "stdin read failed");
                    break;
                }
            }
        }
        info!("stdin closed");
    });

    Compass::new(config).show_with_updates(receiver)
}
