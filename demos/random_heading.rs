use compass::{Compass, CompassConfig, HeadingSender, LocationError};
use rand::Rng;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = CompassConfig::builder()
        .title("Compass demo".to_string())
        .maybe_font_path(std::env::args().nth(1).map(PathBuf::from))
        .build();

    let compass = Compass::new(config);

    // Create a channel for the simulated companion
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let mut provider = HeadingSender::new(sender);
        let mut rng = rand::rng();
        let mut heading: f64 = rng.random_range(0.0..360.0);
        loop {
            let result = if rng.random_range(0.0..1.0) < 0.02 {
                let error = match rng.random_range(0..3) {
                    0 => LocationError::PermissionDenied,
                    1 => LocationError::PositionUnavailable,
                    _ => LocationError::Timeout,
                };
                provider.error(error)
            } else {
                heading += rng.random_range(-8.0..8.0);
                provider.position(heading).map(|_| ())
            };

            if result.is_err() {
                break;
            }

            thread::sleep(Duration::from_millis(100));
        }
    });

    println!("Displaying compass with a randomly drifting heading");
    println!("Pass a .ttf/.otf path as the first argument to draw labels");
    println!("Press Ctrl+C to exit");

    compass.show_with_updates(receiver)?;
    Ok(())
}
