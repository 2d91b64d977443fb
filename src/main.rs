use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;
use log::info;
use rusty_strip::prelude::*;

/// Stream colour frames to a network LED strip
///
/// Renders the configured effect and sends every frame as fixed-size UDP
/// packets to the strip controller.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config.ron", value_name = "FILE")]
    config: PathBuf,
    /// Strip controller IP address
    #[arg(short, long)]
    address: Option<String>,
    /// Strip controller UDP port
    #[arg(short, long)]
    port: Option<u16>,
    /// Number of LEDs on the strip
    #[arg(short = 'n', long)]
    led_count: Option<usize>,
    /// Strip brightness, 0 to 255
    #[arg(short, long)]
    brightness: Option<u8>,
    /// Stop after this many frames
    #[arg(short, long)]
    frames: Option<u64>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(address) = &self.address {
            config.address = address.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(led_count) = self.led_count {
            config.led_count = led_count;
        }
        if let Some(brightness) = self.brightness {
            config.brightness = brightness;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply(&mut config);
    config.validate()?;

    let mut controller = LedController::from_config(&config, UdpTransport::new()?)?;
    let mut effect = config.effect.clone();

    tokio::select! {
        frames = run(&mut controller, &mut effect, config.fps, cli.frames) => {
            info!("Sent {} frames", frames?);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping");
        }
    }

    Ok(())
}
