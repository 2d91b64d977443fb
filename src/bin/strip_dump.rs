use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;
use packed_struct::PackedStruct;
use rusty_strip::prelude::*;

/// Print the packets of one rendered frame
///
/// Renders the configured effect once and prints every packet of the frame
/// as hex, without sending anything.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config.ron", value_name = "FILE")]
    config: PathBuf,
    /// Number of LEDs on the strip
    #[arg(short = 'n', long)]
    led_count: Option<usize>,
    /// Packet size in bytes
    #[arg(short, long)]
    max_bytes: Option<usize>,
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(led_count) = cli.led_count {
        config.led_count = led_count;
    }
    if let Some(max_bytes) = cli.max_bytes {
        config.max_bytes = max_bytes;
    }
    config.validate()?;

    let mut strip = FrameBuffer::new(config.led_count);
    strip.set_brightness(config.brightness);
    config.effect.clone().render(&mut strip);

    let mut packetizer = Packetizer::new(config.max_bytes)?;
    packetizer.setup(strip.len())?;
    println!(
        "{} LEDs, {} per packet, {} packets of {} bytes, {:?} colours at brightness {}",
        strip.len(),
        packetizer.leds_per_packet(),
        packetizer.total_packets(),
        packetizer.max_bytes(),
        config.color_law,
        strip.brightness()
    );

    let color_law = config.color_law;
    for packet in packetizer.frame(strip.as_slice(), strip.brightness(), |hsv| {
        color_law.to_rgb(hsv)
    })? {
        println!();
        println!("Header {:02X?}", packet.header.pack().map_err(StripError::from)?);
        println!("{}", packet);
    }

    Ok(())
}
