use std::net::SocketAddr;

use anyhow::Error;
use clap::Parser;
use log::{debug, info, warn};
use rusty_strip::prelude::*;
use tokio::net::UdpSocket;

/// Watch the frames sent to a strip
///
/// Listens where a strip controller would, checks every packet and reports
/// completed frames and lost packets.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Socket address to listen on
    #[arg(short, long, default_value = "0.0.0.0:65506")]
    listen: SocketAddr,
    /// Print a summary every this many frames
    #[arg(short, long, default_value = "60")]
    every: u64,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let cli = Cli::parse();
    let socket = UdpSocket::bind(cli.listen).await?;
    info!("Listening on {}", socket.local_addr()?);

    let mut detector = DropDetector::new();
    let mut buf = vec![0u8; MAX_DATAGRAM_BYTES];

    loop {
        let (len, from) = tokio::select! {
            received = socket.recv_from(&mut buf) => received?,
            _ = tokio::signal::ctrl_c() => break,
        };

        let packet = match Packet::parse(&buf[..len]) {
            Ok(packet) => packet,
            Err(e) => {
                warn!("{} bytes from {}: {}", len, from, e);
                continue;
            }
        };
        debug!(
            "Packet {}/{} from {}, {} LEDs",
            packet.header.sequence,
            packet.header.total,
            from,
            packet.colors().count()
        );

        let seen = detector.observe(&packet.header);
        if seen.dropped > 0 {
            warn!(
                "Lost {} packets before {}/{}",
                seen.dropped, packet.header.sequence, packet.header.total
            );
        }
        if seen.frame_complete && cli.every > 0 && detector.frames() % cli.every == 0 {
            info!(
                "{} frames, {} packets lost so far",
                detector.frames(),
                detector.dropped()
            );
        }
    }

    info!(
        "Stopped after {} frames, {} packets lost",
        detector.frames(),
        detector.dropped()
    );
    Ok(())
}
