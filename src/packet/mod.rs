use std::fmt::Display;

use common::{HsvColor, RgbColor};
use log::{debug, warn};
use packed_struct::PackedStruct;

use crate::{
    error::{Result, StripError},
    transport::Transport,
};

pub use self::pack::{
    PacketHeader, END_MARKER, FOOTER_BYTES, HEADER_BYTES, OVERHEAD_BYTES, START_MARKER,
    TYPE_MARKER,
};

pub mod pack;

/// Packet size used when nothing else is configured
pub const DEFAULT_MAX_BYTES: usize = 1400;
/// Largest payload of a single IPv4 UDP datagram
pub const MAX_DATAGRAM_BYTES: usize = 65_507;
/// Smallest packet that still carries one LED
pub const MIN_PACKET_BYTES: usize = OVERHEAD_BYTES + BYTES_PER_LED;
/// Sequence and total fields are a single byte each
pub const MAX_PACKETS_PER_FRAME: usize = u8::MAX as usize;

const BYTES_PER_LED: usize = 3;

/// One datagram of a frame: the header plus the RGB triplets it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    pub header: PacketHeader,
    pub payload: Vec<u8>,
}

impl Packet {
    /// Serialize into a datagram of exactly `max_bytes`, zeroing the unused
    /// part of the payload region.
    pub fn to_bytes(&self, max_bytes: usize) -> Result<Vec<u8>> {
        if OVERHEAD_BYTES + self.payload.len() > max_bytes {
            return Err(StripError::MalformedPacket(
                "payload does not fit the packet size",
            ));
        }

        let mut bytes = Vec::with_capacity(max_bytes);
        bytes.extend_from_slice(&self.header.pack()?);
        bytes.extend_from_slice(&self.payload);
        bytes.resize(max_bytes - FOOTER_BYTES, 0);
        bytes.push(END_MARKER);

        Ok(bytes)
    }

    /// Parse a received datagram, checking markers and header fields.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < OVERHEAD_BYTES {
            return Err(StripError::MalformedPacket("datagram is too short"));
        }

        let mut raw = [0u8; HEADER_BYTES];
        raw.copy_from_slice(&bytes[..HEADER_BYTES]);
        let header = PacketHeader::unpack(&raw)?;

        if !header.has_markers() {
            return Err(StripError::MalformedPacket("missing start or type marker"));
        }
        if bytes[bytes.len() - 1] != END_MARKER {
            return Err(StripError::MalformedPacket("missing end marker"));
        }
        if header.sequence == 0 || header.sequence > header.total {
            return Err(StripError::MalformedPacket(
                "sequence number is outside of the frame",
            ));
        }

        let size = usize::from(header.payload_size);
        if size > bytes.len() - OVERHEAD_BYTES {
            return Err(StripError::MalformedPacket(
                "payload size is larger than the datagram",
            ));
        }
        if size % BYTES_PER_LED != 0 {
            return Err(StripError::MalformedPacket(
                "payload is not made of whole RGB triplets",
            ));
        }

        Ok(Self {
            header,
            payload: bytes[HEADER_BYTES..HEADER_BYTES + size].to_vec(),
        })
    }

    pub fn colors(&self) -> impl Iterator<Item = RgbColor> + '_ {
        self.payload
            .chunks_exact(BYTES_PER_LED)
            .map(|rgb| RgbColor::new(rgb[0], rgb[1], rgb[2]))
    }
}

impl Display for Packet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Packet 1/3, 1392 payload bytes
        // FF 00 00 3C E1 00 ...
        writeln!(
            f,
            "Packet {}/{}, {} payload bytes",
            self.header.sequence, self.header.total, self.header.payload_size
        )?;

        for (i, byte) in self.payload.iter().enumerate() {
            if i % 24 == 0 && i != 0 {
                writeln!(f)?;
            }
            write!(f, "{:02X} ", byte)?;
        }

        Ok(())
    }
}

/// Outcome of sending one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadStats {
    pub sent: usize,
    pub failed: usize,
}

/// Splits frames into fixed-size packets and hands them to a transport.
///
/// The packet count depends only on the LED count, so it is computed when
/// the strip is set up and reused for every frame.
#[derive(Clone, Debug)]
pub struct Packetizer {
    max_bytes: usize,
    led_count: usize,
    total_packets: u8,
}

impl Packetizer {
    pub fn new(max_bytes: usize) -> Result<Self> {
        if !(MIN_PACKET_BYTES..=MAX_DATAGRAM_BYTES).contains(&max_bytes) {
            return Err(StripError::PacketSizeOutOfRange { max_bytes });
        }

        Ok(Self {
            max_bytes,
            led_count: 0,
            total_packets: 0,
        })
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Number of whole RGB triplets that fit one packet's payload region.
    pub fn leds_per_packet(&self) -> usize {
        (self.max_bytes - OVERHEAD_BYTES) / BYTES_PER_LED
    }

    pub fn led_count(&self) -> usize {
        self.led_count
    }

    pub fn total_packets(&self) -> u8 {
        self.total_packets
    }

    /// Recompute the packet count for a strip of `led_count` LEDs.
    #[allow(clippy::cast_possible_truncation)]
    pub fn setup(&mut self, led_count: usize) -> Result<()> {
        let required = led_count.div_ceil(self.leds_per_packet());
        if required > MAX_PACKETS_PER_FRAME {
            return Err(StripError::TooManyPackets {
                led_count,
                required,
            });
        }
        let total_packets = required as u8;

        debug!(
            "Packetizer: {} LEDs take {} packets of {} bytes",
            led_count, total_packets, self.max_bytes
        );

        self.led_count = led_count;
        self.total_packets = total_packets;
        Ok(())
    }

    /// Build the packets of one frame without sending them.
    ///
    /// Each colour goes through `convert` and is then scaled by
    /// `brightness / 255`.
    pub fn frame<'a, F>(
        &mut self,
        leds: &'a [HsvColor],
        brightness: u8,
        convert: F,
    ) -> Result<FramePackets<'a, F>>
    where
        F: Fn(HsvColor) -> RgbColor,
    {
        if leds.len() != self.led_count {
            self.setup(leds.len())?;
        }

        Ok(FramePackets {
            leds,
            brightness,
            convert,
            leds_per_packet: self.leds_per_packet(),
            sequence: 0,
            total: self.total_packets,
        })
    }

    /// Send one frame, packet by packet, in sequence order.
    ///
    /// A failed send is logged and counted; the remaining packets are still
    /// sent and nothing is retried.
    pub fn upload<T, F>(
        &mut self,
        leds: &[HsvColor],
        brightness: u8,
        convert: F,
        transport: &mut T,
    ) -> Result<UploadStats>
    where
        T: Transport + ?Sized,
        F: Fn(HsvColor) -> RgbColor,
    {
        let max_bytes = self.max_bytes;
        let mut stats = UploadStats::default();

        for packet in self.frame(leds, brightness, convert)? {
            let bytes = packet.to_bytes(max_bytes)?;
            match transport.send(&bytes) {
                Ok(_) => stats.sent += 1,
                Err(e) => {
                    warn!(
                        "Packet {}/{}: send failed: {}",
                        packet.header.sequence, packet.header.total, e
                    );
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

/// Iterator over the packets of one frame, see [`Packetizer::frame`].
pub struct FramePackets<'a, F> {
    leds: &'a [HsvColor],
    brightness: u8,
    convert: F,
    leds_per_packet: usize,
    sequence: u8,
    total: u8,
}

impl<'a, F> Iterator for FramePackets<'a, F>
where
    F: Fn(HsvColor) -> RgbColor,
{
    type Item = Packet;

    #[allow(clippy::cast_possible_truncation)]
    fn next(&mut self) -> Option<Packet> {
        if self.sequence >= self.total {
            return None;
        }

        let take = self.leds.len().min(self.leds_per_packet);
        let (chunk, rest) = self.leds.split_at(take);
        self.leds = rest;
        self.sequence += 1;

        let mut payload = Vec::with_capacity(take * BYTES_PER_LED);
        for &hsv in chunk {
            let rgb = (self.convert)(hsv).scale(self.brightness);
            payload.extend_from_slice(&rgb.to_bytes());
        }

        // The payload region is bounded by MAX_DATAGRAM_BYTES, well below u16::MAX
        let header = PacketHeader::new(payload.len() as u16, self.sequence, self.total);

        Some(Packet { header, payload })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.total - self.sequence);
        (remaining, Some(remaining))
    }
}

impl<'a, F> ExactSizeIterator for FramePackets<'a, F> where F: Fn(HsvColor) -> RgbColor {}

/// What the receiving side learned from one packet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Observation {
    /// Packets that should have arrived before this one but did not
    pub dropped: usize,
    /// This packet was the last one of its frame
    pub frame_complete: bool,
}

/// Spots lost packets from the sequence numbers of received headers.
///
/// Packets are never recovered; a frame with gaps is simply counted as
/// damaged and the next frame starts clean.
#[derive(Clone, Debug)]
pub struct DropDetector {
    next: u8,
    total: u8,
    frames: u64,
    dropped: u64,
}

impl Default for DropDetector {
    fn default() -> Self {
        Self {
            next: 1,
            total: 0,
            frames: 0,
            dropped: 0,
        }
    }
}

impl DropDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, header: &PacketHeader) -> Observation {
        let mut dropped = 0;

        let mid_frame = self.next != 1;
        let starts_new_frame = header.sequence < self.next || header.total != self.total;
        if mid_frame && starts_new_frame {
            // The tail of the previous frame never arrived
            dropped += usize::from(self.total.saturating_sub(self.next) + 1);
            self.next = 1;
        }

        dropped += usize::from(header.sequence.saturating_sub(self.next));

        self.total = header.total;
        let frame_complete = header.sequence >= header.total;
        if frame_complete {
            self.next = 1;
            self.frames += 1;
        } else {
            self.next = header.sequence + 1;
        }

        self.dropped += dropped as u64;
        Observation {
            dropped,
            frame_complete,
        }
    }

    /// Frames whose last packet has been seen
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Packets known to be lost so far
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
