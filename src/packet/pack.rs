use packed_struct::prelude::*;

/// First byte of every packet
pub const START_MARKER: u8 = 0x9C;
/// Second byte of every packet, marks a colour data packet
pub const TYPE_MARKER: u8 = 0xDA;
/// Last byte of every packet
pub const END_MARKER: u8 = 0x36;

pub const HEADER_BYTES: usize = 6;
pub const FOOTER_BYTES: usize = 1;
/// Fixed bytes of every packet that are not payload
pub const OVERHEAD_BYTES: usize = HEADER_BYTES + FOOTER_BYTES;

// Packet header:
// Byte # | Definition
// 0      | Start marker (0x9C)
// 1      | Type marker (0xDA)
// 2..=3  | Payload size in bytes, high byte first
// 4      | Sequence number of this packet, starting at 1
// 5      | Total packets in this frame
//
// The payload follows as RGB triplets. The packet is padded to the packet
// size, and the last byte is the end marker (0x36).
#[derive(PackedStruct, Debug, PartialEq, Eq, Clone, Copy)]
#[packed_struct(bit_numbering = "msb0", endian = "msb", size_bytes = "6")]
pub struct PacketHeader {
    #[packed_field(bytes = "0")]
    pub start: u8,
    #[packed_field(bytes = "1")]
    pub kind: u8,
    #[packed_field(bytes = "2..=3")]
    pub payload_size: u16,
    #[packed_field(bytes = "4")]
    pub sequence: u8,
    #[packed_field(bytes = "5")]
    pub total: u8,
}

impl PacketHeader {
    pub fn new(payload_size: u16, sequence: u8, total: u8) -> Self {
        Self {
            start: START_MARKER,
            kind: TYPE_MARKER,
            payload_size,
            sequence,
            total,
        }
    }

    pub fn has_markers(&self) -> bool {
        self.start == START_MARKER && self.kind == TYPE_MARKER
    }
}
