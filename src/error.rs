use displaydoc::Display;
use packed_struct::PackingError;

/// A specialized result type for strip operations.
pub type Result<T> = core::result::Result<T, StripError>;

/// Errors raised by the frame buffer and the packetizer.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum StripError {
    /// LED index {index} is out of range for a strip of {len} LEDs
    IndexOutOfRange { index: usize, len: usize },
    /// packet size {max_bytes} must be between 10 and 65507 bytes
    PacketSizeOutOfRange { max_bytes: usize },
    /// {led_count} LEDs need {required} packets per frame, at most 255 fit the header
    TooManyPackets { led_count: usize, required: usize },
    /// unable to pack the packet header: {0:?}
    Packing(PackingError),
    /// malformed packet: {0}
    MalformedPacket(&'static str),
}

impl std::error::Error for StripError {}

impl From<PackingError> for StripError {
    fn from(err: PackingError) -> Self {
        Self::Packing(err)
    }
}
