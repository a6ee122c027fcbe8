//! Fixed-size packets and the two ends of the link that move them.
//!
//! Every packet on the air is exactly [`PACKET_LENGTH`] bytes; there is no
//! in-band length or checksum, and multi-byte integers are sent
//! most-significant byte first.

mod receiver;
pub use receiver::Receiver;
mod sender;
pub use sender::Sender;

/// The number of bytes in every packet (and the transceiver's payload width).
pub const PACKET_LENGTH: usize = 32;

const _: () = assert!(PACKET_LENGTH > 0 && PACKET_LENGTH <= 32);

/// One over-the-air payload.
pub type Packet = [u8; PACKET_LENGTH];
