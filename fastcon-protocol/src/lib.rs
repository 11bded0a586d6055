//! Wire codec for the Fastcon BLE broadcast protocol.
//!
//! Fastcon devices listen for non-connectable BLE advertisements whose
//! manufacturer data carries a whitened, CRC-protected RF frame. This crate
//! implements the byte-level pipeline that turns a command body into that
//! frame:
//!
//! 1. Lay out the RF buffer: preamble area, fixed marker bytes, the mesh
//!    address (byte-reversed), the command body, and a trailing CRC-16.
//! 2. Bit-reverse the marker and address region in place.
//! 3. Whiten the whole buffer with the protocol's fixed LFSR seed.
//! 4. Emit the suffix that goes on the air.
//!
//! The codec is pure: no I/O, no state beyond the whitening context, and no
//! assumptions about the transport that finally broadcasts the frame.

pub mod bits;
pub mod crc;
pub mod payload;
pub mod whitening;

pub use bits::{reverse_bits8, reverse_bits16};
pub use crc::crc16;
pub use payload::{
    prepare_payload, rf_payload, BROADCAST_ADDRESS, DEFAULT_ENCRYPT_KEY, WHITENING_SEED,
};
pub use whitening::Whitening;
