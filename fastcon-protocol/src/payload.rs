//! RF frame assembly.
//!
//! The on-air frame layout, before whitening:
//!
//! ```text
//! offset 0x00..0x0f   zeroed preamble area
//! offset 0x0f..0x12   marker bytes 0x71 0x0f 0x55
//! offset 0x12..       mesh address, byte-reversed
//! ...                 command body
//! trailing 2 bytes    CRC-16, little-endian
//! ```
//!
//! The marker and address region is additionally bit-reversed in place, the
//! whole buffer is whitened, and only the suffix from the marker onward is
//! broadcast.

use crate::bits::reverse_bits8;
use crate::crc::crc16;
use crate::whitening::Whitening;

/// XOR key applied to the 4-byte command header before framing.
pub const DEFAULT_ENCRYPT_KEY: [u8; 4] = [0x5e, 0x36, 0x7b, 0xc4];

/// Mesh address all Fastcon broadcast commands are sent to.
pub const BROADCAST_ADDRESS: [u8; 3] = [0xC1, 0xC2, 0xC3];

/// LFSR seed used to whiten every Fastcon frame.
pub const WHITENING_SEED: u32 = 0x25;

const DATA_OFFSET: usize = 0x12;
const INVERSE_OFFSET: usize = 0x0f;

/// Assemble the full RF buffer for an address and command body, including
/// the zeroed preamble area and the trailing CRC.
pub fn rf_payload(addr: &[u8], data: &[u8]) -> Vec<u8> {
    let result_data_size = DATA_OFFSET + addr.len() + data.len();
    let mut buf = vec![0u8; result_data_size + 2];

    buf[0x0f] = 0x71;
    buf[0x10] = 0x0f;
    buf[0x11] = 0x55;

    for (i, byte) in addr.iter().enumerate() {
        buf[DATA_OFFSET + addr.len() - i - 1] = *byte;
    }
    buf[DATA_OFFSET + addr.len()..result_data_size].copy_from_slice(data);

    for i in INVERSE_OFFSET..INVERSE_OFFSET + addr.len() + 3 {
        buf[i] = reverse_bits8(buf[i]);
    }

    let crc = crc16(addr, data);
    buf[result_data_size] = (crc & 0xff) as u8;
    buf[result_data_size + 1] = (crc >> 8) as u8;

    buf
}

/// Assemble, whiten, and trim an RF frame down to the bytes that go on the
/// air (everything from the marker region onward).
pub fn prepare_payload(addr: &[u8], data: &[u8]) -> Vec<u8> {
    let mut payload = rf_payload(addr, data);

    let mut whitening = Whitening::new(WHITENING_SEED);
    whitening.encode(&mut payload);

    payload.split_off(INVERSE_OFFSET)
}
