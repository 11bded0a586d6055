use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{ControllerError, Result};
use crate::types::AdvertisingSettings;

/// Company identifier carried in the manufacturer-specific AD block.
pub const MANUFACTURER_DATA_ID: u16 = 0xFFF0;

/// Legacy advertising PDUs cap the AD payload at 31 bytes.
pub const MAX_ADVERTISEMENT_LEN: usize = 31;

const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_MANUFACTURER_SPECIFIC: u8 = 0xFF;
const FLAG_GENERAL_DISCOVERABLE: u8 = 0x02;
const FLAG_BREDR_NOT_SUPPORTED: u8 = 0x04;

/// Transport seam for the BLE radio.
///
/// The controller only needs to put a raw advertisement on the air and take
/// it off again; everything radio-specific (HCI, vendor SDK, simulator)
/// lives behind this trait.
#[async_trait]
pub trait BleAdvertiser: Send + Sync {
    /// Start broadcasting `frame` as a non-connectable advertisement.
    async fn start_advertising(&self, settings: &AdvertisingSettings, frame: &[u8]) -> Result<()>;

    /// Stop the current broadcast.
    async fn stop_advertising(&self) -> Result<()>;
}

/// Assemble the raw advertisement for a prepared protocol payload: a flags
/// block followed by a manufacturer-specific block. The manufacturer block's
/// length byte covers the company id and payload.
pub fn advertisement_frame(payload: &[u8]) -> Result<Vec<u8>> {
    let len = 7 + payload.len();
    if len > MAX_ADVERTISEMENT_LEN {
        return Err(ControllerError::AdvertisementTooLarge { len });
    }

    let mut frame = Vec::with_capacity(len);
    frame.push(2);
    frame.push(AD_TYPE_FLAGS);
    frame.push(FLAG_BREDR_NOT_SUPPORTED | FLAG_GENERAL_DISCOVERABLE);

    frame.push((payload.len() + 2) as u8);
    frame.push(AD_TYPE_MANUFACTURER_SPECIFIC);
    frame.push((MANUFACTURER_DATA_ID & 0xFF) as u8);
    frame.push((MANUFACTURER_DATA_ID >> 8) as u8);
    frame.extend_from_slice(payload);

    Ok(frame)
}

/// Advertiser that only logs what would go on the air. Used by the hub when
/// no radio transport is wired up, and by tests.
#[derive(Debug, Default)]
pub struct LogAdvertiser;

#[async_trait]
impl BleAdvertiser for LogAdvertiser {
    async fn start_advertising(&self, settings: &AdvertisingSettings, frame: &[u8]) -> Result<()> {
        info!(
            interval_min = settings.interval_min,
            interval_max = settings.interval_max,
            len = frame.len(),
            frame = %hex::encode_upper(frame),
            "start advertising"
        );
        Ok(())
    }

    async fn stop_advertising(&self) -> Result<()> {
        debug!("stop advertising");
        Ok(())
    }
}
