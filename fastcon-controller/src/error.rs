use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("advertisement too large: {len} bytes exceeds the 31 byte BLE limit")]
    AdvertisementTooLarge { len: usize },

    #[error("advertiser transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
