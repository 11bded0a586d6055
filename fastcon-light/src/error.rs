use thiserror::Error;

#[derive(Error, Debug)]
pub enum LightError {
    #[error("no controller bound for light {light_id}")]
    ControllerNotBound { light_id: u8 },
}

pub type Result<T> = std::result::Result<T, LightError>;
