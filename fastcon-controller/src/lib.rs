//! Fastcon BLE controller.
//!
//! The controller is the single component that talks to the radio. Lights
//! hand it encoded state changes; it queues them and drains the queue
//! through a broadcast duty cycle (advertise, stop, gap), pushing each
//! frame to a pluggable [`BleAdvertiser`] transport.
//!
//! Command encoding (headers, sequence numbers, mesh-key encryption) also
//! lives here, on top of the framing primitives in `fastcon-protocol`.

// Core modules
pub mod advertiser;
pub mod controller;
pub mod error;
pub mod types;

// Re-exports
pub use advertiser::*;
pub use controller::*;
pub use error::*;
pub use types::*;
