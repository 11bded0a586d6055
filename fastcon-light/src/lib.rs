//! Fastcon light entity.
//!
//! A light owns nothing but its mesh address and a handle to the controller
//! that broadcasts for it. State writes are translated into protocol
//! payloads by the controller and queued there; the entity itself stays a
//! thin addressable facade, the way the light subsystem expects.

// Core modules
pub mod error;
pub mod light;
pub mod state;
pub mod traits;

// Re-exports
pub use error::*;
pub use light::*;
pub use state::*;
pub use traits::*;
