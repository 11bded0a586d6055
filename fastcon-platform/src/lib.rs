//! Configuration and wiring layer for the Fastcon engine.
//!
//! This crate is the bridge between a user's declarative configuration and
//! the running component graph. It owns:
//!
//! - the raw configuration schema (`schema`),
//! - validation of every record before any side effect (`validation`),
//! - the component/light registries and lifecycle (`registry`),
//! - the wiring pass that instantiates lights, registers them, and binds
//!   each one to its controller (`generate`).
//!
//! Configuration mistakes (a light address outside 1..=255, a reference to
//! an undeclared controller, a duplicate id) are surfaced to the author
//! here, with the offending field named, before anything is constructed.

// Core modules
pub mod error;
pub mod generate;
pub mod registry;
pub mod schema;
pub mod validation;

// Re-exports
pub use error::*;
pub use generate::*;
pub use registry::*;
pub use schema::*;
pub use validation::*;
