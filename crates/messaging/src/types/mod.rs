//! Shared types for the messaging core.

pub mod errors;
pub mod events;

pub use errors::{BrokerError, BrokerResult};
pub use events::BrokerEvent;
