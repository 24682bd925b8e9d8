//! Adapters implementing the outbound ports

pub mod time;

pub use time::{SteppingTimeSource, SystemTimeSource};
