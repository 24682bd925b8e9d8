//! Hexagonal architecture ports

pub mod inbound;
pub mod outbound;

pub use inbound::MedicalRecordsApi;
pub use outbound::TimeSource;
