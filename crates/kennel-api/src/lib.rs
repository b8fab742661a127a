// kennel-api: Async Rust client for the kennel dog-record store API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::RecordClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
