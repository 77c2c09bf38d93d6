//! Gateway connection lifecycle

mod client;
mod session;

pub use client::{GatewayClient, GatewayError, GatewaySettings};
pub use session::SessionState;
