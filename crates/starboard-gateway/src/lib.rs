//! # starboard-gateway
//!
//! Discord gateway client and REST adapter driving the reaction engine.

pub mod bot;
pub mod connection;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod rest;

pub use bot::{create_engine, run};
