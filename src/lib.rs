// ============================================
// src/lib.rs
// Library root

pub mod app;
pub mod audit;
pub mod bank;
pub mod cache;
pub mod config;
pub mod context;
pub mod contract;
pub mod engine;
pub mod error;
pub mod genesis;
pub mod ledger;
pub mod msg;
pub mod params;
pub mod peg;
pub mod query;
pub mod state;
pub mod statistics;

pub use crate::app::BridgeApp;
pub use crate::engine::BridgeEngine;
pub use crate::error::{BridgeError, ErrorKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
