//! neotoday library
//!
//! This module exposes the feed pipeline, cache, configuration and HTTP
//! surface for use by the binary and integration tests.

pub mod cache;
pub mod cli;
pub mod clock;
pub mod data;
pub mod server;
pub mod telemetry;
