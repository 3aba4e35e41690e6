//! Cache module for keeping normalized feeds in memory
//!
//! This module provides a small cache keyed by calendar date and time zone.
//! Entries expire a fixed time after they are written, and the number of keys
//! is bounded with least-recently-used eviction, so repeated requests for the
//! same day do not re-hit the upstream API.

mod manager;

pub use manager::{CacheSettings, TodayCache, DEFAULT_MAX_SIZE, DEFAULT_TTL};
