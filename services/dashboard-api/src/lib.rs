//! Climate dashboard API service library.
//!
//! Owns one dashboard session and exposes its events (upload, click, clear)
//! and views (table series, dataset summary, map cells, selected series) as
//! JSON over HTTP.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod state;
