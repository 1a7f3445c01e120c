//! HTTP request handlers for the dashboard API.

pub mod dataset;
pub mod error;
pub mod grid;
pub mod health;
pub mod table;

pub use error::{ApiError, ApiResult};
