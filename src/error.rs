//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror. The
//! content client converts every variant into a fallback response at its
//! boundary, but keeps them distinct here for logging and tests.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failure: connection refused, DNS, transport-level timeout.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered outside the 2xx range.
    #[error("HTTP error! status: {}", .status.as_u16())]
    Status { status: StatusCode, body: String },

    /// 2xx body that could not be decoded.
    #[error("Failed to parse backend response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
