//! Client for the GENESIS fitness coaching backend
//!
//! Sends user prompts, with optional image attachments, to the backend chat
//! endpoint and always hands back a renderable response, substituting a
//! localized error banner when the backend cannot be reached.

pub mod api;
pub mod config;
pub mod error;
pub mod mime;
pub mod models;

pub use error::{Error, Result};
