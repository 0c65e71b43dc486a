//! Dataset upload API client.
//!
//! Async HTTP client for the `/files/upload` endpoint: one multipart
//! request per file with byte-level progress, plus the configuration
//! lookup that publishes the server's upload limits.

pub mod client;

pub use client::{Client, Error};
