//! # framescribe common library
//!
//! Shared code for the framescribe workspace:
//! - Wire types of the video-analysis event stream (StreamEvent enum)
//! - Enrichment request/response types
//! - Configuration loading (TOML bootstrap, logging)
//! - Timestamp formatting

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;

pub use error::{Error, Result};
