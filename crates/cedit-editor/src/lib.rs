//! # cedit-editor — Editor core for cedit
//!
//! Everything above the terminal device:
//!
//! - **[`viewport`]** — screen bounds and the clamped cursor
//! - **[`rows`]** — `TextRow`, `Document`, and the single-line file loader
//! - **[`render`]** — composes a full frame into one output buffer
//! - **[`editor`]** — the render / read / apply loop and session wiring
//! - **[`options`]** — tunables with environment overrides

pub mod editor;
pub mod error;
pub mod options;
pub mod render;
pub mod rows;
pub mod viewport;

pub use error::{Error, Result};
