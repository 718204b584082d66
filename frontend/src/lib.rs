//! Data layer of the affiliate review SPA: typed fetches against the read
//! API, Yew hooks that expose loading/error state, and the client-side catalog
//! helpers the pages render from.
//!
//! Build with the `demo` feature to let fetches fall back to bundled sample
//! reviews when the API is down; results then carry
//! [`api::DataSource::Sample`] so pages can show a banner instead of passing
//! sample content off as live data.

pub mod api;
pub mod catalog;
pub mod config;
pub mod hooks;

#[cfg(feature = "demo")]
pub mod sample_data;
