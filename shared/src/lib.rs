//! Data model, slug generation, ingestion validation and storage shared by the
//! affiliate site backend, the operator CLI and the wasm frontend.
//!
//! Everything that touches a database or the process logger is compiled only
//! for native targets, so the frontend can depend on this crate for the model
//! types and [`slug::slugify`] alone.

pub mod ingest;
pub mod models;
pub mod slug;

#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod store;

pub use ingest::{NewPost, ReceivePostPayload, ValidationError, REQUIRED_FIELDS};
pub use models::{Post, PostStatus, Product, StoreStats, DEFAULT_CATEGORY};
pub use slug::slugify;
