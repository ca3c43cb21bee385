//! Data models for the linkage engine

pub mod record;

pub use record::{NameView, Record};
