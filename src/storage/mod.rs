//! Storage layer for persisted filter mappings.
//!
//! Filter stores persist one JSON text blob per namespace through the
//! [`KeyValueStorage`] capability. Backends only move text around; encoding
//! and decoding the filter mapping is the store's job.
//!
//! # Modules
//!
//! - `backend`: The storage capability trait
//! - `memory`: Shared in-memory backend
//! - `json`: JSON file backend with atomic writes

pub mod backend;
pub mod json;
pub mod memory;

pub use backend::KeyValueStorage;
pub use json::JsonFileStorage;
pub use memory::MemoryStorage;
