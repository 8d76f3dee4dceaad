//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores for state small enough to persist
//! as a single JSON document.

pub mod json_file_store;
