//! Storehouse Core - Shared types library.
//!
//! This crate provides the types used across all Storehouse components:
//! - `api` - HTTP service over the MongoDB collections
//! - `cli` - Command-line tools for indexes, seeding and inspection
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Documents are handled as [`bson::Document`]
//! values, but nothing here talks to a store.
//!
//! # Modules
//!
//! - [`types`] - Identifier codec, typed ids, prices and enumerated fields
//! - [`models`] - Entity documents, create payloads and merge-patches
//! - [`normalize`] - Rewriting native ids into their string form
//! - [`validation`] - Field constraints for write payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub use bson;

pub mod models;
pub mod normalize;
pub mod types;
pub mod validation;

pub use models::Entity;
pub use normalize::{NormalizeError, into_entity, normalize};
pub use types::*;
pub use validation::{Validate, ValidationError};
