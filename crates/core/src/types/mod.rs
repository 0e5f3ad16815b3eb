//! Core types for Storehouse.
//!
//! This module provides type-safe wrappers for identifiers, prices and
//! enumerated fields.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::Price;
pub use status::*;
