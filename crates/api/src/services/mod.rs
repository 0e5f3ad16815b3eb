//! Business logic layered over the document store.
//!
//! - [`linker`] - Decoding cross-collection references before writes
//! - [`composer`] - Composite customer views

pub mod composer;
pub mod linker;

pub use composer::{AggregationComposer, CustomerBundle};
pub use linker::{
    Link, LinkError, ReferencePolicy, References, ReferentialLinker, link_customer, link_items,
};
