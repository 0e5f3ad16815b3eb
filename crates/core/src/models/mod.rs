//! Entity models for the four document collections.
//!
//! Each entity has three shapes:
//!
//! - the stored document as returned to clients (`Customer`, `Order`, ...),
//!   tolerant of missing fields because the store does not enforce a schema
//! - a create payload (`NewCustomer`, ...) with required fields
//! - a merge-patch payload (`CustomerPatch`, ...) built from [`Patch`] fields
//!
//! References to other collections are plain strings in the payloads. They
//! are decoded into native identifiers by the linker before a write, never by
//! serde, so a malformed reference is reported as an identifier error.

use serde::de::DeserializeOwned;

pub mod address;
pub mod customer;
pub mod order;
pub mod patch;
pub mod product;

pub use address::{Address, AddressPatch, NewAddress};
pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderPatch};
pub use patch::Patch;
pub use product::{NewProduct, Product, ProductPatch};

/// A document type stored in its own collection.
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    /// Collection the documents live in.
    const COLLECTION: &'static str;
    /// Singular name used in log lines and error messages.
    const NAME: &'static str;
}
