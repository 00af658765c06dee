//! In-memory data stores for the storefront.
//!
//! Both stores are built once at startup and are read-only afterwards:
//!
//! - [`Catalog`] - Melons for sale
//! - [`CustomerDirectory`] - Customers who may log in
//!
//! Each can be loaded from a pipe-delimited text file or fall back to a
//! built-in data set.

pub mod catalog;
pub mod customers;
mod records;

pub use catalog::{Catalog, CatalogError};
pub use customers::{CustomerDirectory, DirectoryError};
