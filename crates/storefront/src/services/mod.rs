//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Customer login against the customer directory

pub mod auth;
