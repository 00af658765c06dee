//! Core types for Ubermelon.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{MelonId, MelonIdError};
pub use price::{CurrencyCode, Price, PriceError};
