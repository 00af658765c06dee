//! Ubermelon Core - Shared types library.
//!
//! This crate provides the domain types used by the Ubermelon storefront
//! (the server-rendered melon shop).
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no sessions, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for melon IDs, prices, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
