//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for identifiers, money, and the
//! small enums every product view shares.

pub mod id;
pub mod lenient;
pub mod price;
pub mod status;

pub use id::*;
pub use price::Money;
pub use status::*;
