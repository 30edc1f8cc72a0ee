//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Domain types
//! - `wire.rs`: Raw serde structs matching upstream responses (where there are any)
//! - `convert.rs`: `TryFrom` conversions with validation
//! - `client.rs`: Sub-client methods on top of the shared cache

pub mod correlation;
pub mod price_history;
