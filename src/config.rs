//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive the jukebox,
//! the tag mapping, and helpers to load both from disk.

mod load;
mod schema;
mod tags;

pub use load::*;
pub use schema::*;
pub use tags::*;
