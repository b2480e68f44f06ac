//! Core types and pure functions for gigdash.
//!
//! Everything in this crate is free of I/O: record and snapshot types,
//! data-source and cache traits, and the derivation functions that turn raw
//! records into dashboard roll-ups. The `gigdash` crate provides the adapters,
//! the cache implementation and the HTTP surface on top of it.

pub mod cache;
pub mod clock;
pub mod derive;
pub mod records;
pub mod serde;
pub mod snapshot;
pub mod sources;
pub mod subject;
