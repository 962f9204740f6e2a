//! ## Crate layout
//! - `core`: the unit-of-work runtime — containers, relation collections,
//!   virtual end points, eager fetching, and the storage boundary.
//!
//! The `prelude` module mirrors the runtime surface used inside transaction
//! code.

pub use ferndb_core as core;

pub use ferndb_core::prelude;
