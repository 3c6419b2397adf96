//! Public facade crate for `tubescript`.
//!
//! No IO lives here. It re-exports the backend-agnostic types, traits and the lookup
//! pipeline from `tubescript-core`; network backends live in `tubescript-local`.

pub use tubescript_core::*;
