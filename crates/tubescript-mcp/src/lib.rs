//! `tubescript-mcp` crate (library surface).
//!
//! The primary entrypoint for end users is the `tubescript` binary (CLI + MCP stdio).
//! This library module exists so embedders can reach the core types and the local
//! backends without depending on internal crate layout.

pub use tubescript_core as core;
pub use tubescript_local as local;
