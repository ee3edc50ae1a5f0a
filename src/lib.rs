//! Fishing Cove library crate. Re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can import types, systems, and resources without needing a
//! window or GPU.

pub mod shared;
pub mod config;
pub mod cove;
pub mod host;
