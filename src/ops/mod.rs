//! High-level operations.
//!
//! This module contains the implementation of Rigging commands.

pub mod compose;

pub use compose::{compose, compose_workspace, ComposeOptions, Composition};
