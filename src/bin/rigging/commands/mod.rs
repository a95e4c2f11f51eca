//! Command implementations

pub mod plan;
pub mod resolve;
pub mod toolset;
pub mod tree;
