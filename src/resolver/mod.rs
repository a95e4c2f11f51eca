//! Project graph resolution.
//!
//! Turns the root's member list into a [`BuildGraph`] of shared
//! [`ProjectNode`]s. Resolution is pure with respect to the filesystem: all
//! descriptors are discovered and parsed before it starts.

mod cycle;
pub mod errors;
pub mod graph;
mod memo;
pub mod node;
pub mod require;

pub use errors::{ErrorKind, ResolveError};
pub use graph::BuildGraph;
pub use node::ProjectNode;
pub use require::Resolver;
