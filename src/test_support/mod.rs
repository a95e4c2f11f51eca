//! Test utilities for Rigging unit tests.
//!
//! Provides on-disk workspace fixtures built in temporary directories.
//!
//! # Example
//!
//! ```rust,ignore
//! use rigging::test_support::WorkspaceFixture;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = WorkspaceFixture::shared_dependency(4)
//!         .with_override("runtime-mode = \"debug\"\n");
//!     let ws = fixture.workspace();
//!     // Resolve, plan...
//! }
//! ```

pub mod fixtures;

pub use fixtures::*;
