//! Core data structures for Rigging.
//!
//! - Project names and target descriptors
//! - Toolset identity and global option sets
//! - Descriptor files, discovery registry and the workspace

pub mod descriptor;
pub mod name;
pub mod options;
pub mod registry;
pub mod target;
pub mod toolset;
pub mod workspace;

pub use descriptor::{DescriptorFile, ProjectManifest, RootManifest, PROJECT_DESCRIPTOR, ROOT_DESCRIPTOR};
pub use name::ProjectName;
pub use options::{BuildOption, CppStandard, OptionSet};
pub use registry::{ProjectEntry, Registry};
pub use target::{TargetDescriptor, TargetKind};
pub use toolset::{current_toolset, Toolset, ToolsetId, ToolsetProbe};
pub use workspace::{find_root_manifest, Workspace};
