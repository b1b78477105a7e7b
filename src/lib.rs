//! # projsync - Shared project-items manifest synchronizer
//!
//! projsync scans a submodule directory tree for source files and registers
//! each one as a `<Compile Include="...">` entry in a shared MSBuild
//! `.projitems` manifest, so that every project importing the manifest picks
//! up the submodule's sources.
//!
//! ## Quick Start
//!
//! ```bash
//! # Flags...
//! projsync --submodule-path Submodules/Engine --proj-items-path Shared.projitems
//!
//! # ...or the equivalent environment variables
//! submodule_path=Submodules/Engine proj_items_path=Shared.projitems projsync
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Run configuration resolved once at startup
//! - [`scan`] - Source-file discovery under the submodule tree
//! - [`xml`] - Owned XML element tree (parse, locate, transform, serialize)
//! - [`sync`] - The synchronization pipeline

/// Run configuration resolved from flags and environment.
pub mod config;

/// Source-file discovery under the submodule tree.
pub mod scan;

/// Manifest synchronization pipeline.
pub mod sync;

/// Owned XML element tree: parse, locate, transform, serialize.
pub mod xml;
