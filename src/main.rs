//! # projsync CLI Entry Point
//!
//! Parses CLI arguments using clap and hands a `SyncConfig` to the
//! synchronization pipeline. Both path arguments can come from the
//! environment instead (`submodule_path`, `proj_items_path`), which is how
//! build scripts usually drive the tool.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use projsync::config::SyncConfig;
use projsync::sync;

#[derive(Parser)]
#[command(name = "projsync")]
#[command(about = "Sync a shared .projitems manifest with a submodule's source files", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Submodule directory to scan for source files
    #[arg(long, value_name = "DIR", env = "submodule_path")]
    submodule_path: PathBuf,

    /// Path of the .projitems manifest to rewrite
    #[arg(long, value_name = "FILE", env = "proj_items_path")]
    proj_items_path: PathBuf,

    /// File-name suffix that marks a source file (case-sensitive)
    #[arg(long, value_name = "SUFFIX", default_value = ".cs")]
    extension: String,

    /// List discovered files before rewriting the manifest
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SyncConfig {
        submodule_path: cli.submodule_path,
        manifest_path: cli.proj_items_path,
        extension: cli.extension,
        verbose: cli.verbose,
    };

    sync::sync_manifest(&config)
}
