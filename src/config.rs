use std::path::PathBuf;

/// Configuration for one synchronization run, built once in `main` and passed
/// explicitly down the pipeline.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory tree to scan for source files.
    pub submodule_path: PathBuf,
    /// The `.projitems` manifest to rewrite in place.
    pub manifest_path: PathBuf,
    /// Case-sensitive file-name suffix that marks a source file.
    pub extension: String,
    /// Print each discovered file before rewriting the manifest.
    pub verbose: bool,
}
