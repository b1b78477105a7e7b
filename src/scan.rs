use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects every regular file under `root` whose file name ends with
/// `suffix`.
///
/// The match is case-sensitive and a plain suffix check on the file name, so
/// `.cs` also picks up generated files like `Foo.g.cs`. Paths come back
/// rooted at `root`, in traversal order; no sorting is applied. Symlinked
/// directories are not followed.
pub fn collect_sources(root: &Path, suffix: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(suffix))
        .map(|e| e.into_path())
        .collect()
}
