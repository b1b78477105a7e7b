//! The synchronization pipeline: scan the submodule tree, append one
//! `Compile` entry per discovered file to the manifest's first `ItemGroup`,
//! rewrite the manifest in place.

use crate::config::SyncConfig;
use crate::scan;
use crate::xml::{Document, Element};
use anyhow::Result;
use colored::*;

/// Default namespace of MSBuild project and shared-items files.
pub const MSBUILD_NS: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

/// Build-system macro that expands to the directory containing the manifest.
/// The leading backslash is part of the token as it appears in entries this
/// tool has always written.
pub const THIS_FILE_DIR: &str = "\\$(MSBuildThisFileDirectory)";

/// Appends a `<Compile Include="...">` entry to the manifest's first
/// `ItemGroup` for every source file currently under the submodule tree, then
/// rewrites the manifest in place.
///
/// Entries are appended without checking for existing ones: running the sync
/// twice against an unchanged tree duplicates every entry. A missing
/// submodule directory, a missing manifest, or a manifest without an
/// `ItemGroup` each print a diagnostic and leave the file untouched;
/// malformed XML and I/O failures propagate as errors.
pub fn sync_manifest(config: &SyncConfig) -> Result<()> {
    if !config.submodule_path.is_dir() {
        println!(
            "Submodule not found. No changes made to {}",
            config.manifest_path.display()
        );
        return Ok(());
    }

    let files = scan::collect_sources(&config.submodule_path, &config.extension);
    if config.verbose {
        println!(
            "{} Found {} matching file(s) under {}",
            "🔍".cyan(),
            files.len(),
            config.submodule_path.display()
        );
        for file in &files {
            println!("  {} {}", "+".green(), file.display());
        }
    }

    if !config.manifest_path.exists() {
        println!("Error: {} not found.", config.manifest_path.display());
        return Ok(());
    }

    let mut document = Document::load(&config.manifest_path)?;
    let item_group_tag = format!("{{{MSBUILD_NS}}}ItemGroup");
    let Some(group) = document.root.find_descendant_mut(&item_group_tag) else {
        println!("Error: <Compilation> tag not found in the .projitems file structure.");
        return Ok(());
    };

    for file in &files {
        let mut entry = Element::new("Compile");
        entry
            .attributes
            .push(("Include".to_string(), format!("{THIS_FILE_DIR}{}", file.display())));
        group.children.push(entry);
    }

    document.root.strip_namespaces();
    document.save(&config.manifest_path)?;

    println!("\nSubmodule files added to {}", config.manifest_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <Import_RootNamespace>Engine</Import_RootNamespace>
  </PropertyGroup>
  <ItemGroup>
    <Compile Include="$(MSBuildThisFileDirectory)Engine.cs" />
  </ItemGroup>
</Project>
"#;

    const MANIFEST_WITHOUT_ITEM_GROUP: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <Import_RootNamespace>Engine</Import_RootNamespace>
  </PropertyGroup>
</Project>
"#;

    fn config(submodule: &Path, manifest: &Path) -> SyncConfig {
        SyncConfig {
            submodule_path: submodule.to_path_buf(),
            manifest_path: manifest.to_path_buf(),
            extension: ".cs".to_string(),
            verbose: false,
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "// test").unwrap();
    }

    // Re-parsing the written manifest resolves the root's default namespace
    // again, so the lookups here use Clark-notation tags.
    fn item_group_entries(manifest: &Path) -> Vec<String> {
        let mut doc = Document::parse(&fs::read_to_string(manifest).unwrap()).unwrap();
        let group = doc
            .root
            .find_descendant_mut(&format!("{{{MSBUILD_NS}}}ItemGroup"))
            .expect("manifest should keep its ItemGroup");
        group
            .children
            .iter()
            .map(|child| {
                assert_eq!(child.tag, format!("{{{MSBUILD_NS}}}Compile"));
                child.attr("Include").unwrap().to_string()
            })
            .collect()
    }

    #[test]
    fn test_missing_submodule_leaves_manifest_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("Shared.projitems");
        fs::write(&manifest, MANIFEST).unwrap();

        sync_manifest(&config(&dir.path().join("no-such-dir"), &manifest)).unwrap();

        assert_eq!(fs::read_to_string(&manifest).unwrap(), MANIFEST);
    }

    #[test]
    fn test_missing_manifest_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let submodule = dir.path().join("sub");
        touch(&submodule.join("a.cs"));
        let manifest = dir.path().join("no-such.projitems");

        sync_manifest(&config(&submodule, &manifest)).unwrap();

        assert!(!manifest.exists());
    }

    #[test]
    fn test_manifest_without_item_group_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let submodule = dir.path().join("sub");
        touch(&submodule.join("a.cs"));
        let manifest = dir.path().join("Shared.projitems");
        fs::write(&manifest, MANIFEST_WITHOUT_ITEM_GROUP).unwrap();

        sync_manifest(&config(&submodule, &manifest)).unwrap();

        assert_eq!(
            fs::read_to_string(&manifest).unwrap(),
            MANIFEST_WITHOUT_ITEM_GROUP
        );
    }

    #[test]
    fn test_appends_one_entry_per_discovered_file() {
        let dir = tempfile::tempdir().unwrap();
        let submodule = dir.path().join("sub");
        touch(&submodule.join("a/x.cs"));
        touch(&submodule.join("b/y.cs"));
        touch(&submodule.join("b/readme.md"));
        let manifest = dir.path().join("Shared.projitems");
        fs::write(&manifest, MANIFEST).unwrap();

        sync_manifest(&config(&submodule, &manifest)).unwrap();

        let mut entries = item_group_entries(&manifest);
        entries.sort();
        let mut expected = vec![
            "$(MSBuildThisFileDirectory)Engine.cs".to_string(),
            format!("{THIS_FILE_DIR}{}", submodule.join("a/x.cs").display()),
            format!("{THIS_FILE_DIR}{}", submodule.join("b/y.cs").display()),
        ];
        expected.sort();
        assert_eq!(entries, expected);
    }

    #[test]
    fn test_appending_twice_duplicates_entries() {
        let dir = tempfile::tempdir().unwrap();
        let submodule = dir.path().join("sub");
        touch(&submodule.join("a/x.cs"));
        touch(&submodule.join("b/y.cs"));
        let manifest = dir.path().join("Shared.projitems");
        fs::write(&manifest, MANIFEST).unwrap();

        let config = config(&submodule, &manifest);
        sync_manifest(&config).unwrap();
        assert_eq!(item_group_entries(&manifest).len(), 3);

        // No deduplication: the same tree appends the same entries again.
        sync_manifest(&config).unwrap();
        assert_eq!(item_group_entries(&manifest).len(), 5);
    }

    #[test]
    fn test_output_uses_bare_tags_with_namespace_on_root_only() {
        let dir = tempfile::tempdir().unwrap();
        let submodule = dir.path().join("sub");
        touch(&submodule.join("a.cs"));
        let manifest = dir.path().join("Shared.projitems");
        fs::write(&manifest, MANIFEST).unwrap();

        sync_manifest(&config(&submodule, &manifest)).unwrap();

        let text = fs::read_to_string(&manifest).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(text.contains(&format!("<Project xmlns=\"{MSBUILD_NS}\">")));
        assert!(!text.contains("ns0:"));

        // Well-formed, and every element still resolves to the MSBuild
        // namespace through the root's default declaration.
        let doc = Document::parse(&text).unwrap();
        assert_eq!(doc.root.tag, format!("{{{MSBUILD_NS}}}Project"));
        assert_eq!(
            doc.root.children[1].tag,
            format!("{{{MSBUILD_NS}}}ItemGroup")
        );
    }

    #[test]
    fn test_malformed_manifest_propagates_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let submodule = dir.path().join("sub");
        touch(&submodule.join("a.cs"));
        let manifest = dir.path().join("Broken.projitems");
        fs::write(&manifest, "<Project><ItemGroup></Project>").unwrap();

        assert!(sync_manifest(&config(&submodule, &manifest)).is_err());
    }
}
