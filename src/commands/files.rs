//! Reading and writing tree files and edit scripts.
//!
//! Files ending in `.json` are JSON; everything else is YAML.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::menu::MenuTree;
use crate::ports::filesystem::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Reads and parses a YAML or JSON document.
pub(crate) fn read_document<T: DeserializeOwned>(fs: &dyn FileSystem, path: &Path) -> Result<T, String> {
    let content =
        fs.read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    match Format::of(path) {
        Format::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
    }
    .map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

/// Reads a tree file. Invariants are not checked here.
pub(crate) fn read_tree(fs: &dyn FileSystem, path: &Path) -> Result<MenuTree, String> {
    read_document(fs, path)
}

/// Serializes a value in the format `path` calls for.
pub(crate) fn render<T: Serialize>(value: &T, path: &Path) -> Result<String, String> {
    match Format::of(path) {
        Format::Json => serde_json::to_string_pretty(value).map(|json| json + "\n").map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
    }
    .map_err(|e| format!("Failed to serialize {}: {e}", path.display()))
}

/// Writes `tree` to `path`, or prints it as YAML when there is no path.
pub(crate) fn write_tree(fs: &dyn FileSystem, path: Option<&Path>, tree: &MenuTree) -> Result<(), String> {
    match path {
        Some(path) => {
            let text = render(tree, path)?;
            fs.write(path, &text).map_err(|e| format!("Failed to write {}: {e}", path.display()))
        }
        None => {
            let yaml = serde_yaml::to_string(tree).map_err(|e| format!("Failed to serialize tree: {e}"))?;
            print!("{yaml}");
            Ok(())
        }
    }
}
