use anyhow::{Context, Result};
use log::{debug, trace};
use modpreload_core::relative_reference;
use std::{fs, path::Path};

use crate::types::ModulePathSet;

/// Writes the preload aggregator: one bare `import` per discovered module.
///
/// Modules are ordered by their absolute path, so the same set always
/// produces the same file no matter in which order scripts were visited.
/// Returns the number of import lines written.
pub(crate) fn emit_aggregator(dest: &Path, modules: ModulePathSet) -> Result<usize> {
    let dir = dest.parent().unwrap_or(Path::new("."));
    let paths = modules.into_sorted();
    debug!("Emitting {} modules to {}", paths.len(), dest.display());

    let mut content = String::new();
    for path in &paths {
        let reference = relative_reference(dir, path)
            .with_context(|| format!("Failed to reference {} from aggregator", path.display()))?;
        trace!("Aggregating {}", reference);
        content.push_str(&format!("import '{}';\n", escape_single_quoted(&reference)));
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create metadata directory {}", dir.display()))?;
    fs::write(dest, content)
        .with_context(|| format!("Failed to write aggregator {}", dest.display()))?;
    Ok(paths.len())
}

fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn set_of(paths: &[PathBuf]) -> ModulePathSet {
        let set = ModulePathSet::new();
        for p in paths {
            set.insert(p.clone());
        }
        set
    }

    #[test]
    fn test_emit_sorted_relative_imports() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let dest = root.join("_meta").join("module-preload.mjs");
        let modules = set_of(&[
            root.join("util.js"),
            root.join("assets/chunk-b.js"),
            root.join("assets/chunk-a.js"),
        ]);

        assert_eq!(emit_aggregator(&dest, modules).unwrap(), 3);
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "import '../assets/chunk-a.js';\nimport '../assets/chunk-b.js';\nimport '../util.js';\n"
        );
    }

    #[test]
    fn test_emit_is_independent_of_insertion_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let paths: Vec<PathBuf> =
            ["z.js", "a.js", "m/n.js", "m-n.js"].iter().map(|p| root.join(p)).collect();
        let mut reversed = paths.clone();
        reversed.reverse();

        let first = root.join("_meta/first.mjs");
        let second = root.join("_meta/second.mjs");
        emit_aggregator(&first, set_of(&paths)).unwrap();
        emit_aggregator(&second, set_of(&reversed)).unwrap();
        assert_eq!(fs::read_to_string(first).unwrap(), fs::read_to_string(second).unwrap());
    }

    #[test]
    fn test_emit_empty_set() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("_meta").join("module-preload.mjs");

        assert_eq!(emit_aggregator(&dest, ModulePathSet::new()).unwrap(), 0);
        assert!(dest.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "");
    }

    #[test]
    fn test_emit_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let dest = root.join("module-preload.mjs");
        fs::write(&dest, "import './stale.js';\nimport './older.js';\n").unwrap();

        emit_aggregator(&dest, set_of(&[root.join("fresh.js")])).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "import './fresh.js';\n");
    }

    #[test]
    fn test_escape_single_quoted() {
        assert_eq!(escape_single_quoted("./it's.js"), "./it\\'s.js");
        assert_eq!(escape_single_quoted("./plain.js"), "./plain.js");
    }
}
