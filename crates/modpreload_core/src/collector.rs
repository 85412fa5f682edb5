use anyhow::{Context, Result};
use ignore::{WalkBuilder, overrides::OverrideBuilder};
use log::{debug, trace};
use std::path::{Path, PathBuf};

pub struct CollectorConfig {
    pub root: PathBuf,
    /// Build metadata directory, relative to `root`; never scanned
    pub metadata_dir: String,
    /// Extra gitignore-style globs, relative to `root`, to leave out
    pub exclude: Vec<String>,
}

/// Lists every regular file under the output root, minus exclusions.
///
/// No ignore files are honored: a build output directory is scanned in full,
/// hidden files included. The returned order is whatever the walker yields.
pub fn collect_files(cfg: &CollectorConfig) -> Result<Vec<PathBuf>> {
    let root = &cfg.root;
    debug!("Walking build output from root: {}", root.display());

    let mut overrides = OverrideBuilder::new(root);
    let metadata_glob = format!("!/{}", cfg.metadata_dir.trim_matches('/'));
    trace!("Excluding metadata directory with glob '{}'", metadata_glob);
    overrides
        .add(&metadata_glob)
        .with_context(|| format!("Invalid metadata directory '{}'", cfg.metadata_dir))?;
    for pattern in &cfg.exclude {
        trace!("Excluding glob '{}'", pattern);
        overrides
            .add(&format!("!{}", pattern))
            .with_context(|| format!("Invalid exclude pattern '{}'", pattern))?;
    }
    let overrides = overrides.build().context("Failed to build exclude patterns")?;

    let walker = WalkBuilder::new(root).standard_filters(false).overrides(overrides).build();

    let mut files: Vec<PathBuf> = Vec::new();
    for res in walker {
        let dent = res.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        trace!("Found file: {}", dent.path().display());
        files.push(dent.into_path());
    }

    debug!("Collected {} files", files.len());
    Ok(files)
}

/// Path of `file` relative to `root`, for display.
pub fn display_relative(root: &Path, file: &Path) -> String {
    file.strip_prefix(root).unwrap_or(file).to_string_lossy().to_string()
}
