//! Test doubles shared by the pipeline tests.

use anyhow::{Result, bail};
use modpreload_core::{MinifierService, SourceType};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

/// Sources containing this marker make [`StubMinifier::minify`] fail.
pub(crate) const FAIL_MARKER: &str = "FAIL_MINIFY";

/// Collapses whitespace instead of really minifying, and counts lifecycle calls.
#[derive(Debug, Default)]
pub(crate) struct StubMinifier {
    pub(crate) starts: usize,
    pub(crate) stops: usize,
    pub(crate) running: bool,
    pub(crate) calls: AtomicUsize,
    pub(crate) fail_stop: bool,
}

impl StubMinifier {
    pub(crate) fn running() -> Self {
        Self { running: true, ..Self::default() }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MinifierService for StubMinifier {
    fn start(&mut self) -> Result<()> {
        self.starts += 1;
        self.running = true;
        Ok(())
    }

    fn minify(&self, src: &str, _source_type: SourceType) -> Result<String> {
        if !self.running {
            bail!("stub minifier used while stopped");
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if src.contains(FAIL_MARKER) {
            bail!("stub minifier rejected input");
        }
        Ok(src.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    fn stop(&mut self) -> Result<()> {
        self.stops += 1;
        self.running = false;
        if self.fail_stop {
            bail!("stub minifier failed to stop");
        }
        Ok(())
    }
}

pub(crate) fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
    let file_path = dir.join(path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&file_path, content).expect("Failed to write test file");
    file_path
}
