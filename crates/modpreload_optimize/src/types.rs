use dashmap::DashSet;
use std::path::PathBuf;

/// Absolute module paths discovered across all scripts of one pass.
///
/// Safe to insert into from any number of worker threads; inserting a path
/// that is already present is a no-op.
#[derive(Debug, Default)]
pub struct ModulePathSet {
    paths: DashSet<PathBuf>,
}

impl ModulePathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the path was not yet present.
    pub fn insert(&self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, path: &std::path::Path) -> bool {
        self.paths.contains(path)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.paths.len()
    }

    /// Consumes the set, returning its paths sorted byte-wise.
    pub fn into_sorted(self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.paths.into_iter().collect();
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        paths
    }
}

/// What happened to a single file during the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    StylesheetSkipped,
    Script { static_imports: usize, minified: bool },
    MarkupHinted,
    /// A document with no `</head>`, or one already carrying the hint
    MarkupUnchanged,
    Untouched,
}

#[derive(Debug, Clone, Default)]
pub struct OptimizeReport {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub stylesheets: usize,
    pub scripts: usize,
    pub scripts_minified: usize,
    pub pages_hinted: usize,
    pub pages_unchanged: usize,
    pub other_files: usize,
    /// Number of import lines written to the aggregator
    pub modules_preloaded: usize,
    pub aggregator_path: PathBuf,
}

impl OptimizeReport {
    pub(crate) fn record(&mut self, outcome: FileOutcome) {
        self.files_scanned += 1;
        match outcome {
            FileOutcome::StylesheetSkipped => self.stylesheets += 1,
            FileOutcome::Script { minified, .. } => {
                self.scripts += 1;
                if minified {
                    self.scripts_minified += 1;
                }
            }
            FileOutcome::MarkupHinted => self.pages_hinted += 1,
            FileOutcome::MarkupUnchanged => self.pages_unchanged += 1,
            FileOutcome::Untouched => self.other_files += 1,
        }
    }
}
