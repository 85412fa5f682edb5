use anyhow::{Context, Result};
use log::{debug, info, warn};
use modpreload_core::{
    AGGREGATOR_FILE_NAME, CollectorConfig, MinifierGuard, MinifierService, OxcMinifier,
    collect_files, display_relative,
};
use rayon::prelude::*;
use std::{
    path::{Path, PathBuf},
    thread,
};

use crate::{
    config::{Config, OptimizeOptions},
    emitter::emit_aggregator,
    transform::{TransformContext, transform_file},
    types::{FileOutcome, ModulePathSet, OptimizeReport},
};

pub fn run_optimize(mut cfg: Config) -> Result<OptimizeReport> {
    info!("Starting build output optimization");

    // Initialize config (resolve root, load options file)
    cfg.initialize()?;
    let root = cfg.root()?.clone();

    let mut minifier = OxcMinifier::new();
    optimize(&root, &cfg.options, &mut minifier)
}

/// Runs one full pass over `root` with the given minifier service.
///
/// The service is started before any file is visited and stopped after the
/// aggregator is written, or as soon as the pass fails.
pub fn optimize(
    root: &Path,
    options: &OptimizeOptions,
    minifier: &mut dyn MinifierService,
) -> Result<OptimizeReport> {
    let aggregator = root.join(&options.metadata_dir).join(AGGREGATOR_FILE_NAME);
    debug!("Aggregator destination: {}", aggregator.display());

    let service = MinifierGuard::start(minifier).context("Failed to start minifier service")?;
    let report = optimize_files(root, options, aggregator, &*service)?;
    service.finish().context("Failed to stop minifier service")?;

    info!(
        "Optimization complete: {} files, {} modules preloaded",
        report.files_scanned, report.modules_preloaded
    );
    Ok(report)
}

fn optimize_files(
    root: &Path,
    options: &OptimizeOptions,
    aggregator: PathBuf,
    minifier: &dyn MinifierService,
) -> Result<OptimizeReport> {
    let collector_cfg = CollectorConfig {
        root: root.to_path_buf(),
        metadata_dir: options.metadata_dir.clone(),
        exclude: options.exclude.clone(),
    };
    let files = collect_files(&collector_cfg)?;
    info!("Found {} files under {}", files.len(), root.display());

    let modules = ModulePathSet::new();
    let ctx = TransformContext {
        root,
        aggregator: &aggregator,
        modules: &modules,
        minifier,
        minify_js: options.minify_js,
    };

    info!("Processing {} files in parallel", files.len());

    // collect() only returns once every file has been visited, so nothing can
    // add to `modules` after this point
    let results: Vec<(&PathBuf, Result<FileOutcome>)> = files
        .par_iter()
        .map(|file| {
            let thread_id = thread::current().id();
            debug!("Thread {:?} processing: {}", thread_id, file.display());
            (file, transform_file(file, &ctx))
        })
        .collect();

    let mut report = OptimizeReport::default();
    let mut failures = Vec::new();
    for (file, result) in results {
        match result {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                warn!("Error optimizing {}: {:#}", display_relative(root, file), e);
                failures.push(e);
            }
        }
    }

    if !failures.is_empty() {
        let failed = failures.len();
        let first = failures.swap_remove(0);
        let summary = format!("{} of {} files failed to optimize", failed, files.len());
        return Err(first.context(summary));
    }

    report.modules_preloaded = emit_aggregator(&aggregator, modules)?;
    report.aggregator_path = aggregator;
    report.root = root.to_path_buf();
    Ok(report)
}
