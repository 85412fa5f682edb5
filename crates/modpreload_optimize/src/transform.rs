use anyhow::{Context, Result};
use log::{debug, trace};
use modpreload_core::{
    FileCategory, MinifierService, extract_imports, inject_into_head, modulepreload_link,
    relative_reference, resolve, source_type_for,
};
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use crate::types::{FileOutcome, ModulePathSet};

/// Everything a single file visit needs, shared by all workers of a pass.
pub(crate) struct TransformContext<'a> {
    pub(crate) root: &'a Path,
    pub(crate) aggregator: &'a Path,
    pub(crate) modules: &'a ModulePathSet,
    pub(crate) minifier: &'a dyn MinifierService,
    pub(crate) minify_js: bool,
}

/// Optimizes one file in place according to its category.
pub(crate) fn transform_file(file: &Path, ctx: &TransformContext) -> Result<FileOutcome> {
    let category = FileCategory::classify(file);
    trace!("Classified {} as {:?}", file.display(), category);

    match category {
        FileCategory::Stylesheet => Ok(FileOutcome::StylesheetSkipped),
        FileCategory::Script => transform_script(file, ctx),
        FileCategory::Markup => transform_markup(file, ctx),
        FileCategory::Other => Ok(FileOutcome::Untouched),
    }
}

fn transform_script(file: &Path, ctx: &TransformContext) -> Result<FileOutcome> {
    let src = read(file)
        .with_context(|| format!("Failed to load {} for import extraction", file.display()))?;
    let source_type = source_type_for(file);

    let imports = extract_imports(&src, source_type)
        .with_context(|| format!("Failed to extract imports from {}", file.display()))?;

    let mut static_imports = 0;
    for import in imports.iter().filter(|i| i.is_static()) {
        let Some(request) = &import.specifier else { continue };
        if let Some(resolved) = resolve(ctx.root, file, request) {
            static_imports += 1;
            if ctx.modules.insert(resolved) {
                trace!("New module from {}: '{}'", file.display(), request);
            }
        }
    }
    debug!("{} has {} static imports", file.display(), static_imports);

    if !ctx.minify_js {
        return Ok(FileOutcome::Script { static_imports, minified: false });
    }

    let minified = ctx
        .minifier
        .minify(&src, source_type)
        .with_context(|| format!("Failed to minify {}", file.display()))?;
    write(file, &minified)
        .with_context(|| format!("Failed to write minified output to {}", file.display()))?;
    debug!("Minified {} ({} -> {} bytes)", file.display(), src.len(), minified.len());

    Ok(FileOutcome::Script { static_imports, minified: true })
}

fn transform_markup(file: &Path, ctx: &TransformContext) -> Result<FileOutcome> {
    let html = read(file)
        .with_context(|| format!("Failed to load {} for hint injection", file.display()))?;

    let dir = file.parent().unwrap_or(ctx.root);
    let href = relative_reference(dir, ctx.aggregator)
        .with_context(|| format!("Failed to inject preload hint into {}", file.display()))?;
    let link = modulepreload_link(&href);

    if html.contains(&link) {
        debug!("{} already preloads {}", file.display(), href);
        return Ok(FileOutcome::MarkupUnchanged);
    }

    match inject_into_head(&html, &link) {
        Some(updated) => {
            write(file, &updated)
                .with_context(|| format!("Failed to write preload hint into {}", file.display()))?;
            debug!("Injected modulepreload hint into {}", file.display());
            Ok(FileOutcome::MarkupHinted)
        }
        None => {
            debug!("No </head> in {}, leaving it unchanged", file.display());
            Ok(FileOutcome::MarkupUnchanged)
        }
    }
}

fn read(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

/// Overwrites `file` and waits for the data to reach the disk.
fn write(file: &Path, contents: &str) -> Result<()> {
    let mut f =
        File::create(file).with_context(|| format!("Failed to write {}", file.display()))?;
    f.write_all(contents.as_bytes())
        .and_then(|_| f.sync_all())
        .with_context(|| format!("Failed to write {}", file.display()))
}
