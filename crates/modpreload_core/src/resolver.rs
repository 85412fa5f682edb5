use log::trace;
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::constants::URL_SCHEMES;

/// Resolves an import request to an absolute path inside the build output.
///
/// Every request that is not a URL is treated as a path: relative and bare
/// requests resolve against the importing file's directory, root-absolute
/// requests (`/assets/x.js`) against the output root. Returns `None` for URLs.
pub fn resolve(root: &Path, from_file: &Path, request: &str) -> Option<PathBuf> {
    if is_url(request) {
        trace!("Skipping URL import '{}' in {}", request, from_file.display());
        return None;
    }

    let base = if let Some(rooted) = request.strip_prefix('/') {
        root.join(rooted)
    } else {
        from_file.parent().unwrap_or(root).join(request)
    };

    let resolved = clean(base);
    trace!("Resolved '{}' from {} to {}", request, from_file.display(), resolved.display());
    Some(resolved)
}

fn is_url(request: &str) -> bool {
    let lower = request.to_ascii_lowercase();
    URL_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) || request.starts_with("//")
}
