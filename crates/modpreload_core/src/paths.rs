use anyhow::{Result, anyhow};
use log::trace;
use std::path::{Component, Path, PathBuf};

/// Builds a URL-style reference to `target` as seen from the directory `base`.
///
/// The result always starts with `./` or `../` and uses `/` separators, so it
/// can be dropped straight into an `import` specifier or an `href`.
pub fn relative_reference(base: &Path, target: &Path) -> Result<String> {
    let rel = make_relative(target, base).ok_or_else(|| {
        anyhow!("Cannot reference {} from {}", target.display(), base.display())
    })?;

    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(p) => Some(p.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();

    let joined = parts.join("/");
    let reference = if joined.is_empty() {
        ".".to_string()
    } else if parts.first().is_some_and(|p| p == "..") {
        joined
    } else {
        format!("./{}", joined)
    };
    trace!("Relative reference from {} to {}: {}", base.display(), target.display(), reference);
    Ok(reference)
}

/// Create a relative path from `base` to `target`
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut target_components = target.components();
    let mut base_components = base.components();

    let mut common_prefix_len = 0;
    let mut target_parts = Vec::new();
    let mut base_parts = Vec::new();

    // Find common prefix
    loop {
        match (target_components.next(), base_components.next()) {
            (Some(t), Some(b)) if t == b => {
                common_prefix_len += 1;
            }
            (Some(t), Some(b)) => {
                target_parts.push(t);
                base_parts.push(b);
                break;
            }
            (Some(t), None) => {
                target_parts.push(t);
                break;
            }
            (None, Some(b)) => {
                base_parts.push(b);
                break;
            }
            (None, None) => break,
        }
    }

    target_parts.extend(target_components);
    base_parts.extend(base_components);

    // Paths on different roots (or drives) have no relative form
    if common_prefix_len == 0 && (target.has_root() || base.has_root()) {
        return None;
    }

    let mut result = PathBuf::new();
    for component in base_parts {
        match component {
            Component::CurDir => {}
            _ => result.push(".."),
        }
    }
    for component in target_parts {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Some(result)
}
