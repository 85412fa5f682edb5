//! Constants for file classification and the generated artifacts.
//!
//! Extensions are matched case-sensitively against the canonical lowercase
//! form emitted by build tools.

/// Extensions handled as stylesheets (currently passed through untouched)
pub const STYLESHEET_EXTENSIONS: &[&str] = &["css"];

/// Extensions handled as JavaScript modules
pub const SCRIPT_EXTENSIONS: &[&str] = &[
    "js",  // JavaScript
    "mjs", // JavaScript module
];

/// Extensions handled as HTML documents
pub const MARKUP_EXTENSIONS: &[&str] = &["html"];

/// Name of the synthesized module that imports every discovered dependency
pub const AGGREGATOR_FILE_NAME: &str = "module-preload.mjs";

/// Build metadata directory used when none is configured
pub const DEFAULT_METADATA_DIR: &str = "_meta";

/// Specifier prefixes that point at non-filesystem resources
pub const URL_SCHEMES: &[&str] = &["http:", "https:", "data:", "blob:", "file:", "node:"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_tables_are_disjoint() {
        for ext in SCRIPT_EXTENSIONS {
            assert!(!STYLESHEET_EXTENSIONS.contains(ext));
            assert!(!MARKUP_EXTENSIONS.contains(ext));
        }
        for ext in STYLESHEET_EXTENSIONS {
            assert!(!MARKUP_EXTENSIONS.contains(ext));
        }
    }

    #[test]
    fn test_aggregator_is_a_module_file() {
        // The aggregator must itself be loadable as an ES module
        assert!(AGGREGATOR_FILE_NAME.ends_with(".mjs"));
    }
}
