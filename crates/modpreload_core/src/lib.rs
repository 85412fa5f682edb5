//! Building blocks for the modpreload build-output optimizer.
//!
//! This crate holds the leaf services the optimization pass is assembled from:
//! - Enumerating the files of a build output directory, with exclusions
//! - Classifying files by extension
//! - Extracting static and dynamic imports from JavaScript modules
//! - Resolving import requests to paths inside the output
//! - Computing relative references between output files
//! - Injecting markup into an HTML document head
//! - The JavaScript minifier service and its scoped lifecycle guard

mod collector;
mod constants;
mod html;
mod minifier;
mod parser;
mod paths;
mod resolver;
mod types;

// Re-export public API
pub use collector::{CollectorConfig, collect_files, display_relative};
pub use constants::{
    AGGREGATOR_FILE_NAME, DEFAULT_METADATA_DIR, MARKUP_EXTENSIONS, SCRIPT_EXTENSIONS,
    STYLESHEET_EXTENSIONS,
};
pub use html::{inject_into_head, modulepreload_link};
pub use minifier::{MinifierGuard, MinifierService, OxcMinifier};
pub use parser::{extract_imports, source_type_for};
pub use paths::relative_reference;
pub use resolver::resolve;
pub use types::{FileCategory, ImportKind, ImportSpan};

// Callers implementing `MinifierService` need the source type it is handed
pub use oxc_span::SourceType;
