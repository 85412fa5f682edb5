//! Post-build optimization for static site and application output.
//!
//! One pass over a build output directory:
//! - scans every JavaScript module for static imports (and optionally
//!   minifies it in place),
//! - adds a `<link rel="modulepreload">` to the head of every HTML page,
//! - writes a single aggregator module under the build metadata directory
//!   that imports every statically discovered module, so one hint per page
//!   primes the whole static module graph.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use modpreload_optimize::{Config, OptimizeOptions, run_optimize};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     root: Some(std::path::PathBuf::from("/path/to/dist")),
//!     config: None,
//!     options: OptimizeOptions { minify_js: true, ..Default::default() },
//! };
//!
//! let report = run_optimize(cfg)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! modpreload_optimize::print_report(&mut stdout, &report)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod emitter;
mod optimizer;
mod reporter;
#[cfg(test)]
mod testing;
mod transform;
mod types;

// Re-export public API
pub use config::{Config, OptimizeOptions};
pub use optimizer::{optimize, run_optimize};
pub use reporter::print_report;
pub use types::{FileOutcome, ModulePathSet, OptimizeReport};

pub use modpreload_core::{MinifierService, OxcMinifier};
