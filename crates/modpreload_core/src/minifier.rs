//! The JavaScript minification service.
//!
//! A [`MinifierService`] is started once per optimization pass, shared by all
//! worker threads while files are transformed, and stopped once at the end.
//! [`MinifierGuard`] ties the stop to scope exit so that an early return on a
//! failed transform cannot leave the service running.

use anyhow::{Result, anyhow, bail};
use log::{debug, trace, warn};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::ops::Deref;

pub trait MinifierService: Send + Sync {
    fn start(&mut self) -> Result<()>;

    /// Returns the minified form of `src`. Must be callable concurrently.
    fn minify(&self, src: &str, source_type: SourceType) -> Result<String>;

    fn stop(&mut self) -> Result<()>;
}

/// In-process minifier backed by the oxc compressor, mangler and codegen.
#[derive(Debug, Default)]
pub struct OxcMinifier {
    running: bool,
}

impl OxcMinifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MinifierService for OxcMinifier {
    fn start(&mut self) -> Result<()> {
        if self.running {
            bail!("Minifier service already started");
        }
        debug!("Starting oxc minifier service");
        self.running = true;
        Ok(())
    }

    fn minify(&self, src: &str, source_type: SourceType) -> Result<String> {
        if !self.running {
            bail!("Minifier service is not running");
        }

        let allocator = Allocator::default();
        let ParserReturn { mut program, errors, panicked, .. } =
            OxcParser::new(&allocator, src, source_type).parse();
        if panicked || !errors.is_empty() {
            let first =
                errors.first().map(|e| e.to_string()).unwrap_or_else(|| "parser aborted".into());
            return Err(anyhow!("Cannot minify source with syntax errors: {}", first));
        }

        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::default()),
        };
        let ret = Minifier::new(options).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions::minify())
            .with_scoping(ret.scoping)
            .build(&program)
            .code;

        trace!("Minified {} bytes to {} bytes", src.len(), code.len());
        Ok(code)
    }

    fn stop(&mut self) -> Result<()> {
        if !self.running {
            bail!("Minifier service was not started");
        }
        debug!("Stopping oxc minifier service");
        self.running = false;
        Ok(())
    }
}

/// A started [`MinifierService`] that is stopped when the guard goes away.
pub struct MinifierGuard<'a, S: MinifierService + ?Sized> {
    service: &'a mut S,
    stopped: bool,
}

impl<'a, S: MinifierService + ?Sized> MinifierGuard<'a, S> {
    pub fn start(service: &'a mut S) -> Result<Self> {
        service.start()?;
        Ok(Self { service, stopped: false })
    }

    /// Stops the service and reports whether that succeeded.
    pub fn finish(mut self) -> Result<()> {
        self.stopped = true;
        self.service.stop()
    }
}

impl<S: MinifierService + ?Sized> Deref for MinifierGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.service
    }
}

impl<S: MinifierService + ?Sized> Drop for MinifierGuard<'_, S> {
    fn drop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            if let Err(e) = self.service.stop() {
                warn!("Failed to stop minifier service: {}", e);
            }
        }
    }
}
