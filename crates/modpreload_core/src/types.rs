use std::path::Path;

use crate::constants::{MARKUP_EXTENSIONS, SCRIPT_EXTENSIONS, STYLESHEET_EXTENSIONS};

/// A single import found in a JavaScript source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpan {
    /// The module request, `None` when a dynamic import's source is not a string literal
    pub specifier: Option<String>,
    pub kind: ImportKind,
    /// Byte offsets of the whole statement or expression in the source text
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Static,
    Dynamic,
}

impl ImportSpan {
    pub fn is_static(&self) -> bool {
        self.kind == ImportKind::Static
    }
}

/// Category of an emitted file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Stylesheet,
    Script,
    Markup,
    /// Anything we do not know how to optimize; left byte-for-byte untouched
    Other,
}

impl FileCategory {
    pub fn classify(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if STYLESHEET_EXTENSIONS.contains(&ext) => FileCategory::Stylesheet,
            Some(ext) if SCRIPT_EXTENSIONS.contains(&ext) => FileCategory::Script,
            Some(ext) if MARKUP_EXTENSIONS.contains(&ext) => FileCategory::Markup,
            _ => FileCategory::Other,
        }
    }
}
