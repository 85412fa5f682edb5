use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser};
use log::{debug, info};
use modpreload_core::DEFAULT_METADATA_DIR;
use serde::{Deserialize, Deserializer};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

const DEFAULT_ROOT: &str = "dist";

#[derive(Debug, Clone, Parser)]
#[command(name = "optimize")]
#[command(about = "Minify scripts and preload the static module graph of a build output")]
pub struct Config {
    /// Build output directory to optimize (defaults to ./dist)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// JSON file with optimize options (exclude, minifyJS, minifyCSS, minifyHTML, metadataDir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptimizeOptions,
}

/// Options for one optimization pass.
///
/// `minify_css` and `minify_html` are accepted so existing configurations
/// keep loading, but neither has any effect.
#[derive(Debug, Clone, PartialEq, Eq, Args, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeOptions {
    /// Glob pattern to exclude, relative to the root (repeatable)
    #[arg(long, value_name = "GLOB")]
    #[serde(deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,

    /// Minify JavaScript modules in place
    #[arg(long)]
    #[serde(rename = "minifyJS")]
    pub minify_js: bool,

    /// Reserved, currently has no effect
    #[arg(long)]
    #[serde(rename = "minifyCSS")]
    pub minify_css: bool,

    /// Reserved, currently has no effect
    #[arg(long)]
    #[serde(rename = "minifyHTML")]
    pub minify_html: bool,

    /// Build metadata directory, relative to the root; excluded from the scan
    #[arg(long, default_value = DEFAULT_METADATA_DIR)]
    #[serde(rename = "metadataDir")]
    pub metadata_dir: String,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            minify_js: false,
            minify_css: false,
            minify_html: false,
            metadata_dir: DEFAULT_METADATA_DIR.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

impl OptimizeOptions {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        debug!("Reading optimize options from {}", path.display());
        let txt = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&txt)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Folds options loaded from a file into these (command line) options.
    ///
    /// Flags set on either side stay set, exclude lists are concatenated, and
    /// an explicit `--metadata-dir` beats the file's `metadataDir`.
    pub fn merge(&mut self, file: OptimizeOptions) {
        let mut exclude = file.exclude;
        exclude.append(&mut self.exclude);
        self.exclude = exclude;
        self.minify_js |= file.minify_js;
        self.minify_css |= file.minify_css;
        self.minify_html |= file.minify_html;
        if self.metadata_dir == DEFAULT_METADATA_DIR {
            self.metadata_dir = file.metadata_dir;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let dir = Path::new(&self.metadata_dir);
        if self.metadata_dir.trim().is_empty() {
            bail!("metadataDir must not be empty");
        }
        if dir.components().any(|c| !matches!(c, Component::Normal(_))) {
            bail!("metadataDir must be a plain relative path, got '{}'", self.metadata_dir);
        }
        Ok(())
    }
}

impl Config {
    /// Initialize the config by resolving the root directory and loading the options file
    pub fn initialize(&mut self) -> Result<()> {
        let root = self.root.take().unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        debug!("Using provided root directory: {:?}", root);
        let root = root
            .canonicalize()
            .with_context(|| format!("Build output directory {} not found", root.display()))?;
        if !root.is_dir() {
            bail!("Build output root {} is not a directory", root.display());
        }
        info!("Using root directory: {}", root.display());

        if let Some(path) = &self.config {
            let file_options = OptimizeOptions::from_json_file(path)?;
            self.options.merge(file_options);
        }
        self.options.validate()?;

        if self.options.minify_css {
            debug!("minifyCSS is set but CSS minification is not supported; ignoring");
        }
        if self.options.minify_html {
            debug!("minifyHTML is set but HTML minification is not supported; ignoring");
        }

        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }
}
