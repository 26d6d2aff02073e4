use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "unamdify.json";
pub const DEFAULT_EXTENSIONS: &[&str] = &["js"];

/// Contents of `unamdify.json`. Paths are relative to the file's directory.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UnamdifyConfig {
    #[serde(default)]
    pub files: Option<Vec<String>>,
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

/// Where transformed output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Concatenate every output to stdout, in input order.
    Stdout,
    /// Mirror inputs under a directory.
    OutDir(PathBuf),
    /// Overwrite inputs.
    InPlace,
    /// Transform only.
    Check,
}

/// CLI arguments merged over the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub files: Vec<PathBuf>,
    pub output: OutputMode,
    pub extensions: Vec<String>,
}

pub fn parse_config(source: &str) -> Result<UnamdifyConfig> {
    serde_json::from_str(source).context("invalid unamdify configuration")
}

pub fn load_config(path: &Path) -> Result<UnamdifyConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// `unamdify.json` in `dir`, if present.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Merge CLI arguments over the configuration file. CLI values win.
pub fn resolve_options(args: &CliArgs, cwd: &Path) -> Result<ResolvedOptions> {
    let config_path = match &args.config {
        Some(path) => Some(cwd.join(path)),
        None => find_config(cwd),
    };
    let (config, base_dir) = match config_path {
        Some(path) => {
            let config = load_config(&path)?;
            let base_dir = path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
            (config, base_dir)
        }
        None => (UnamdifyConfig::default(), cwd.to_path_buf()),
    };

    let files = if !args.files.is_empty() {
        args.files.iter().map(|file| cwd.join(file)).collect()
    } else {
        config
            .files
            .iter()
            .flatten()
            .map(|file| base_dir.join(file))
            .collect()
    };

    let output = if args.check {
        OutputMode::Check
    } else if args.write {
        OutputMode::InPlace
    } else if let Some(out_dir) = &args.out_dir {
        OutputMode::OutDir(cwd.join(out_dir))
    } else if let Some(out_dir) = &config.out_dir {
        OutputMode::OutDir(base_dir.join(out_dir))
    } else {
        OutputMode::Stdout
    };

    let extensions = args
        .extensions
        .clone()
        .or(config.extensions)
        .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect())
        .iter()
        .map(|ext| normalize_extension(ext))
        .filter(|ext| !ext.is_empty())
        .collect();

    Ok(ResolvedOptions {
        files,
        output,
        extensions,
    })
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}
