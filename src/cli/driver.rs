use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, info_span};
use walkdir::WalkDir;

use crate::cli::config::{OutputMode, ResolvedOptions};
use crate::cli::reporter::Reporter;
use crate::stream::{StreamError, TransformStream, transform_reader};
use crate::transforms::TransformStats;

/// A file to transform and the directory its output path is relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TransformedFile {
    pub code: String,
    pub stats: TransformStats,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files_transformed: usize,
    pub failures: usize,
    pub call_sites_rewritten: usize,
    pub exports_rewritten: usize,
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }

    fn record(&mut self, stats: TransformStats) {
        self.files_transformed += 1;
        self.call_sites_rewritten += stats.call_sites_rewritten;
        self.exports_rewritten += stats.exports_rewritten;
    }
}

/// Expand directories (recursively, sorted by name) and keep explicit files
/// as given. Directory entries are filtered by extension; explicit files are not.
pub fn collect_inputs(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<InputFile>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry =
                    entry.with_context(|| format!("failed to walk {}", path.display()))?;
                if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                    inputs.push(InputFile {
                        path: entry.into_path(),
                        root: path.clone(),
                    });
                }
            }
        } else if path.is_file() {
            let root = path.parent().map_or_else(PathBuf::new, Path::to_path_buf);
            inputs.push(InputFile {
                path: path.clone(),
                root,
            });
        } else {
            bail!("input not found: {}", path.display());
        }
    }
    Ok(inputs)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}

/// Read and transform one file. All-or-nothing.
pub fn transform_file(path: &Path) -> Result<TransformedFile, StreamError> {
    let bytes = std::fs::read(path)?;
    let mut stream = TransformStream::new();
    stream.write(&bytes);
    let (code, stats) = stream.end_with_stats()?;
    Ok(TransformedFile { code, stats })
}

/// Transform every input and deliver the outputs per `options.output`.
///
/// Files are transformed in parallel; outputs and failures are reported in
/// input order. A file that fails produces no output, the rest still do.
pub fn run<W: Write, E: Write>(
    options: &ResolvedOptions,
    reporter: &Reporter,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<RunSummary> {
    let inputs = collect_inputs(&options.files, &options.extensions)?;
    let results: Vec<Result<TransformedFile, StreamError>> = inputs
        .par_iter()
        .map(|input| {
            let span = info_span!("transform_file", path = %input.path.display());
            let _guard = span.enter();
            transform_file(&input.path)
        })
        .collect();

    let mut summary = RunSummary::default();
    let count = inputs.len();
    for (position, (input, result)) in inputs.iter().zip(results).enumerate() {
        let transformed = match result {
            Ok(transformed) => transformed,
            Err(err) => {
                summary.failures += 1;
                writeln!(stderr, "{}", reporter.format_failure(&input.path, &err))?;
                continue;
            }
        };
        summary.record(transformed.stats);

        match &options.output {
            OutputMode::Stdout => {
                stdout.write_all(transformed.code.as_bytes())?;
                if position + 1 < count && !transformed.code.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
            }
            OutputMode::OutDir(out_dir) => {
                let relative = input
                    .path
                    .strip_prefix(&input.root)
                    .unwrap_or(input.path.as_path());
                let target = out_dir.join(relative);
                write_output(&target, &transformed.code)?;
                summary.written.push(target);
            }
            OutputMode::InPlace => {
                write_output(&input.path, &transformed.code)?;
                summary.written.push(input.path.clone());
            }
            OutputMode::Check => {}
        }
    }
    stdout.flush()?;

    info!(
        files = summary.files_transformed,
        failures = summary.failures,
        call_sites = summary.call_sites_rewritten,
        exports = summary.exports_rewritten,
        "transform run complete"
    );
    Ok(summary)
}

/// Stream `reader` through the transform into `writer`. I/O failures are
/// fatal; a source that does not parse is reported like a failing file.
pub fn run_stdin<R: Read, W: Write, E: Write>(
    reader: R,
    writer: &mut W,
    reporter: &Reporter,
    stderr: &mut E,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    match transform_reader(reader, writer) {
        Ok(stats) => summary.record(stats),
        Err(StreamError::Io(err)) => return Err(err).context("failed to stream stdin"),
        Err(err) => {
            summary.failures += 1;
            writeln!(stderr, "{}", reporter.format_failure(Path::new("<stdin>"), &err))?;
        }
    }
    Ok(summary)
}

fn write_output(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, code).with_context(|| format!("failed to write {}", path.display()))
}
