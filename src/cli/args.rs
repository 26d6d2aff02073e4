use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the unamdify binary.
#[derive(Parser, Debug)]
#[command(
    name = "unamdify",
    version,
    about = "Rewrite AMD define()/require() modules as CommonJS modules"
)]
pub struct CliArgs {
    // ==================== Output ====================
    /// Write each transformed file under this directory, mirroring input paths.
    #[arg(short = 'o', long = "outDir", alias = "out-dir", conflicts_with = "write")]
    pub out_dir: Option<PathBuf>,

    /// Overwrite each input file with its transformed source.
    #[arg(short = 'w', long)]
    pub write: bool,

    /// Transform every input but write nothing; exit status reports failures.
    #[arg(long, conflicts_with_all = ["write", "out_dir"])]
    pub check: bool,

    // ==================== Inputs ====================
    /// Path to an unamdify.json configuration file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// File extensions picked up when expanding directories.
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    // ==================== Diagnostics ====================
    /// Colorize error output. Defaults to on when stderr is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Files or directories to transform. Reads stdin when empty.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}
