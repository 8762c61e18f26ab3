use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "recstream",
    about = "Record-stream auditor — read, verify, and archive hash-chained record files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sweep a source directory: decode, chain-verify, and archive
    Sweep(SweepArgs),
    /// Chain-verify an explicit ordered list of files without moving them
    Verify(VerifyArgs),
    /// Decode one record file and show its contents
    Inspect(InspectArgs),
    /// Print a file's SHA-384 digest
    Hash(HashArgs),
    /// Print a file's declared previous-file hash
    PrevHash(PrevHashArgs),
}

#[derive(Args)]
pub struct SweepArgs {
    /// Source directory containing record files
    pub dir: PathBuf,
    /// Only process files with this extension (no leading dot)
    #[arg(long)]
    pub ext: Option<String>,
    /// Archive directory override (default: sibling parsedRecordFiles)
    #[arg(long)]
    pub archive_dir: Option<PathBuf>,
    /// Leave processed files in place
    #[arg(long)]
    pub keep: bool,
    /// Disable the record sink (decoded pairs are not logged)
    #[arg(long)]
    pub quiet_records: bool,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Record files in chain order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct HashArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct PrevHashArgs {
    pub file: PathBuf,
}
