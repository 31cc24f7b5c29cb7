//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the
//! `clap` crate: a handful of global options and one subcommand per toolkit
//! action, plus `defaults` for managing the persisted fastq-dump defaults.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

/// Command-line arguments for the `sra-desk` binary.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use sra_desk_cli::cli_args::Args;
///
/// let args = Args::parse_from(["sra-desk", "prefetch", "SRR000001"]);
/// assert!(args.defaults_path.is_none());
/// ```
#[derive(Parser, Debug)]
#[command(name = "sra-desk", version, about = "Run SRA Toolkit programs and watch their output")]
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the stored defaults YAML.
    ///
    /// If not provided, defaults to `~/.sra-desk/defaults.yml`.
    #[arg(long, short = 'd', global = true)]
    pub defaults_path: Option<String>,

    /// Write the log to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    /// Kill the command if it runs longer than this many seconds.
    ///
    /// If not provided, the limit is five minutes.
    #[arg(long, short = 't', global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Which sinks to print.
    #[arg(long, value_enum, default_value_t = View::Both, global = true)]
    pub view: View,

    /// Do not check that the toolkit is installed before running.
    #[arg(long, global = true, action)]
    pub skip_toolkit_check: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Raw tool output only.
    Output,
    /// Prefixed progress lines only.
    Progress,
    #[default]
    Both,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show or change the stored defaults.
    Defaults {
        #[command(subcommand)]
        action: DefaultsCommand,
    },
    #[command(flatten)]
    Tool(ToolCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum DefaultsCommand {
    /// Print the stored defaults.
    Show,
    /// Update one or more stored defaults.
    Set {
        #[arg(long)]
        gzip: Option<bool>,
        #[arg(long)]
        threads: Option<String>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ToolCommand {
    /// Download an accession.
    Prefetch { accession: String },
    /// Resolve the location of an accession.
    Srapath { accession: String },
    /// Download several accessions one after another.
    BatchPrefetch(BatchPrefetchArgs),
    /// Convert an SRA file to FASTQ.
    FastqDump(FastqDumpArgs),
    /// Load a BAM file into an SRA archive.
    BamLoad {
        input: String,
        #[arg(long, short = 'o')]
        output: String,
    },
    /// Dump the contents of an SRA file.
    VdbDump { file: String },
    /// Explain a toolkit return code.
    Rcexplain { file: String },
    /// Redact filtered reads.
    ReadFilterRedact { file: String },
    /// Open the interactive toolkit configuration.
    VdbConfig,
    /// Register an AWS credentials file with the toolkit.
    SetAwsCredentials { path: String },
    /// Register a GCP credentials file with the toolkit.
    SetGcpCredentials { path: String },
    /// Validate an SRA file.
    Validate { file: String },
    /// Copy a VDB object.
    VdbCopy { source: String, destination: String },
    /// Dump an SRA file in ABI format.
    AbiDump { file: String },
    /// Sort an SRA file.
    SraSort { file: String },
    /// Package a directory into a KAR archive.
    Kar {
        directory: String,
        #[arg(long, short = 'o')]
        output: String,
    },
}

#[derive(ClapArgs, Debug, PartialEq, Eq)]
pub struct BatchPrefetchArgs {
    /// Accessions to download.
    pub accessions: Vec<String>,

    /// Read further accessions from this file, one per line.
    #[arg(long, short = 'f')]
    pub file: Option<String>,
}

#[derive(ClapArgs, Debug, PartialEq, Eq)]
pub struct FastqDumpArgs {
    pub file: String,

    /// Compress the output (overrides the stored default).
    #[arg(long, action)]
    pub gzip: bool,

    /// Do not compress the output (overrides the stored default).
    #[arg(long, action, conflicts_with = "gzip")]
    pub no_gzip: bool,

    /// Thread count (overrides the stored default).
    #[arg(long)]
    pub threads: Option<String>,
}
