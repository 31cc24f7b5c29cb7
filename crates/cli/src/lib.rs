//! SRA Desk CLI Library
//!
//! This crate provides the terminal front-end for sra-desk. It parses the
//! command line, turns a subcommand into a dispatcher action and renders the
//! runner's events on the console.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`actions`]: Mapping subcommands (plus stored defaults) onto actions
//! - [`console`]: A [`Frontend`](sra_desk_core::frontend::Frontend) printing to stdout/stderr
//! - [`follow`]: Event loops for streamed runs and batches
//!
//! # Examples
//!
//! ```bash
//! # Download one accession
//! sra-desk prefetch SRR000001
//!
//! # Several accessions, some from a file, only the progress lines
//! sra-desk --view progress batch-prefetch SRR000001 SRR000002 --file more.txt
//!
//! # Convert with the stored defaults, but force gzip
//! sra-desk fastq-dump ~/ncbi/SRR000001.sra --gzip
//!
//! # Change the stored defaults
//! sra-desk defaults set --threads 4
//! ```

pub mod actions;
pub mod cli_args;
pub mod console;
pub mod follow;
