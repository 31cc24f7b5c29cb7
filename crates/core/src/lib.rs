//! SRA Desk Core Library
//!
//! This crate provides the core of sra-desk, a front-end that launches and
//! supervises the SRA Toolkit command-line programs (prefetch, fastq-dump,
//! vdb-dump, bam-load, sra-validator, vdb-config, ...).
//!
//! # Key Features
//!
//! - **Process Runner**: spawn one tool at a time, stream stdout/stderr line by line, enforce a timeout
//! - **Cancellation**: forcibly stop the tracked process on request
//! - **Command Dispatch**: validate user input and build argument vectors from templates
//! - **Batch Fetch**: run one prefetch per accession, sequentially, tolerating failures
//! - **Display Events**: all output and status changes flow over one channel to a single consumer
//! - **Persisted Defaults**: gzip and thread-count defaults stored as YAML
//!
//! # Examples
//!
//! Running a validated action and applying its events:
//!
//! ```no_run
//! use sra_desk_core::config::RunnerConfig;
//! use sra_desk_core::dispatch::{dispatch, Action, Dispatched};
//! use sra_desk_core::event::{Event, EventSender};
//! use sra_desk_core::frontend::{Frontend, MemoryFrontend};
//! use sra_desk_core::process::ProcessRunner;
//!
//! # async fn run() -> sra_desk_core::error::Result<()> {
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let runner = ProcessRunner::new(EventSender::new(tx), RunnerConfig::default());
//!
//! let Dispatched::Stream(id) =
//!     dispatch(&Action::Prefetch { accession: "SRR000001".to_string() }, &runner)?
//! else {
//!     unreachable!("prefetch is streamed");
//! };
//!
//! let mut frontend = MemoryFrontend::default();
//! while let Some(event) = rx.recv().await {
//!     let done = matches!(event, Event::Finished { run, .. } if run == id);
//!     frontend.apply(event);
//!     if done {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod command_definitions;
pub mod command_line;
pub mod config;
pub mod defaults;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod frontend;
pub mod interpolation;
pub mod process;
pub mod sink;
pub mod status;
pub mod toolkit;
