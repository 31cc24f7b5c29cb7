//! Maps parsed subcommands onto dispatcher actions.

use std::fs;

use log::debug;
use sra_desk_core::defaults::Defaults;
use sra_desk_core::dispatch::Action;
use sra_desk_core::error::{Error, Result};

use crate::cli_args::{BatchPrefetchArgs, FastqDumpArgs, ToolCommand};

/// Builds the action for `command`.
///
/// Flags given on the command line win over the stored `defaults`. Input is
/// passed through as typed; blank values are rejected later by the dispatcher.
///
/// # Errors
///
/// Returns an error if a batch accession file cannot be read.
pub fn to_action(command: ToolCommand, defaults: &Defaults) -> Result<Action> {
    Ok(match command {
        ToolCommand::Prefetch { accession } => Action::Prefetch { accession },
        ToolCommand::Srapath { accession } => Action::SraPath { accession },
        ToolCommand::BatchPrefetch(batch) => Action::BatchPrefetch {
            accessions: batch_accessions(batch)?,
        },
        ToolCommand::FastqDump(fastq) => fastq_dump(fastq, defaults),
        ToolCommand::BamLoad { input, output } => Action::BamLoad { input, output },
        ToolCommand::VdbDump { file } => Action::VdbDump { file },
        ToolCommand::Rcexplain { file } => Action::RcExplain { file },
        ToolCommand::ReadFilterRedact { file } => Action::ReadFilterRedact { file },
        ToolCommand::VdbConfig => Action::VdbConfig,
        ToolCommand::SetAwsCredentials { path } => Action::SetAwsCredentials { path },
        ToolCommand::SetGcpCredentials { path } => Action::SetGcpCredentials { path },
        ToolCommand::Validate { file } => Action::Validate { file },
        ToolCommand::VdbCopy {
            source,
            destination,
        } => Action::VdbCopy {
            source,
            destination,
        },
        ToolCommand::AbiDump { file } => Action::AbiDump { file },
        ToolCommand::SraSort { file } => Action::SraSort { file },
        ToolCommand::Kar { directory, output } => Action::Kar { directory, output },
    })
}

fn fastq_dump(fastq: FastqDumpArgs, defaults: &Defaults) -> Action {
    let gzip = if fastq.gzip {
        true
    } else if fastq.no_gzip {
        false
    } else {
        defaults.gzip
    };

    Action::FastqDump {
        file: fastq.file,
        gzip,
        threads: fastq.threads.unwrap_or_else(|| defaults.threads.clone()),
    }
}

/// Joins command-line accessions and the optional file into one text block.
fn batch_accessions(batch: BatchPrefetchArgs) -> Result<String> {
    let mut lines = batch.accessions;

    if let Some(path) = batch.file {
        let contents = fs::read_to_string(&path)
            .map_err(|e| Error::io_error("accession list".to_string(), path.clone(), e))?;
        debug!("Read {} line(s) from `{path}`", contents.lines().count());
        lines.extend(contents.lines().map(ToString::to_string));
    }

    Ok(lines.join("\n"))
}
