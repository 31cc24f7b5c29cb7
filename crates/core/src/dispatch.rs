//! Turns user actions into command lines and routes them to the right runner.
//!
//! Building is pure: every free-text field is trimmed and must be non-empty,
//! otherwise [`Error::MissingInput`] is returned and nothing is spawned.

use std::collections::HashMap;

use log::info;

use crate::command_definitions::{
    ToolDefinition, ABI_DUMP, BAM_LOAD, FASTQ_DUMP, KAR, PREFETCH, RCEXPLAIN, READ_FILTER_REDACT,
    SET_AWS_CREDENTIALS, SET_GCP_CREDENTIALS, SRAPATH, SRA_SORT, SRA_VALIDATOR, VDB_CONFIG,
    VDB_COPY, VDB_DUMP,
};
use crate::command_line::CommandLine;
use crate::error::{Error, Result};
use crate::event::{EventSender, RunTargets, SinkId};
use crate::interpolation::{get_templates, interpolate_command};
use crate::process::{spawn_batch, BatchItem, BatchReport, ProcessRunner, RunId};

/// One user-triggered operation with its raw (untrimmed) inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Prefetch { accession: String },
    SraPath { accession: String },
    /// One accession per line; blank lines are skipped.
    BatchPrefetch { accessions: String },
    FastqDump { file: String, gzip: bool, threads: String },
    BamLoad { input: String, output: String },
    VdbDump { file: String },
    RcExplain { file: String },
    ReadFilterRedact { file: String },
    VdbConfig,
    SetAwsCredentials { path: String },
    SetGcpCredentials { path: String },
    Validate { file: String },
    VdbCopy { source: String, destination: String },
    AbiDump { file: String },
    SraSort { file: String },
    Kar { directory: String, output: String },
}

/// A fully built, validated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Stream {
        command: CommandLine,
        targets: RunTargets,
        status: String,
    },
    Batch {
        items: Vec<BatchItem>,
        sink: SinkId,
    },
}

/// What a dispatch started.
#[derive(Debug)]
pub enum Dispatched {
    Stream(RunId),
    Batch(tokio::task::JoinHandle<BatchReport>),
}

impl Action {
    pub fn tool(&self) -> ToolDefinition {
        match self {
            Action::Prefetch { .. } | Action::BatchPrefetch { .. } => PREFETCH,
            Action::SraPath { .. } => SRAPATH,
            Action::FastqDump { .. } => FASTQ_DUMP,
            Action::BamLoad { .. } => BAM_LOAD,
            Action::VdbDump { .. } => VDB_DUMP,
            Action::RcExplain { .. } => RCEXPLAIN,
            Action::ReadFilterRedact { .. } => READ_FILTER_REDACT,
            Action::VdbConfig => VDB_CONFIG,
            Action::SetAwsCredentials { .. } => SET_AWS_CREDENTIALS,
            Action::SetGcpCredentials { .. } => SET_GCP_CREDENTIALS,
            Action::Validate { .. } => SRA_VALIDATOR,
            Action::VdbCopy { .. } => VDB_COPY,
            Action::AbiDump { .. } => ABI_DUMP,
            Action::SraSort { .. } => SRA_SORT,
            Action::Kar { .. } => KAR,
        }
    }

    /// Raw field values keyed like the tool's placeholders.
    fn inputs(&self) -> Vec<(&'static str, &str)> {
        match self {
            Action::Prefetch { accession } | Action::SraPath { accession } => {
                vec![("accession", accession.as_str())]
            }
            Action::BatchPrefetch { accessions } => vec![("accession", accessions.as_str())],
            Action::FastqDump { file, .. }
            | Action::VdbDump { file }
            | Action::RcExplain { file }
            | Action::ReadFilterRedact { file }
            | Action::Validate { file }
            | Action::AbiDump { file }
            | Action::SraSort { file } => vec![("file", file.as_str())],
            Action::BamLoad { input, output } => {
                vec![("input", input.as_str()), ("output", output.as_str())]
            }
            Action::VdbConfig => vec![],
            Action::SetAwsCredentials { path } | Action::SetGcpCredentials { path } => {
                vec![("path", path.as_str())]
            }
            Action::VdbCopy {
                source,
                destination,
            } => vec![("source", source.as_str()), ("destination", destination.as_str())],
            Action::Kar { directory, output } => {
                vec![("directory", directory.as_str()), ("output", output.as_str())]
            }
        }
    }

    /// Optional flags slotted between the fixed arguments and the trailing ones.
    fn options(&self) -> Vec<String> {
        let mut options = Vec::new();

        if let Action::FastqDump { gzip, threads, .. } = self {
            if *gzip {
                options.push("--gzip".to_string());
            }
            let threads = threads.trim();
            if !threads.is_empty() {
                options.push("--threads".to_string());
                options.push(threads.to_string());
            }
        }

        options
    }

    /// Validates the inputs and builds what should run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInput`] for the first blank field, in the
    /// order the tool declares them.
    pub fn plan(&self) -> Result<Plan> {
        let tool = self.tool();
        let context = validated_context(&tool, &self.inputs())?;

        if let Action::BatchPrefetch { accessions } = self {
            let items = accessions
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|accession| {
                    let context = HashMap::from([("accession".to_string(), accession.to_string())]);
                    Ok(BatchItem {
                        label: accession.to_string(),
                        command: build_command(&tool, &[], &context)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            return Ok(Plan::Batch {
                items,
                sink: SinkId::output(tool.pane),
            });
        }

        Ok(Plan::Stream {
            command: build_command(&tool, &self.options(), &context)?,
            targets: tool.pane.targets(tool.progress),
            status: tool.status_text(),
        })
    }
}

/// Plans `action` and hands it to the runner, or to a batch task.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Validation errors, and [`Error::AlreadyRunning`] from the runner.
pub fn dispatch(action: &Action, runner: &ProcessRunner) -> Result<Dispatched> {
    dispatch_plan(action.plan()?, runner)
}

pub fn dispatch_plan(plan: Plan, runner: &ProcessRunner) -> Result<Dispatched> {
    match plan {
        Plan::Stream {
            command,
            targets,
            status,
        } => {
            if !runner.is_idle() {
                return Err(Error::AlreadyRunning);
            }
            runner.events().status(status);
            runner.start(command, targets).map(Dispatched::Stream)
        }
        Plan::Batch { items, sink } => {
            info!("Starting batch of {} item(s)", items.len());
            Ok(Dispatched::Batch(spawn_batch(
                items,
                sink,
                EventSender::clone(runner.events()),
            )))
        }
    }
}

fn validated_context(
    tool: &ToolDefinition,
    inputs: &[(&'static str, &str)],
) -> Result<HashMap<String, String>> {
    let mut context = HashMap::new();

    for field in tool.fields {
        let value = inputs
            .iter()
            .find(|(key, _)| *key == field.key)
            .map(|(_, value)| value.trim())
            .unwrap_or_default();

        if value.is_empty() {
            return Err(Error::missing_input(field.prompt));
        }

        context.insert(field.key.to_string(), value.to_string());
    }

    Ok(context)
}

fn build_command(
    tool: &ToolDefinition,
    options: &[String],
    context: &HashMap<String, String>,
) -> Result<CommandLine> {
    let leading = interpolate_command(context, &get_templates(tool.command)?)?;
    let trailing = interpolate_command(context, &get_templates(tool.trailing)?)?;

    CommandLine::new(
        leading
            .into_iter()
            .chain(options.iter().cloned())
            .chain(trailing),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Pane, SinkKind};

    fn arguments(action: &Action) -> Vec<String> {
        match action.plan().unwrap() {
            Plan::Stream { command, .. } => command.arguments().to_vec(),
            Plan::Batch { .. } => panic!("Expected a streamed plan"),
        }
    }

    #[test]
    fn test_prefetch_command() {
        let action = Action::Prefetch {
            accession: "  SRR000001 ".to_string(),
        };
        assert_eq!(arguments(&action), ["prefetch", "--progress", "SRR000001"]);
    }

    #[test]
    fn test_srapath_command() {
        let action = Action::SraPath {
            accession: "SRR000001".to_string(),
        };
        assert_eq!(arguments(&action), ["srapath", "SRR000001"]);
    }

    #[test]
    fn test_fastq_dump_with_options() {
        let action = Action::FastqDump {
            file: "/data/SRR1.sra".to_string(),
            gzip: true,
            threads: "4".to_string(),
        };
        assert_eq!(
            arguments(&action),
            ["fastq-dump", "--progress", "--gzip", "--threads", "4", "/data/SRR1.sra"]
        );
    }

    #[test]
    fn test_fastq_dump_without_options() {
        let action = Action::FastqDump {
            file: "/data/SRR1.sra".to_string(),
            gzip: false,
            threads: "  ".to_string(),
        };
        assert_eq!(arguments(&action), ["fastq-dump", "--progress", "/data/SRR1.sra"]);
    }

    #[test]
    fn test_bam_load_command() {
        let action = Action::BamLoad {
            input: "in.bam".to_string(),
            output: "out.sra".to_string(),
        };
        assert_eq!(arguments(&action), ["bam-load", "-o", "out.sra", "in.bam"]);
    }

    #[test]
    fn test_bam_load_reports_input_first() {
        let action = Action::BamLoad {
            input: " ".to_string(),
            output: String::new(),
        };
        let error = action.plan().unwrap_err();
        assert_eq!(error.to_string(), "Please enter the BAM file path.");
    }

    #[test]
    fn test_credentials_commands() {
        let aws = Action::SetAwsCredentials {
            path: "~/.aws/credentials".to_string(),
        };
        let gcp = Action::SetGcpCredentials {
            path: "/keys/gcp.json".to_string(),
        };
        assert_eq!(
            arguments(&aws),
            ["vdb-config", "--set-aws-credentials", "~/.aws/credentials"]
        );
        assert_eq!(
            arguments(&gcp),
            ["vdb-config", "--set-gcp-credentials", "/keys/gcp.json"]
        );
    }

    #[test]
    fn test_vdb_config_needs_no_input() {
        assert_eq!(arguments(&Action::VdbConfig), ["vdb-config", "-i"]);
    }

    #[test]
    fn test_kar_command() {
        let action = Action::Kar {
            directory: "run_dir".to_string(),
            output: "run.kar".to_string(),
        };
        assert_eq!(arguments(&action), ["kar", "create", "-o", "run.kar", "run_dir"]);
    }

    #[test]
    fn test_value_with_braces_is_not_a_template() {
        let action = Action::VdbDump {
            file: "weird{name}.sra".to_string(),
        };
        assert_eq!(arguments(&action), ["vdb-dump", "weird{name}.sra"]);
    }

    #[test]
    fn test_stream_plan_targets() {
        let plan = Action::Validate {
            file: "x.sra".to_string(),
        }
        .plan()
        .unwrap();

        match plan {
            Plan::Stream {
                targets, status, ..
            } => {
                assert_eq!(targets.output.pane, Pane::Validator);
                assert_eq!(targets.progress.unwrap().kind, SinkKind::Progress);
                assert_eq!(status, "Running sra-validator...");
            }
            Plan::Batch { .. } => panic!("Expected a streamed plan"),
        }
    }

    #[test]
    fn test_advanced_plan_has_no_progress() {
        let plan = Action::SraSort {
            file: "x.sra".to_string(),
        }
        .plan()
        .unwrap();

        assert!(matches!(
            plan,
            Plan::Stream { targets: RunTargets { progress: None, .. }, .. }
        ));
    }

    #[test]
    fn test_batch_plan_skips_blank_lines() {
        let action = Action::BatchPrefetch {
            accessions: "SRR1\n\n   \n  SRR2  \nSRR3\n".to_string(),
        };

        let Plan::Batch { items, sink } = action.plan().unwrap() else {
            panic!("Expected a batch plan");
        };

        let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, ["SRR1", "SRR2", "SRR3"]);
        assert_eq!(
            items[1].command.arguments(),
            ["prefetch", "--progress", "SRR2"]
        );
        assert_eq!(sink, SinkId::output(Pane::Download));
    }

    #[test]
    fn test_blank_batch_rejected() {
        let action = Action::BatchPrefetch {
            accessions: "\n  \n".to_string(),
        };
        assert!(matches!(action.plan(), Err(Error::MissingInput(_))));
    }

    #[test]
    fn test_whitespace_rejected_for_every_field() {
        let blank = "   \t ".to_string();
        let actions = vec![
            Action::Prefetch { accession: blank.clone() },
            Action::SraPath { accession: blank.clone() },
            Action::BatchPrefetch { accessions: blank.clone() },
            Action::FastqDump { file: blank.clone(), gzip: true, threads: "2".to_string() },
            Action::BamLoad { input: blank.clone(), output: "out.sra".to_string() },
            Action::BamLoad { input: "in.bam".to_string(), output: blank.clone() },
            Action::VdbDump { file: blank.clone() },
            Action::RcExplain { file: blank.clone() },
            Action::ReadFilterRedact { file: blank.clone() },
            Action::SetAwsCredentials { path: blank.clone() },
            Action::SetGcpCredentials { path: blank.clone() },
            Action::Validate { file: blank.clone() },
            Action::VdbCopy { source: blank.clone(), destination: "dest".to_string() },
            Action::VdbCopy { source: "src".to_string(), destination: blank.clone() },
            Action::AbiDump { file: blank.clone() },
            Action::SraSort { file: blank.clone() },
            Action::Kar { directory: blank.clone(), output: "out.kar".to_string() },
            Action::Kar { directory: "dir".to_string(), output: blank.clone() },
        ];

        for action in actions {
            let result = action.plan();
            assert!(
                matches!(result, Err(Error::MissingInput(_))),
                "{action:?} was accepted"
            );
        }
    }
}
