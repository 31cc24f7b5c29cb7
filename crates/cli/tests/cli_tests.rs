//! End-to-end checks from a parsed command line to the command that would run.

use std::io::Write;

use clap::Parser;
use sra_desk_cli::actions::to_action;
use sra_desk_cli::cli_args::{Args, Command, ToolCommand, View};
use sra_desk_cli::console::ConsoleFrontend;
use sra_desk_core::defaults::{load_defaults, save_defaults, Defaults};
use sra_desk_core::dispatch::{Action, Plan};
use sra_desk_core::error::Error;
use sra_desk_core::event::{Event, Pane, SinkId, Style};
use sra_desk_core::frontend::Frontend;
use tempfile::{tempdir, NamedTempFile};

fn tool(arguments: &[&str]) -> ToolCommand {
    let args = Args::parse_from(std::iter::once("sra-desk").chain(arguments.iter().copied()));
    match args.command {
        Command::Tool(tool) => tool,
        Command::Defaults { .. } => panic!("Expected a tool subcommand"),
    }
}

fn command_for(arguments: &[&str], defaults: &Defaults) -> Vec<String> {
    match to_action(tool(arguments), defaults).unwrap().plan().unwrap() {
        Plan::Stream { command, .. } => command.arguments().to_vec(),
        Plan::Batch { .. } => panic!("Expected a streamed plan"),
    }
}

#[test]
fn test_fastq_dump_with_stored_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("defaults.yml");
    let path = path.to_str().unwrap();

    save_defaults(
        path,
        &Defaults {
            gzip: true,
            threads: "3".to_string(),
        },
    )
    .unwrap();
    let defaults = load_defaults(path);

    assert_eq!(
        command_for(&["fastq-dump", "/data/SRR1.sra"], &defaults),
        ["fastq-dump", "--progress", "--gzip", "--threads", "3", "/data/SRR1.sra"]
    );
    assert_eq!(
        command_for(&["fastq-dump", "/data/SRR1.sra", "--no-gzip", "--threads", "1"], &defaults),
        ["fastq-dump", "--progress", "--threads", "1", "/data/SRR1.sra"]
    );
}

#[test]
fn test_every_subcommand_builds() {
    let defaults = Defaults::default();
    let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
        (vec!["prefetch", "SRR1"], vec!["prefetch", "--progress", "SRR1"]),
        (vec!["srapath", "SRR1"], vec!["srapath", "SRR1"]),
        (vec!["bam-load", "in.bam", "-o", "out.sra"], vec!["bam-load", "-o", "out.sra", "in.bam"]),
        (vec!["vdb-dump", "a.sra"], vec!["vdb-dump", "a.sra"]),
        (vec!["rcexplain", "a.sra"], vec!["rcexplain", "a.sra"]),
        (vec!["read-filter-redact", "a.sra"], vec!["read-filter-redact", "a.sra"]),
        (vec!["vdb-config"], vec!["vdb-config", "-i"]),
        (
            vec!["set-aws-credentials", "creds"],
            vec!["vdb-config", "--set-aws-credentials", "creds"],
        ),
        (
            vec!["set-gcp-credentials", "key.json"],
            vec!["vdb-config", "--set-gcp-credentials", "key.json"],
        ),
        (vec!["validate", "a.sra"], vec!["sra-validator", "a.sra"]),
        (vec!["vdb-copy", "src", "dest"], vec!["vdb-copy", "src", "dest"]),
        (vec!["abi-dump", "a.sra"], vec!["abi-dump", "a.sra"]),
        (vec!["sra-sort", "a.sra"], vec!["sra-sort", "a.sra"]),
        (vec!["kar", "dir", "-o", "out.kar"], vec!["kar", "create", "-o", "out.kar", "dir"]),
    ];

    for (arguments, expected) in cases {
        assert_eq!(command_for(&arguments, &defaults), expected, "{arguments:?}");
    }
}

#[test]
fn test_blank_argument_rejected_before_running() {
    let action = to_action(tool(&["validate", "   "]), &Defaults::default()).unwrap();
    let result = action.plan();

    assert!(matches!(result, Err(Error::MissingInput(_))));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Please enter the SRA file path for validation."
    );
}

#[test]
fn test_batch_prefetch_merges_arguments_and_file() {
    let mut list = NamedTempFile::new().unwrap();
    write!(list, "SRR3\n\n  SRR4  \n").unwrap();
    let list_path = list.path().to_str().unwrap();

    let action = to_action(
        tool(&["batch-prefetch", "SRR1", "SRR2", "--file", list_path]),
        &Defaults::default(),
    )
    .unwrap();
    assert!(matches!(action, Action::BatchPrefetch { .. }));

    let Plan::Batch { items, .. } = action.plan().unwrap() else {
        panic!("Expected a batch plan");
    };
    let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, ["SRR1", "SRR2", "SRR3", "SRR4"]);
}

#[test]
fn test_console_renders_a_run() {
    let output = SinkId::output(Pane::Download);
    let progress = SinkId::progress(Pane::Download);
    let mut console = ConsoleFrontend::new(Vec::new(), Vec::new(), View::Output, false);

    let events = vec![
        Event::Clear(output),
        Event::Clear(progress),
        Event::Append {
            sink: progress,
            text: "Starting command: prefetch SRR1\n".to_string(),
            style: Style::Plain,
        },
        Event::Status("Running: prefetch SRR1".to_string()),
        Event::Append {
            sink: output,
            text: "Running command: prefetch SRR1\n\n".to_string(),
            style: Style::Plain,
        },
        Event::Busy(true),
        Event::Append {
            sink: output,
            text: "warning\n".to_string(),
            style: Style::Error,
        },
        Event::Status("Command completed successfully".to_string()),
        Event::ScrollToStart(output),
        Event::Busy(false),
    ];
    for event in events {
        console.apply(event);
    }

    let (out, err) = console.into_writers();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Running command: prefetch SRR1\n\nwarning\n"
    );
    assert_eq!(
        String::from_utf8(err).unwrap(),
        "[Running: prefetch SRR1]\n[Command completed successfully]\n"
    );
}
