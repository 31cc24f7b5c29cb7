use std::fs::File;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use itertools::Itertools;
use log::{debug, error, info, warn};
use sra_desk_core::config::{self, RunnerConfig};
use sra_desk_core::defaults::{load_defaults, save_defaults, Defaults};
use sra_desk_core::dispatch::{dispatch, Dispatched};
use sra_desk_core::error::{Error, Result};
use sra_desk_core::event::{EventSender, Outcome};
use sra_desk_core::process::ProcessRunner;
use sra_desk_core::toolkit;
use tokio::sync::mpsc::unbounded_channel;

use sra_desk_cli::actions::to_action;
use sra_desk_cli::cli_args::{Args, Command, DefaultsCommand};
use sra_desk_cli::console::ConsoleFrontend;
use sra_desk_cli::follow::{follow_batch, follow_stream};

fn init_logging(log_file: Option<&str>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();

    if let Some(path) = log_file {
        let file = File::create(path)
            .map_err(|e| Error::io_error("log".to_string(), path.to_string(), e))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn handle_defaults(action: DefaultsCommand, defaults_path: &str) -> Result<()> {
    let mut defaults = load_defaults(defaults_path);

    match action {
        DefaultsCommand::Show => {
            println!("Defaults from `{defaults_path}`:");
            print_defaults(&defaults);
        }
        DefaultsCommand::Set { gzip, threads } => {
            if let Some(gzip) = gzip {
                defaults.gzip = gzip;
            }
            if let Some(threads) = threads {
                defaults.threads = threads;
            }
            save_defaults(defaults_path, &defaults)?;
            println!("Saved defaults to `{defaults_path}`:");
            print_defaults(&defaults);
        }
    }

    Ok(())
}

fn print_defaults(defaults: &Defaults) {
    println!("\tgzip: {}", defaults.gzip);
    println!("\tthreads: {}", defaults.threads);
}

async fn execute(args: Args) -> Result<ExitCode> {
    let defaults_path = config::get_defaults_path(&args.defaults_path);
    debug!("Defaults path: `{defaults_path}`");

    let tool = match args.command {
        Command::Defaults { action } => {
            handle_defaults(action, &defaults_path)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Tool(tool) => tool,
    };

    if args.skip_toolkit_check {
        info!("Skipping toolkit check");
    } else {
        toolkit::ensure_installed().await?;
    }

    let action = to_action(tool, &load_defaults(&defaults_path))?;

    let runner_config = args
        .timeout
        .map_or_else(RunnerConfig::default, |secs| {
            RunnerConfig::with_timeout(Duration::from_secs(secs))
        });

    let (tx, mut rx) = unbounded_channel();
    let runner = ProcessRunner::new(EventSender::new(tx), runner_config);
    let mut frontend = ConsoleFrontend::stdio(args.view);

    match dispatch(&action, &runner)? {
        Dispatched::Stream(id) => {
            debug!("Following run {id}");
            let outcome = follow_stream(&mut rx, &mut frontend, runner.controller(), id).await?;

            Ok(match outcome {
                Some(Outcome::Completed { .. }) => ExitCode::SUCCESS,
                Some(outcome) => {
                    warn!("Run {id} ended with {outcome:?}");
                    ExitCode::FAILURE
                }
                None => {
                    error!("Run {id} ended without a result");
                    ExitCode::FAILURE
                }
            })
        }
        Dispatched::Batch(handle) => {
            let report = follow_batch(&mut rx, &mut frontend, handle).await?;

            if report.spawn_failures().next().is_none() {
                return Ok(ExitCode::SUCCESS);
            }

            eprintln!(
                "Could not start prefetch for: {}",
                report.spawn_failures().join(", ")
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match execute(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
