use anyhow::Context;
use clap::Parser;
use ngcseam::{exit_status, init_logging, MergeArgs, TeeWriter};
use ngcseam_core::Merger;
use std::process::ExitCode;

fn run(args: &MergeArgs, report: &mut TeeWriter) -> anyhow::Result<()> {
    let config = args.merge_config()?;
    let invocation = args.resolve().context("Failed to collect input programs")?;
    let merger = Merger::new(config).context("Invalid merge configuration")?;

    merger
        .run(&invocation.inputs, &invocation.output, report)
        .with_context(|| format!("Failed to merge into {}", invocation.output.display()))?;

    Ok(())
}

fn main() -> ExitCode {
    let args = MergeArgs::parse();

    let mut tee = match TeeWriter::for_log(args.log.as_deref()) {
        Ok(tee) => tee,
        Err(err) => {
            eprintln!("Error: cannot open log file: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if let Err(err) = init_logging(args.verbose, tee.clone()) {
        eprintln!("Error: {:#}", err);
        return ExitCode::FAILURE;
    }

    match run(&args, &mut tee) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}
