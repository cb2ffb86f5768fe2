mod args;
mod logging;

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use sql_facade::prelude::*;
use tracing::Level;

use crate::args::{Args, Command, Statement};
use crate::logging::LogWriter;

fn main() -> ExitCode {
    let args = Args::parse();
    let writer = LogWriter::new(args.log.clone()).unwrap_or_else(|err| {
        eprintln!("failed to open log file: {err}");
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "failed to start tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "statement failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let facade = QueryFacade::create(args.facade_config()?)?;
    tracing::info!(backend = ?facade.database_type(), "pool ready");

    match args.command {
        Command::Select(Statement { sql, params }) => {
            let rs = facade.select(&sql, &params).await?;
            let mut out = io::stdout().lock();
            for row in &rs {
                print_json_line(&mut out, row)?;
            }
            tracing::info!(rows = rs.len(), "select finished");
        }
        Command::Stream(Statement { sql, params }) => {
            let mut out = io::stdout().lock();
            let mut rows = 0_u64;
            let mut output_error = None;
            let stream_error = facade
                .stream(
                    &sql,
                    &params,
                    |row| {
                        rows += 1;
                        if output_error.is_none() {
                            output_error = print_json_line(&mut out, &row).err();
                        }
                    },
                    |err| err,
                )
                .await;
            tracing::info!(rows, "stream finished");
            if let Some(err) = stream_error {
                return Err(err.into());
            }
            if let Some(err) = output_error {
                return Err(err);
            }
        }
        Command::Write(Statement { sql, params }) => {
            let written = facade.write(&sql, &params).await?;
            print_json_line(&mut io::stdout().lock(), &written)?;
        }
    }

    let status = facade.pool_status();
    tracing::debug!(
        checkouts = status.checkouts,
        releases = status.releases,
        "pool status"
    );
    Ok(())
}

fn print_json_line(out: &mut impl Write, value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}
