use std::{env, process::ExitCode};

use clap::Parser;
use fern::Dispatch;
use log::LevelFilter;
use tolk::cli::{Arguments, ExitStatus};

/// Environment variable holding the log level (`error`, `warn`, `info`, `debug`, `trace`).
const LOG_ENV: &str = "TOLK_LOG";

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_logger(args.verbose());

    match tolk::cli::run_cli(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitStatus::Error.into()
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        env::var(LOG_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(LevelFilter::Warn)
    };

    let logger = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Err(e) = logger.apply() {
        eprintln!("Failed to apply logger: {:?}", e);
    }
}
