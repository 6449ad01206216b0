//! `tnetstring` — decode tagged netstrings from stdin, one per line.
//!
//! Usage:
//!   tnetstring [--json] [--strict] [--max-payload N] [--max-depth N]
//!
//! Set `RUST_LOG=debug` to see decoder diagnostics on stderr.

use std::io::{self, BufRead, Write};

use tnetstring::cli::{parse_args, process_line, CliError, CliOptions, Command, USAGE};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    match run(&opts) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` if any line failed to decode.
fn run(opts: &CliOptions) -> Result<bool, CliError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut all_ok = true;

    for (lineno, line) in stdin.lock().split(b'\n').enumerate() {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() {
            continue;
        }
        match process_line(&line, opts) {
            Ok(report) => writeln!(stdout, "{report}")?,
            Err(e) => {
                all_ok = false;
                eprintln!("line {}: {e}", lineno + 1);
            }
        }
    }
    stdout.flush()?;
    Ok(all_ok)
}
