//! Logic behind the `tnetstring` line-oriented demo binary.
//!
//! Each input line is decoded as one tagged netstring; the binary prints the
//! parsed form, its canonical re-encoding and any trailing bytes.

use thiserror::Error;

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::encode;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Decode(#[from] DecodeError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("option {0} requires a value")]
    MissingValue(&'static str),
    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: &'static str, value: String },
}

pub const USAGE: &str = "\
Usage: tnetstring [--json] [--strict] [--max-payload N] [--max-depth N]

Reads one tagged netstring per line from stdin and prints the decoded
value, its canonical encoding and any trailing bytes.

Options:
  --json            print decoded values as JSON
  --strict          reject boolean payloads other than true/false
  --max-payload N   reject declared lengths above N bytes
  --max-depth N     reject arrays and objects nested deeper than N (default 128)
  -h, --help        show this message";

/// Options parsed from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub json: bool,
    pub strict_booleans: bool,
    pub max_payload: Option<usize>,
    pub max_depth: Option<usize>,
}

impl CliOptions {
    pub fn decoder(&self) -> Decoder {
        let mut decoder = Decoder::new().strict_booleans(self.strict_booleans);
        if let Some(limit) = self.max_payload {
            decoder = decoder.max_payload(limit);
        }
        if let Some(limit) = self.max_depth {
            decoder = decoder.max_depth(limit);
        }
        decoder
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(CliOptions),
    Help,
}

/// Parse arguments, excluding the program name.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Command, CliError> {
    let mut opts = CliOptions::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_ref() {
            "--json" => opts.json = true,
            "--strict" => opts.strict_booleans = true,
            "--max-payload" => {
                i += 1;
                opts.max_payload = Some(parse_limit(args.get(i), "--max-payload")?);
            }
            "--max-depth" => {
                i += 1;
                opts.max_depth = Some(parse_limit(args.get(i), "--max-depth")?);
            }
            "-h" | "--help" => return Ok(Command::Help),
            other => return Err(CliError::UnknownOption(other.to_string())),
        }
        i += 1;
    }
    Ok(Command::Run(opts))
}

fn parse_limit<S: AsRef<str>>(arg: Option<&S>, flag: &'static str) -> Result<usize, CliError> {
    let raw: &str = arg.map(AsRef::as_ref).ok_or(CliError::MissingValue(flag))?;
    raw.parse().map_err(|_| CliError::InvalidValue {
        flag,
        value: raw.to_string(),
    })
}

/// Decode one line and render the report printed for it.
pub fn process_line(line: &[u8], opts: &CliOptions) -> Result<String, CliError> {
    let (value, rest) = opts.decoder().decode(line)?;
    let shown = if opts.json {
        serde_json::to_string(&value.to_json())?
    } else {
        value.to_string()
    };
    let mut out = format!(
        "value: {shown}\nencoded: {}",
        String::from_utf8_lossy(&encode(&value))
    );
    if !rest.is_empty() {
        out.push_str("\nremainder: ");
        out.push_str(&String::from_utf8_lossy(rest));
    }
    Ok(out)
}
