use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const USAGE: &str = "\
Usage: cvsum <FILE> [OPTIONS]

Submit a CV for analysis and follow the job until it finishes.

Options:
  -q, --question <Q>          Question to ask about the CV (repeatable)
      --questions-file <PATH> Read questions from a file, one per line
      --mock                  Use the mock inference backend
      --real                  Use the real inference backend
      --sync                  Use the one-shot summarize endpoint instead of a job
      --api-url <URL>         Base URL of the CV service
      --config <PATH>         Config file (default ./cvsum.ron)
      --save <PATH>           Write the finished report as JSON
  -v, --verbose               Debug logging
  -h, --help                  Show this help";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliArgs {
    pub file: Option<PathBuf>,
    pub questions: Vec<String>,
    pub questions_file: Option<PathBuf>,
    /// `None` leaves the configured backend in place.
    pub use_mock: Option<bool>,
    pub sync: bool,
    pub api_url: Option<String>,
    pub config: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(CliArgs),
    Help,
}

/// Parses everything after the program name.
pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--question" | "-q" => parsed.questions.push(value_for(&arg, args.next())?),
            "--questions-file" => {
                parsed.questions_file = Some(PathBuf::from(value_for(&arg, args.next())?));
            }
            "--mock" => parsed.use_mock = Some(true),
            "--real" => parsed.use_mock = Some(false),
            "--sync" => parsed.sync = true,
            "--api-url" => parsed.api_url = Some(value_for(&arg, args.next())?),
            "--config" => parsed.config = Some(PathBuf::from(value_for(&arg, args.next())?)),
            "--save" => parsed.save = Some(PathBuf::from(value_for(&arg, args.next())?)),
            "--verbose" | "-v" => parsed.verbose = true,
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("unknown option `{flag}`"),
            _ => {
                if parsed.file.is_some() {
                    bail!("unexpected argument `{arg}`; only one file can be submitted");
                }
                parsed.file = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(Command::Run(parsed))
}

fn value_for(flag: &str, value: Option<String>) -> Result<String> {
    value.with_context(|| format!("option `{flag}` needs a value"))
}
