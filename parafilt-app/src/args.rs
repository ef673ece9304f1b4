//! Command-line argument parsing.

use std::path::PathBuf;

pub const USAGE: &str = "Usage: parafilt <input_wav_file> [--config <file.json>] \
[--mode parallel|serial|concurrent] [--max-threads <n>] [--approximate] \
[--seed <n>] [--output-dir <dir>] [--report <file.json>]";

/// Parsed command line. Optional fields override the settings file.
#[derive(Debug, Default, PartialEq)]
pub struct Args {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub mode: Option<String>,
    pub max_threads: Option<usize>,
    pub approximate: bool,
    pub seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
}

#[derive(Debug, PartialEq)]
pub enum ArgsError {
    MissingInput,
    Invalid(String),
}

pub fn parse_args<I>(raw: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = Args::default();
    let mut input: Option<PathBuf> = None;

    let mut it = raw.into_iter();
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .ok_or_else(|| ArgsError::Invalid(format!("missing value for {flag}")))
        };
        match arg.as_str() {
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--mode" => args.mode = Some(value("--mode")?),
            "--max-threads" => {
                let v = value("--max-threads")?;
                args.max_threads = Some(
                    v.parse::<usize>()
                        .map_err(|_| ArgsError::Invalid(format!("invalid --max-threads: {v}")))?,
                );
            }
            "--approximate" => args.approximate = true,
            "--seed" => {
                let v = value("--seed")?;
                args.seed = Some(
                    v.parse::<u64>()
                        .map_err(|_| ArgsError::Invalid(format!("invalid --seed: {v}")))?,
                );
            }
            "--output-dir" => args.output_dir = Some(PathBuf::from(value("--output-dir")?)),
            "--report" => args.report = Some(PathBuf::from(value("--report")?)),
            "--help" | "-h" => return Ok(Command::Help),
            other if other.starts_with("--") => {
                return Err(ArgsError::Invalid(format!("unknown argument: {other}")));
            }
            positional => {
                if input.is_some() {
                    return Err(ArgsError::Invalid(format!(
                        "unexpected extra argument: {positional}"
                    )));
                }
                input = Some(PathBuf::from(positional));
            }
        }
    }

    args.input = input.ok_or(ArgsError::MissingInput)?;
    Ok(Command::Run(args))
}
