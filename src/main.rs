mod app;
mod command;
mod config;
mod consts;
mod control;
mod engine;
mod game;
mod menu;
mod policy;
mod telemetry;
mod util;
use crate::app::App;
use crate::config::{Config, ConfigError};
use crate::engine::ControlMode;
use crate::util::{error_chain, Globals};
use lexopt::{Arg, Parser, ValueExt};
use simplelog::{LevelFilter, WriteLogger};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Usage: autosnake [<options>]

Play snake in the terminal, by hand or with an autopilot at the controls

Options:
  -c, --config <FILE>     Read configuration from <FILE>
      --mode <MODE>       Skip the main menu and start a game in <MODE>
                          (manual, auto, or external)
      --policy <FILE>     Read an external policy's predictions from <FILE>
                          (a regular file or named pipe)
      --telemetry <FILE>  Append gameplay transitions to <FILE>
      --log <FILE>        Write log messages to <FILE>
      --log-level <LEVEL> Log messages at <LEVEL> and above [default: info]
  -h, --help              Show this help message and exit
  -V, --version           Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Arguments),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("mode") => args.mode = parser.value()?.parse()?,
                Arg::Long("policy") => args.policy = Some(PathBuf::from(parser.value()?)),
                Arg::Long("telemetry") => args.telemetry = Some(PathBuf::from(parser.value()?)),
                Arg::Long("log") => args.log = Some(PathBuf::from(parser.value()?)),
                Arg::Long("log-level") => {
                    args.log_level = Some(parser.value()?.parse_with(|s| {
                        s.parse::<LevelFilter>()
                            .map_err(|_| format!("invalid log level {s:?}"))
                    })?);
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    mode: ControlMode,
    policy: Option<PathBuf>,
    telemetry: Option<PathBuf>,
    log: Option<PathBuf>,
    log_level: Option<LevelFilter>,
}

impl Arguments {
    fn run(self) -> Result<(), MainError> {
        init_logging(self.log.as_deref(), self.log_level.unwrap_or(LevelFilter::Info))?;
        log::info!("Starting autosnake {VERSION}");
        let config = match self.config {
            Some(path) => Config::load(&path, false)?,
            None => match Config::default_path() {
                Ok(path) => Config::load(&path, true)?,
                Err(e) => {
                    log::warn!("{e}; using default configuration");
                    Config::default()
                }
            },
        };
        let globals = Globals {
            config,
            mode: self.mode,
            policy: self.policy,
            telemetry: self.telemetry,
        };
        let terminal = ratatui::init();
        let r = App::new(globals).run(terminal);
        ratatui::restore();
        log::info!("Exiting");
        r.map_err(MainError::Terminal)
    }
}

/// Send log messages to `path`, or to `autosnake.log` in the local data
/// directory if no path is given.  Nothing is ever logged to the terminal,
/// as that belongs to the interface.
fn init_logging(path: Option<&Path>, level: LevelFilter) -> Result<(), MainError> {
    let path = match path {
        Some(p) => p.to_owned(),
        None => {
            let dir = dirs::data_local_dir()
                .ok_or(MainError::NoLogPath)?
                .join("autosnake");
            fs_err::create_dir_all(&dir).map_err(MainError::LogFile)?;
            dir.join("autosnake.log")
        }
    };
    let file = fs_err::File::create(path).map_err(MainError::LogFile)?;
    WriteLogger::init(level, simplelog::Config::default(), file)?;
    Ok(())
}

#[derive(Debug, Error)]
enum MainError {
    #[error("could not determine local data directory for the log file")]
    NoLogPath,
    #[error("failed to open log file")]
    LogFile(#[source] io::Error),
    #[error("failed to install logger")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed")]
    Terminal(#[source] io::Error),
}

fn main() -> ExitCode {
    match Command::from_parser(Parser::from_env()) {
        Ok(Command::Run(args)) => match args.run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(MainError::Terminal(e)) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("autosnake: {}", error_chain(&e));
                ExitCode::from(2)
            }
        },
        Ok(Command::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Command::Version) => {
            println!("autosnake {VERSION}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("autosnake: {e}");
            eprintln!("Run `autosnake --help` for usage");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args))
    }

    #[test]
    fn no_arguments() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(Arguments::default()));
    }

    #[test]
    fn all_arguments() {
        let cmd = parse(&[
            "-c",
            "snake.toml",
            "--mode",
            "external",
            "--policy",
            "predictions.fifo",
            "--telemetry=out.jsonl",
            "--log",
            "snake.log",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(
            cmd,
            Command::Run(Arguments {
                config: Some(PathBuf::from("snake.toml")),
                mode: ControlMode::ExternalPolicy,
                policy: Some(PathBuf::from("predictions.fifo")),
                telemetry: Some(PathBuf::from("out.jsonl")),
                log: Some(PathBuf::from("snake.log")),
                log_level: Some(LevelFilter::Debug),
            })
        );
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse(&["--mode", "auto", "-h"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn bad_arguments() {
        assert!(parse(&["--mode", "sideways"]).is_err());
        assert!(parse(&["--log-level", "loud"]).is_err());
        assert!(parse(&["--policy"]).is_err());
        assert!(parse(&["stray"]).is_err());
    }
}
