//! Command-line configuration

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// File offered when a save or load prompt is left empty.
    pub default_file: Option<PathBuf>,
    /// Load `default_file` before showing the menu.
    pub load_on_start: bool,
    /// Colored feedback, still subject to stdout being a terminal.
    pub color: bool,
    pub verbose: bool,
}

pub fn command() -> Command {
    Command::new("taskmaster")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Menu-driven personal task tracker")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .env("TASKMASTER_FILE")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Default file for save and load (a .json extension selects JSON)"),
        )
        .arg(
            Arg::new("load")
                .long("load")
                .action(ArgAction::SetTrue)
                .requires("file")
                .help("Load the default file at startup"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable colored output"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging on stderr"),
        )
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            default_file: matches.get_one::<PathBuf>("file").cloned(),
            load_on_start: matches.get_flag("load"),
            color: !matches.get_flag("no-color"),
            verbose: matches.get_flag("verbose"),
        }
    }

    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = command().try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "taskmaster=debug"
        } else {
            "taskmaster=warn"
        }
    }
}
