//! Main CLI application

use crate::error::ParseError;
use crate::makefile::{find_makefile, parse_file, Makefile};
use crate::runner::{Builder, Context, ShellExecutor, Sink, Verbosity};
use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
}

impl App {
    pub fn new() -> Self {
        App {
            command: build_command(),
        }
    }

    /// Run the application with the process arguments and standard streams
    pub fn run(self) -> anyhow::Result<()> {
        self.run_from(env::args_os(), Sink::stdout(), Sink::stderr())
    }

    /// Run the application with explicit arguments and output sinks
    pub fn run_from<I, T>(mut self, args: I, out: Sink, err: Sink) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            let mut script = Vec::new();
            clap_complete::generate(*shell, &mut self.command, "rmk", &mut script);
            out.write_line(String::from_utf8_lossy(&script).trim_end())?;
            return Ok(());
        }

        let working_dir = match matches.get_one::<PathBuf>("directory") {
            Some(dir) => env::current_dir()?.join(dir),
            None => env::current_dir()?,
        };

        let makefile = load_makefile(&matches, &working_dir)?;

        if matches.get_flag("print-rules") {
            out.write_line(makefile.to_yaml()?.trim_end())?;
            return Ok(());
        }

        let targets: Vec<String> = match matches.get_many::<String>("targets") {
            Some(values) => values.cloned().collect(),
            None => makefile.first_targets.clone(),
        };

        let ctx = Context::new()
            .with_working_dir(working_dir)
            .with_verbosity(get_verbosity(&matches))
            .with_dry_run(matches.get_flag("dry-run"))
            .with_sinks(out, err);

        Builder::new(&makefile, &ctx, ShellExecutor).build_all(targets.as_slice())?;

        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate, parse and sanity-check the rule file
fn load_makefile(matches: &ArgMatches, working_dir: &Path) -> anyhow::Result<Makefile> {
    let path = match matches.get_one::<PathBuf>("file") {
        Some(file) => working_dir.join(file),
        None => find_makefile(working_dir)?,
    };

    let makefile =
        parse_file(&path).with_context(|| format!("failed to load {}", path.display()))?;

    if makefile.rules.is_empty() {
        return Err(ParseError::NoRules).with_context(|| format!("in {}", path.display()));
    }

    Ok(makefile)
}

/// Build the clap command
fn build_command() -> Command {
    Command::new("rmk")
        .version(crate::VERSION)
        .about("A minimal Makefile-style build runner")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Read FILE as the rule file (default: Makefile)"),
        )
        .arg(
            Arg::new("directory")
                .short('C')
                .long("directory")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Change to DIR before doing anything"),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print the commands that would run without running them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("print-rules")
                .short('p')
                .long("print-rules")
                .help("Print the resolved variables and rules as YAML and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(value_parser!(Shell))
                .help("Print a shell completion script and exit"),
        )
        .arg(
            Arg::new("targets")
                .value_name("TARGET")
                .num_args(0..)
                .action(ArgAction::Append)
                .help("Targets to build (default: the first rule)"),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    App::new().run()
}
