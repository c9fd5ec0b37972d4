use crate::commands::Command;
use crate::tracing::{LogLevel, TracingFormat};
use clap::{Args, Parser, Subcommand};
use shipkit_release::{CONFIG_FILE, NotesStyle};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shipkit")]
#[command(about = "Release notes generation and publication comparison")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'c',
        long,
        global = true,
        env = "SHIPKIT_CONFIG",
        help = "Path to the configuration file",
        default_value = CONFIG_FILE
    )]
    pub config: PathBuf,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long = "log-format",
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(
        long = "log-filter",
        global = true,
        env = "SHIPKIT_LOG_FILTER",
        help = "Tracing filter directives, e.g. shipkit_release=trace"
    )]
    pub log_filter: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Release notes operations")]
    Notes {
        #[command(subcommand)]
        subcommand: NotesCommands,
    },
    #[command(about = "Compare a build against the previously published version")]
    Compare {
        #[arg(long, help = "Directory with the previously published artifacts")]
        previous: PathBuf,
        #[arg(long, help = "Directory with the freshly built artifacts")]
        current: PathBuf,
        #[arg(
            long = "previous-version",
            help = "Version of the previous publication"
        )]
        previous_version: String,
        #[arg(long = "version", help = "Version of the current build")]
        version: String,
        #[arg(long, help = "Context lines around each change", default_value_t = 0)]
        context: usize,
    },
    #[command(about = "Show the differences between two files")]
    Diff {
        #[arg(help = "Previous file")]
        old: PathBuf,
        #[arg(help = "Current file")]
        new: PathBuf,
        #[arg(long, help = "Context lines around each change", default_value_t = 0)]
        context: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotesCommands {
    #[command(about = "Prepend the newest release to the release notes")]
    Update {
        #[arg(
            long,
            env = "SHIPKIT_PREVIEW",
            help = "Print the update instead of writing it"
        )]
        preview: bool,
        #[command(flatten)]
        options: NotesOptions,
    },
    #[command(about = "Print the release notes update without writing it")]
    Preview {
        #[command(flatten)]
        options: NotesOptions,
    },
}

/// Overrides of the `[releaseNotes]` configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct NotesOptions {
    #[arg(
        long = "version",
        env = "SHIPKIT_VERSION",
        help = "Version being released (default: newest data record)"
    )]
    pub version: Option<String>,
    #[arg(
        long = "previous-version",
        env = "SHIPKIT_PREVIOUS_VERSION",
        help = "Previously released version"
    )]
    pub previous_version: Option<String>,
    #[arg(long, env = "SHIPKIT_STYLE", help = "Release notes style (detailed, concise)")]
    pub style: Option<NotesStyle>,
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Notes { subcommand } => match subcommand {
                NotesCommands::Update { preview, options } => Self::Notes {
                    preview: preview.then_some(true),
                    options,
                },
                NotesCommands::Preview { options } => Self::Notes {
                    preview: Some(true),
                    options,
                },
            },
            Commands::Compare {
                previous,
                current,
                previous_version,
                version,
                context,
            } => Self::Compare {
                previous,
                current,
                previous_version,
                version,
                context,
            },
            Commands::Diff { old, new, context } => Self::Diff { old, new, context },
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
