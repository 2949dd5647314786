//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use health_crew_domain::OutputFormat;
use std::path::PathBuf;

/// Output format for consultation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Only the final report
    Text,
    /// Every stage's answer, then the final report
    Full,
    /// JSON output
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Text => OutputFormat::Text,
            OutputArg::Full => OutputFormat::Full,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for health-crew
#[derive(Parser, Debug)]
#[command(name = "health-crew")]
#[command(author, version, about = "Health, nutrition and fitness analysis by a crew of LLM experts")]
#[command(long_about = r#"
health-crew runs a small crew of LLM experts over three inputs: age, gender
and a disease indicator ("yes", or anything else such as "no").

The crew works sequentially:
1. Fitness Expert: exercise routines and fitness strategies
2. Nutritionist: dietary recommendations
3. Doctor: overall health and lifestyle
4. Disease Expert: managing the condition (only when the indicator is "yes")

Configuration files are loaded from (in priority order):
1. --config <path>                        Explicit config file
2. HEALTH_CREW_* environment variables    e.g. HEALTH_CREW_LLM__MODEL
3. ./health-crew.toml                     Project-level config
4. ~/.config/health-crew/config.toml      Global config

Example:
  health-crew consult --age 45 --gender male --disease no
  health-crew consult -o full               # asks for missing fields
  health-crew serve --port 7860
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Override the model from the configuration
    #[arg(short, long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run one consultation in the terminal (default)
    Consult(ConsultArgs),
    /// Serve the consultation form over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultArgs {
    /// Age of the client (asked interactively when omitted)
    #[arg(long)]
    pub age: Option<String>,

    /// Gender of the client (asked interactively when omitted)
    #[arg(long)]
    pub gender: Option<String>,

    /// "yes" if the client has a disease, anything else otherwise
    #[arg(long)]
    pub disease: Option<String>,

    /// Output format (defaults to `[output] format`, then text)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Address to bind (defaults to `[server] bind`)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (defaults to `[server] port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// The subcommand to run; a bare invocation is an interactive consultation.
    pub fn selected_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Consult(ConsultArgs::default()))
    }
}
