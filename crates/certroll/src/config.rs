use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Default location of the control-plane resource document.
const DEFAULT_CONTROL_PLANE: &str = "control-plane.json";

/// Default location of the cluster node inventory.
const DEFAULT_NODES: &str = "nodes.json";

/// Default directory plans are delivered into.
const DEFAULT_OUTPUT: &str = "plans";

#[derive(Parser, Debug)]
#[command(
    name = "certroll",
    version,
    about = "Plan and drive certificate rotation across cluster nodes"
)]
pub struct Cli {
    /// Control-plane resource (JSON) holding the rotation request and status
    #[arg(long, env = "CERTROLL_CONTROL_PLANE", global = true, value_name = "PATH")]
    pub control_plane: Option<PathBuf>,

    /// Cluster node inventory (JSON)
    #[arg(long, env = "CERTROLL_NODES", global = true, value_name = "PATH")]
    pub nodes: Option<PathBuf>,

    /// Directory node plans are delivered into
    #[arg(long, env = "CERTROLL_OUTPUT", global = true, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "CERTROLL_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report whether a certificate rotation is pending
    Check,
    /// Show the plans a rotation pass would deliver
    Plan {
        /// Only show the plan for this node
        #[arg(long)]
        node: Option<String>,
        /// Print decoded file contents instead of base64
        #[arg(long)]
        decode: bool,
    },
    /// Print the on-node rotation script
    Script,
    /// Run a rotation pass against the plan directory
    Rotate {
        /// Treat delivered plans as applied without waiting for nodes
        #[arg(long)]
        assume_converged: bool,
    },
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub control_plane: PathBuf,
    pub nodes: PathBuf,
    pub output: PathBuf,
    pub json: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            control_plane: cli
                .control_plane
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTROL_PLANE)),
            nodes: cli
                .nodes
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NODES)),
            output: cli
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            json: cli.json,
        }
    }

    /// Effective tracing filter directive.
    pub fn log_filter(cli: &Cli) -> &str {
        match cli.verbose {
            0 => cli.log_level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    }
}
