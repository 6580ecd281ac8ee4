//! Clap derive structures for the `fieldlink` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fieldlink -- operator console for the field hub controller
#[derive(Debug, Parser)]
#[command(
    name = "fieldlink",
    version,
    about = "Watch and drive the field hub controller from the command line",
    long_about = "Talks to the field controller over its WebSocket feed.\n\n\
        The controller owns the match clock, scores, hub activation and lighting;\n\
        this tool only displays what it reports and forwards operator commands.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "FIELDLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller host (overrides profile)
    #[arg(long, short = 'H', env = "FIELDLINK_HOST", global = true)]
    pub host: Option<String>,

    /// Controller WebSocket port (overrides profile)
    #[arg(long, short = 'P', env = "FIELDLINK_PORT", global = true)]
    pub port: Option<u16>,

    /// Connect with wss:// through the TLS proxy
    #[arg(long, env = "FIELDLINK_SECURE", global = true)]
    pub secure: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FIELDLINK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Seconds to wait for the controller (overrides profile)
    #[arg(long, env = "FIELDLINK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current match state
    #[command(alias = "st")]
    Status,

    /// Stream match state changes until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Collect scoring events and show the log
    Scores(ScoresArgs),

    /// Start, pause, resume, or stop the match
    #[command(alias = "m")]
    Match(MatchArgs),

    /// Zero the controller's ball count
    ResetCount,

    /// Record the autonomous-period winner
    AutoWinner {
        #[arg(value_enum)]
        winner: WinnerArg,
    },

    /// Set which alliance this controller's hub belongs to
    HubSide {
        #[arg(value_enum)]
        alliance: AllianceArg,
    },

    /// Force both hubs active or inactive, or clear the override
    Force {
        #[arg(value_enum)]
        mode: ForceArg,
    },

    /// Field-safe / post-match lighting override
    FieldSafe {
        #[arg(value_enum)]
        mode: FieldSafeArg,
    },

    /// Set the ball-feed motor speed
    Motor {
        /// Speed in percent (0 stops the motor)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Stop the motor immediately
    #[command(alias = "stop-motor")]
    Estop,

    /// Send a keepalive ping
    Ping,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Streaming ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Also print each scoring event as it arrives
    #[arg(long, short = 's')]
    pub scores: bool,

    /// Stop after this long (e.g. "90s", "2m30s")
    #[arg(long = "for", value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,
}

#[derive(Debug, Args)]
pub struct ScoresArgs {
    /// How long to collect events (e.g. "30s", "2m")
    #[arg(long, short = 'd', default_value = "10s", value_parser = humantime::parse_duration)]
    pub duration: Duration,

    /// Stop early once this many events have been seen
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ── Match control ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MatchArgs {
    #[command(subcommand)]
    pub command: MatchCommand,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum MatchCommand {
    /// Start the match from the top
    Start,
    /// Pause the match clock
    Pause,
    /// Resume a paused match
    Resume,
    /// Abort the match
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WinnerArg {
    Red,
    Blue,
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AllianceArg {
    Red,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ForceArg {
    /// Both hubs score
    Active,
    /// Neither hub scores
    Inactive,
    /// Back to the match rules
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldSafeArg {
    /// Field is safe to enter
    Green,
    /// Post-match
    Purple,
    /// Back to the match lighting
    Off,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
