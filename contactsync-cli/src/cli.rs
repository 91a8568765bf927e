//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use contactsync_core::models::Classification;

/// `ContactSync` command-line interface for reconciling contacts
#[derive(Parser)]
#[command(name = "contactsync-cli")]
#[command(author, version, about = "ContactSync command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "CONTACTSYNC_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Gather contacts from one or more sources and submit them
    #[command(about = "Gather contacts from vCard files, a picker export or the directory")]
    Import {
        /// vCard files to read, in order
        #[arg(long = "cards", value_name = "PATH")]
        cards: Vec<PathBuf>,

        /// JSON file standing in for the device contact picker
        #[arg(long, value_name = "PATH")]
        picker: Option<PathBuf>,

        /// Sweep the remote contact directory
        #[arg(long)]
        directory: bool,

        /// Drop records with this identity before submitting
        #[arg(long, value_name = "NAME")]
        exclude: Vec<String>,

        /// Keep records with this identity but leave them unselected
        #[arg(long, value_name = "NAME")]
        deselect: Vec<String>,

        /// Classification applied to every submitted row
        #[arg(short = 'C', long, value_enum)]
        classification: Option<ClassificationArg>,

        /// Print the working set without submitting it
        #[arg(long)]
        dry_run: bool,

        /// Output format for the working set
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Upload a spreadsheet file to the backend unchanged
    #[command(about = "Upload a spreadsheet file to the backend")]
    Upload {
        /// Spreadsheet file; accepted extensions come from
        /// `[import] tabular_extensions` (default: csv)
        file: PathBuf,
    },

    /// Download the backend's contact export
    #[command(about = "Download the contact export to a file")]
    Export {
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the path of the settings file
    Path,

    /// Print the effective settings
    Show,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    #[default]
    Table,
    /// Output as JSON
    Json,
}

/// Classification options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ClassificationArg {
    /// Customer or client
    Customer,
    /// Supplier or vendor
    Supplier,
    /// Business partner
    Partner,
    /// Internal staff
    Employee,
    /// Anything else
    Other,
}

impl From<ClassificationArg> for Classification {
    fn from(arg: ClassificationArg) -> Self {
        match arg {
            ClassificationArg::Customer => Self::Customer,
            ClassificationArg::Supplier => Self::Supplier,
            ClassificationArg::Partner => Self::Partner,
            ClassificationArg::Employee => Self::Employee,
            ClassificationArg::Other => Self::Other,
        }
    }
}
