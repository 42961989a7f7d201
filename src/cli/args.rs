//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;

/// Hierarchical record store over a flat JSON dataset
#[derive(Parser, Debug)]
#[command(name = "treestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Dataset file (default: data_file from config, else items.json)
    #[arg(
        short,
        long,
        global = true,
        env = "TREESTORE_FILE",
        value_hint = ValueHint::FilePath
    )]
    pub file: Option<PathBuf>,

    /// Print records as JSON instead of one-line text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Record ids on the command line: bare integers are integer ids, quoted
/// values are text ids (`'"2"'` addresses the text id "2"), everything else
/// is a text id verbatim.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter dataset
    Init {
        /// Overwrite an existing dataset
        #[arg(long)]
        force: bool,
    },

    /// List all records in insertion order
    Show,

    /// Print a single record
    Get {
        /// Record id
        id: String,
    },

    /// Print direct children of a record
    Children {
        /// Record id
        id: String,
    },

    /// Print all descendants of a record, each exactly once
    Descendants {
        /// Record id
        id: String,
    },

    /// Print the chain from a record up to its root
    Ancestors {
        /// Record id
        id: String,
    },

    /// Render the hierarchy as a tree
    Tree,

    /// Show dataset statistics (records, roots, leaves, depth)
    Stats,

    /// Validate the dataset: unique ids, acyclic parent links
    Check,

    /// Insert a record and rewrite the dataset
    Add {
        /// Record id (a text id is minted when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Parent record id
        #[arg(long)]
        parent: Option<String>,

        /// Record label
        #[arg(long)]
        label: String,

        /// Extra field as KEY=VALUE; VALUE is parsed as JSON when possible
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// Update a record wholesale and rewrite the dataset
    Update {
        /// Record id
        id: String,

        /// New parent record id
        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,

        /// Detach from the current parent, making the record a root
        #[arg(long)]
        root: bool,

        /// New label
        #[arg(long)]
        label: Option<String>,

        /// Extra field as KEY=VALUE (replaces the stored value for KEY)
        #[arg(long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// Remove a record and its whole subtree, then rewrite the dataset
    Remove {
        /// Record id
        id: String,
    },

    /// Pick a record interactively and print it with its ancestors
    Select,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective merged configuration
    Show,

    /// Write a commented template config file
    Init {
        /// Write the global config instead of ./.treestore.toml
        #[arg(short, long)]
        global: bool,
    },

    /// Show config file locations
    Path,
}
