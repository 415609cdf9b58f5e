//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::OrphanPolicy;

/// Convert configuration container item lists between flat lists and group trees
#[derive(Parser, Debug)]
#[command(name = "itemtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .itemtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Orphaned children: drop, append or reject (overrides config)
    #[arg(long, global = true)]
    pub orphans: Option<OrphanPolicy>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the group tree of a flat item list (JSON)
    Build {
        /// Flat item list
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Flatten a group tree back into a flat list (JSON)
    Flatten {
        /// Item tree
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Show the group tree as text
    Tree {
        /// Flat item list
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List groups by weight
    Groups {
        /// Flat item list
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show a single item
    Get {
        /// Flat item list
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Item id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// List the children of a group by weight
    Children {
        /// Flat item list
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Group id
        #[arg(allow_negative_numbers = true)]
        group: i64,
    },

    /// Report invalid items, orphans, duplicate ids and nested groups
    Check {
        /// Flat item list
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Show config file locations
    Path,
}
