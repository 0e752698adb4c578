//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Inventory catalog: classes, domains, tags and element trees
#[derive(Parser, Debug)]
#[command(name = "inventory")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ./inventory.toml when present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// SQLite database file, overrides config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub db: Option<PathBuf>,

    /// Actor recorded in audit fields, overrides config
    #[arg(long, global = true, env = "INVENTORY_ACTOR")]
    pub actor: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage class definitions
    Class {
        #[command(subcommand)]
        command: ClassCommands,
    },

    /// Manage domains and their tags
    Domain {
        #[command(subcommand)]
        command: DomainCommands,
    },

    /// Manage elements of a domain
    Element {
        #[command(subcommand)]
        command: ElementCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClassCommands {
    /// Create a class from a JSON payload
    Create {
        /// `{"name", "type", "description"?, "attributes"?}`
        payload: String,
    },
    /// Show one class
    Get { id: String },
    /// List classes ordered by name
    List,
    /// Update description and attributes
    Update {
        id: String,
        /// `{"description"?, "attributes"?, "version"?}`
        payload: String,
    },
    /// Delete a class no element uses
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum DomainCommands {
    /// Create a domain from a JSON payload
    Create {
        /// `{"name", "description"?, "tags"?: [{"name"}]}`
        payload: String,
    },
    /// Show one domain with its tags
    Get { id: String },
    /// List domains ordered by slug
    List,
    /// Update name, description or the complete tag list
    Update {
        id: String,
        /// `{"name"?, "description"?, "tags"?: [{"id"?, "name"}], "version"?}`
        payload: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ElementCommands {
    /// Create an element inside a domain
    Create {
        domain_id: String,
        /// `{"name", "classId", "parentId"?, "attributes"?, "tags"?}`
        payload: String,
    },
    /// Show one element with resolved tags
    Get {
        domain_id: String,
        element_id: String,
    },
    /// List elements of a domain
    List {
        domain_id: String,
        #[command(flatten)]
        filter: ElementListArgs,
    },
    /// Update present fields of an element
    Update {
        domain_id: String,
        element_id: String,
        /// `{"name"?, "description"?, "attributes"?, "tags"?, "version"?}`
        payload: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ElementListArgs {
    /// Only top-level elements
    #[arg(long, conflicts_with = "parent")]
    pub root: bool,

    /// Only direct children of this element
    #[arg(long)]
    pub parent: Option<String>,

    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}
