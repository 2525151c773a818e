//! CLI parse: clap types for novafs. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Novafs CLI - virtual link-based namespace over stored files
#[derive(Parser)]
#[command(name = "novafs")]
#[command(about = "Virtual link-based namespace over content-opaque file storage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the children of a logical folder
    Ls {
        /// Logical path (default: "/")
        path: Option<String>,
    },
    /// Create a logical folder
    Mkdir {
        /// Logical path of the new folder
        path: String,
    },
    /// Create a new empty managed file
    Touch {
        /// Logical path of the new file (extension derived from the name)
        path: String,
    },
    /// Import an external file or directory into the namespace
    Import {
        /// Source file or directory on the local filesystem
        source: PathBuf,
        /// Destination logical folder (default: "/")
        #[arg(long, default_value = "/")]
        dest: String,
    },
    /// Move a file or folder link to another folder
    Mv {
        /// Logical path of the link to move
        path: String,
        /// Destination logical folder
        dest: String,
    },
    /// Move a file link to the trash
    Trash {
        /// Logical path of the file link
        path: String,
    },
    /// Permanently delete a file link, its record, and its bytes
    Rm {
        /// Logical path of the file link
        path: String,
    },
    /// Rename a link (propagates to the file record for file links)
    Rename {
        /// Logical path of the link
        path: String,
        /// New display name
        new_name: String,
    },
    /// Export a managed file out of the namespace
    Export {
        /// Logical path of the file link
        path: String,
        /// Destination directory on the local filesystem
        dest_dir: PathBuf,
    },
    /// Resolve the logical path of a link id
    Path {
        /// Link id
        id: String,
    },
    /// Run the consistency reconciliation passes
    Reconcile,
}
