use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
/// Inspect and edit IPMI Platform Management FRU Information blobs
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Decode a FRU blob and print every present area's fields
    Dump {
        /// Path to the FRU blob
        file: PathBuf,
    },
    /// Decode a FRU blob, apply field assignments, and write back only the changed bytes
    Set {
        /// Path to the FRU blob
        file: PathBuf,
        /// One or more `field.name=value` assignments (see `dump` for field names)
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Build a fresh, area-less blob and add the requested areas with empty fields
    New {
        /// Path to write the new blob to
        file: PathBuf,
        /// Total blob capacity in bytes
        #[arg(long, default_value_t = 512)]
        capacity: usize,
        #[arg(long, default_value_t = false)]
        chassis: bool,
        #[arg(long, default_value_t = false)]
        board: bool,
        #[arg(long, default_value_t = false)]
        product: bool,
        #[arg(long, default_value_t = false)]
        internal_use: bool,
    },
}
