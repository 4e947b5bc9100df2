//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the replicate binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::ModelRef;

/// Replicate API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "replicate", about = "Replicate API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work with models.
    #[command(alias = "model")]
    Models {
        #[command(subcommand)]
        action: ModelsCommand,
    },

    /// Work with model versions.
    #[command(alias = "version")]
    Versions {
        #[command(subcommand)]
        action: VersionsCommand,
    },
}

/// Model subcommands.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List public models.
    List {
        /// Follow cursors and list every page.
        #[arg(long)]
        all: bool,
    },

    /// Get a single model.
    Get {
        /// The model, as `owner/name`.
        model: ModelRef,
    },

    /// Create a model.
    Create {
        /// The model to create, as `owner/name`.
        model: ModelRef,

        /// Hardware SKU to run the model on.
        #[arg(long)]
        hardware: String,

        /// Who can see the model.
        #[arg(long, value_enum, default_value_t = Visibility::Private)]
        visibility: Visibility,

        /// Model description.
        #[arg(long)]
        description: Option<String>,
    },
}

/// Version subcommands.
#[derive(Subcommand, Debug)]
pub enum VersionsCommand {
    /// List the versions of a model.
    List {
        /// The model, as `owner/name`.
        model: ModelRef,

        /// Follow cursors and list every page.
        #[arg(long)]
        all: bool,
    },

    /// Get a single version of a model.
    Get {
        /// The model, as `owner/name`.
        model: ModelRef,

        /// The version ID.
        version: String,
    },
}

/// Model visibility.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// The value the API expects.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}
