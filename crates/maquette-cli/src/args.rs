//! Command-line argument definitions for the Maquette CLI.
//!
//! This module defines the [`Args`] structure parsed from the command
//! line using [`clap`]. Subcommands cover the assembly workflow: derive
//! form fields, validate and apply edits, sequence pages, and drive the
//! rendering service.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Maquette layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive the editable form fields of a layout document
    Fields {
        /// Path to the layout JSON file
        layout: String,

        /// Treat the layout as a two-page spread sharing one namespace
        #[arg(long)]
        two_pager: bool,

        /// Write the derived schema here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate field values against a layout's derived schema
    Validate {
        /// Path to the layout JSON file
        layout: String,

        /// Path to the JSON file of field values
        #[arg(long)]
        values: String,

        /// Treat the layout as a two-page spread
        #[arg(long)]
        two_pager: bool,
    },

    /// Write edited field values back into a layout document
    Apply {
        /// Path to the layout JSON file
        layout: String,

        /// Path to the JSON file of field values
        #[arg(long)]
        values: String,

        /// Path to a JSON file mapping image fields to uploaded URLs
        #[arg(long)]
        images: Option<String>,

        /// Treat the layout as a two-page spread
        #[arg(long)]
        two_pager: bool,

        /// Path for the rehydrated layout document
        #[arg(short, long, default_value = "out.json")]
        output: String,
    },

    /// Inspect or mutate an article's page plan
    Plan {
        /// Path to the article resource JSON file
        article: String,

        /// Reorder pages to this comma-separated uid sequence
        #[arg(long, value_delimiter = ',')]
        reorder: Option<Vec<String>>,

        /// Remove the page at this zero-based index
        #[arg(long)]
        remove: Option<usize>,

        /// Write the mutated article back to this path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Render an article's pages to PDF through the design service
    Render {
        /// Path to the article resource JSON file
        article: String,

        /// Rendering job id; defaults to one derived from the article id
        #[arg(long)]
        job: Option<String>,

        /// Render only the page with this uid
        #[arg(long)]
        page: Option<String>,

        /// Merge the page PDFs once every page is exported
        #[arg(long)]
        merge: bool,
    },
}
