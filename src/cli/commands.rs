use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "promptmaker")]
#[command(version, about = "Build structured prompts and render them for a language model")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory for cached state (default: $PROMPTMAKER_DIR or .promptmaker)
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the current prompt
    Show {
        /// Render a share token (or share URL) instead of the cached state
        #[arg(long, conflicts_with = "file")]
        token: Option<String>,

        /// Render a spec stored in a JSON or YAML file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print the spec as JSON instead of the rendered text
        #[arg(long)]
        json: bool,
    },

    /// Print a share link for the current prompt
    Share {
        /// Base URL the token is appended to
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Print only the token
        #[arg(long)]
        token_only: bool,
    },

    /// Replace the current prompt with one from a share token or URL
    Load {
        /// Share token, or a URL carrying `?s=<token>`
        token: String,
    },

    /// Reset the current prompt to the built-in default
    Reset,

    /// Set a text or numeric field (e.g. `set objective "Write a haiku."`)
    Set {
        /// Field name, camelCase or snake_case
        field: String,

        /// New value; for temperature / max_tokens an empty value or "none" clears it
        value: String,
    },

    /// Append an item to a list field (constraints, steps, keywords, avoid)
    Add {
        field: String,
        item: String,
    },

    /// Remove an item from a list field
    Remove {
        field: String,
        item: String,
    },

    /// Manage few-shot examples
    Example(ExampleCommand),

    /// List the built-in templates
    Templates {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a built-in template on top of the current prompt
    Apply {
        /// Template id (see `templates`)
        id: String,
    },

    /// Ask the advisor for improvements and apply them
    Improve {
        /// Use another instance's /api/rewrite endpoint instead of calling the model API
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Print the suggested patch without applying it
        #[arg(long)]
        dry_run: bool,
    },

    /// Write the rendered prompt to a text file
    Export {
        /// Output path
        #[arg(long, short = 'o', default_value = "prompt.txt")]
        output: PathBuf,
    },

    /// Print the JSON Schema of a prompt spec
    Schema,

    /// Serve the HTTP API (rewrite, render, templates)
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

#[derive(Args, Debug)]
pub struct ExampleCommand {
    #[command(subcommand)]
    pub action: ExampleAction,
}

#[derive(Subcommand, Debug)]
pub enum ExampleAction {
    /// Add a few-shot example
    Add {
        /// Example title (default: "Example N")
        #[arg(long)]
        title: Option<String>,

        /// Example input
        #[arg(long, conflicts_with = "stdin")]
        input: Option<String>,

        /// Expected output
        #[arg(long)]
        output: Option<String>,

        /// Read the input from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Remove an example by its 1-based position
    Remove {
        index: usize,
    },

    /// Change fields of an example by its 1-based position
    Update {
        index: usize,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        input: Option<String>,

        #[arg(long)]
        output: Option<String>,
    },

    /// List examples
    List,
}
