//! Command-line interface definitions for `wkb`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface arguments for the `wkb` binary.
#[derive(Parser, Debug)]
#[command(
    name = "wkb",
    about = "Inspect and edit an exported WebKeyBind collection",
    version
)]
pub struct Cli {
    /// Logging controls
    #[command(flatten)]
    pub log: LogArgs,

    /// Path to the JSON store file (defaults to ~/.webkeybind/storage.json)
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Optional path to the settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Which subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List bindings
    List {
        /// Only bindings for this host name
        #[arg(long)]
        domain: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete a binding
    Delete {
        /// Binding id
        id: String,
    },

    /// Enable a binding
    Enable {
        /// Binding id
        id: String,
    },

    /// Disable a binding
    Disable {
        /// Binding id
        id: String,
    },

    /// Show which binding a chord would fire on a page
    Match {
        /// Page URL
        #[arg(long)]
        url: String,

        /// Pressed chord, e.g. "Ctrl+Shift+K"
        #[arg(long)]
        key: String,

        /// Pretend focus is in a text field
        #[arg(long)]
        in_text_field: bool,
    },

    /// Load and validate the settings file then exit
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_match() {
        let cli = Cli::parse_from([
            "wkb",
            "--store",
            "/tmp/s.json",
            "match",
            "--url",
            "https://example.com/",
            "--key",
            "Ctrl+K",
            "--in-text-field",
        ]);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(
            cli.command,
            Commands::Match {
                url: "https://example.com/".into(),
                key: "Ctrl+K".into(),
                in_text_field: true,
            }
        );
    }

    #[test]
    fn parses_list_with_log_flags() {
        let cli = Cli::parse_from(["wkb", "--debug", "list", "--domain", "x.test"]);
        assert!(cli.log.debug);
        assert_eq!(
            cli.command,
            Commands::List {
                domain: Some("x.test".into()),
                json: false,
            }
        );
    }
}
