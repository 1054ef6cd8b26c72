//! `wkb`: inspect and edit an exported WebKeyBind binding collection.
use std::process;

use clap::Parser;
use tracing::{debug, error};

mod cli;
mod commands;
mod error;
mod file_store;

pub use error::{Error, Result};

use crate::{
    cli::{Cli, Commands},
    commands::{default_store_path, open_repository},
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log);

    let settings = match config::resolve_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e.pretty());
            process::exit(1);
        }
    };
    if cli.command == Commands::Check {
        println!("OK");
        return;
    }

    let path = cli.store.clone().unwrap_or_else(default_store_path);
    debug!(path = %path.display(), "opening store");
    let repo = open_repository(&settings, path);
    match commands::run(&cli.command, &repo).await {
        Ok(out) => println!("{out}"),
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
