// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! neosd - packs Neo Geo ROM dumps into NEO-SD cartridge images

mod args;
mod build;
mod info;
mod utils;

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};
use neosd_gen::meta::Genre;

use crate::args::{Cli, Commands};

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    // RUST_LOG, if set, takes precedence
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn list_genres() {
    for genre in Genre::ALL {
        println!("{:>2}  {}", genre.code(), genre);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    debug!(
        "neosd {} (neosd-gen {})",
        env!("CARGO_PKG_VERSION"),
        neosd_gen::crate_version()
    );

    match cli.command {
        Commands::Build(args) => build::run(args),
        Commands::Info(args) => info::run(args),
        Commands::Genres => {
            list_genres();
            Ok(())
        }
    }
}
