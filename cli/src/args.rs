// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use neosd_gen::meta::{Genre, MAX_COMPANY_LEN, MAX_NAME_LEN};

#[derive(Debug, Parser)]
#[command(name = "neosd")]
#[command(about = "Packs Neo Geo ROM dumps into NEO-SD cartridge images")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build a NEO-SD file from ROM dumps; type is detected from each filename
    Build(BuildArgs),

    /// Show the header of a NEO-SD file, optionally extracting its ROMs
    Info(InfoArgs),

    /// List the genres that can be set
    Genres,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Input ROMs, e.g. 201-p1.p1 201-c1.c1 201-c2.c2
    pub files: Vec<PathBuf>,

    /// Output file name
    #[arg(short, long, value_name = "OUT")]
    pub output: PathBuf,

    /// Silences non-error output
    #[arg(short, long)]
    pub silent: bool,

    /// JSON build config, read before any files given on the command line
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Replace the output file if it already exists
    #[arg(long)]
    pub overwrite: bool,

    /// NGH number; prefix with 0x for hexadecimal [default: 0]
    #[arg(long, value_parser = parse_ngh)]
    pub ngh: Option<u32>,

    /// Displayed game name, max 32 characters [default: Untitled]
    #[arg(long, value_parser = parse_name)]
    pub name: Option<String>,

    /// Manufacturer, max 16 characters [default: None]
    #[arg(long, value_parser = parse_company)]
    pub company: Option<String>,

    /// Displayed genre, see `neosd genres` [default: Other]
    #[arg(long, value_parser = parse_genre)]
    pub genre: Option<Genre>,

    /// Year of release [default: current year]
    #[arg(long)]
    pub year: Option<u32>,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// NEO-SD file to read
    pub file: PathBuf,

    /// Output the header as JSON
    #[arg(long)]
    pub json: bool,

    /// Write each ROM region to a separate file in this directory
    #[arg(long, value_name = "DIR")]
    pub extract: Option<PathBuf>,
}

pub fn parse_ngh(s: &str) -> Result<u32, String> {
    neosd_gen::parse_ngh(s).map_err(|e| e.to_string())
}

pub fn parse_genre(s: &str) -> Result<Genre, String> {
    Genre::try_from_str(s).ok_or_else(|| {
        format!(
            "Invalid genre: {}. Valid values are: {}",
            s,
            Genre::NAMES.join(", ")
        )
    })
}

fn parse_text(field: &str, s: &str, max_len: usize) -> Result<String, String> {
    if !s.is_ascii() {
        return Err(format!("{}: must be ASCII", field));
    }
    if s.len() > max_len {
        return Err(format!("{}: input too long (max {})", field, max_len));
    }
    Ok(s.to_string())
}

pub fn parse_name(s: &str) -> Result<String, String> {
    parse_text("Name", s, MAX_NAME_LEN)
}

pub fn parse_company(s: &str) -> Result<String, String> {
    parse_text("Company", s, MAX_COMPANY_LEN)
}
