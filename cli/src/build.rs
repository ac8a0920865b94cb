// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! `neosd build`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use log::{debug, info};
use neosd_gen::builder::{Builder, FileData};
use neosd_gen::meta::Metadata;

use crate::args::BuildArgs;
use crate::utils::{add_commas, write_atomic};

fn this_year() -> u32 {
    chrono::Local::now().year().try_into().unwrap_or_default()
}

fn load_config(path: &Path, default_year: u32) -> Result<(Builder, Vec<PathBuf>)> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let builder = Builder::from_json(&json, default_year)
        .with_context(|| format!("Failed to load config {}", path.display()))?;

    if let Some(description) = builder.description() {
        info!("Config: {}", description);
    }

    // Files in the config are relative to the config itself
    let base = path.parent().unwrap_or(Path::new(""));
    let files = builder
        .file_specs()
        .into_iter()
        .map(|spec| {
            debug!("Config file {}: {} ({})", spec.id, spec.source, spec.role);
            base.join(spec.source)
        })
        .collect();

    Ok((builder, files))
}

// Command line values take precedence over the config
fn apply_overrides(base: &Metadata, args: &BuildArgs) -> Result<Metadata> {
    Ok(Metadata::new(
        args.ngh.unwrap_or(base.ngh()),
        args.name.as_deref().unwrap_or(base.name()),
        args.company.as_deref().unwrap_or(base.company()),
        args.genre.unwrap_or(base.genre()),
        args.year.unwrap_or(base.year()),
    )?)
}

pub fn run(args: BuildArgs) -> Result<()> {
    let year = this_year();

    let (mut builder, mut files) = match &args.config {
        Some(path) => load_config(path, year)?,
        None => (Builder::new(Metadata::with_year(year)), Vec::new()),
    };
    files.extend(args.files.iter().cloned());

    if files.is_empty() {
        bail!("No input files - supply ROM files, or a config listing them");
    }

    let metadata = apply_overrides(builder.metadata(), &args)?;
    debug!("Metadata: {:?}", metadata);
    builder.set_metadata(metadata);

    for path in files {
        let data = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        let classification = builder.add_file(FileData {
            path: path.display().to_string(),
            data,
        })?;

        if !args.silent {
            println!(
                "added: {} (as type {})",
                classification.path,
                classification.role.type_name()
            );
        }
    }

    let package = builder.build()?;
    debug!("Package is {} bytes", add_commas(package.len() as u64));

    if !args.silent {
        println!("output: {}", args.output.display());
    }

    write_atomic(&args.output, package.chunks(), args.overwrite)
}
