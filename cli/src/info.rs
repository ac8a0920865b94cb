// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! `neosd info`

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use neosd_parser::{NeoHeader, Parser, Region};

use crate::args::InfoArgs;
use crate::utils::add_commas;

pub fn run(args: InfoArgs) -> Result<()> {
    let data =
        fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
    let parser =
        Parser::new(&data).with_context(|| format!("Failed to parse {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(parser.header())?);
    } else {
        print!("{}", describe(&args.file, parser.header(), data.len() as u64));
    }

    if let Some(dir) = &args.extract {
        for path in extract(&parser, dir)? {
            println!("extracted: {}", path.display());
        }
    }

    Ok(())
}

fn size_line(out: &mut String, label: &str, size: u32) {
    let _ = writeln!(out, "{:<12}{} bytes", label, add_commas(size as u64));
}

/// Human readable summary of a header
pub fn describe(file: &Path, header: &NeoHeader, file_len: u64) -> String {
    let genre = match header.genre {
        Some(genre) => format!("{} ({})", genre, header.genre_code),
        None => format!("Unknown ({})", header.genre_code),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{:<12}{}", "File:", file.display());
    let _ = writeln!(out, "{:<12}{}", "Name:", header.name);
    let _ = writeln!(out, "{:<12}{}", "Company:", header.company);
    let _ = writeln!(out, "{:<12}{}", "Year:", header.year);
    let _ = writeln!(out, "{:<12}{}", "Genre:", genre);
    let _ = writeln!(out, "{:<12}{:#06X}", "NGH:", header.ngh);
    size_line(&mut out, "Program:", header.program_size);
    size_line(&mut out, "Fix:", header.fix_size);
    size_line(&mut out, "Sound:", header.sound_size);
    size_line(&mut out, "Sample:", header.sample_size);
    if header.sample2_size != 0 {
        size_line(&mut out, "Sample 2:", header.sample2_size);
    }
    size_line(&mut out, "Sprite:", header.sprite_size);
    let _ = writeln!(out, "{:<12}{} bytes", "Total:", add_commas(file_len));
    out
}

/// Writes each non-empty region to `dir`, splitting the sprite data back
/// into its two planes.  Returns the files written.
pub fn extract(parser: &Parser, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut outputs: Vec<(String, Vec<u8>)> = Vec::new();
    for (region, data) in parser.regions() {
        if region == Region::Sprite {
            let (a, b) = parser.sprite_planes()?;
            outputs.push((format!("{}-a.bin", region.name()), a));
            outputs.push((format!("{}-b.bin", region.name()), b));
        } else {
            outputs.push((format!("{}.bin", region.name()), data.to_vec()));
        }
    }

    let mut written = Vec::new();
    for (name, data) in outputs {
        let path = dir.join(name);
        debug!("Writing {} bytes to {}", data.len(), path.display());
        fs::write(&path, &data).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}
