// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::debug;

pub fn add_commas(n: u64) -> String {
    let s = n.to_string();
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// Sibling of `path` used while the output is being written
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Writes `chunks` to `path` so that it is either completely written or not
/// there at all.
///
/// Data goes to a temporary file in the same directory, which is renamed
/// over `path` once complete and removed on any failure.
pub fn write_atomic<'a, I>(path: &Path, chunks: I, overwrite: bool) -> Result<()>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    if !overwrite && path.exists() {
        bail!(
            "Output file '{}' already exists. Use --overwrite to overwrite.",
            path.display()
        );
    }

    let temp = temp_path(path);
    debug!("Writing {} via {}", path.display(), temp.display());

    let result = write_chunks(&temp, chunks).and_then(|_| {
        fs::rename(&temp, path)
            .with_context(|| format!("Failed to rename {} to {}", temp.display(), path.display()))
    });

    if result.is_err() {
        // Leave no partial output behind
        let _ = fs::remove_file(&temp);
    }

    result
}

fn write_chunks<'a, I>(path: &Path, chunks: I) -> Result<()>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for chunk in chunks {
        file.write_all(chunk)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    file.sync_all()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}
