// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Generates NEO-SD packed ROM images from Neo Geo ROM dumps.
//!
//! Input files are classified by their filename ([`rom::classify`]), grouped
//! into per-role buckets, checked, and packed behind a fixed 4096 byte header
//! ([`meta::Metadata`]) by the [`Builder`].

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod builder;
pub mod image;
pub mod meta;
pub mod rom;

pub use builder::{Builder, Classification, Config, FileData, FileSpec, Package, assemble};
pub use image::{deinterleave, interleave, validate_sprite_planes};
pub use meta::{Genre, HEADER_LEN, HEADER_MAGIC, Metadata, RomSizes, parse_ngh};
pub use rom::{RomBuckets, RomRole, classify};

use alloc::string::String;
use core::fmt;

/// Version of the JSON build config understood by this version of the crate
pub const CONFIG_VERSION: u32 = 1;

/// Error type
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Error {
    UnrecognizedFile {
        path: String,
    },
    SpritePlaneMismatch {
        count_a: usize,
        count_b: usize,
        total_a: usize,
        total_b: usize,
    },
    PlaneLengthMismatch {
        len_a: usize,
        len_b: usize,
    },
    MetadataFieldTooLong {
        field: &'static str,
        max_len: usize,
    },
    MetadataFieldNotAscii {
        field: &'static str,
    },
    SizeTooLarge {
        field: &'static str,
        size: usize,
    },
    InvalidNgh {
        value: String,
    },
    InvalidGenre {
        value: String,
    },
    InvalidConfig {
        error: String,
    },
    UnsupportedConfigVersion {
        version: u32,
    },
}
type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnrecognizedFile { path } => {
                write!(f, "Don't know how to handle '{}'", path)
            }
            Error::SpritePlaneMismatch {
                count_a,
                count_b,
                total_a,
                total_b,
            } => write!(
                f,
                "Odd/even CROM mismatch: {} odd file(s) totalling {} bytes, {} even file(s) totalling {} bytes",
                count_a, total_a, count_b, total_b
            ),
            Error::PlaneLengthMismatch { len_a, len_b } => write!(
                f,
                "Odd/even CROM mismatch: odd plane is {} bytes, even plane is {} bytes",
                len_a, len_b
            ),
            Error::MetadataFieldTooLong { field, max_len } => {
                write!(f, "{}: input too long (max {})", field, max_len)
            }
            Error::MetadataFieldNotAscii { field } => {
                write!(f, "{}: only ASCII characters are supported", field)
            }
            Error::SizeTooLarge { field, size } => write!(
                f,
                "{}: {} bytes does not fit in the header (max {})",
                field,
                size,
                u32::MAX
            ),
            Error::InvalidNgh { value } => write!(
                f,
                "Invalid NGH number '{}': use decimal, or prefix with 0x for hexadecimal",
                value
            ),
            Error::InvalidGenre { value } => write!(
                f,
                "Invalid genre '{}': valid values are {}",
                value,
                Genre::NAMES.join(", ")
            ),
            Error::InvalidConfig { error } => write!(f, "Invalid config: {}", error),
            Error::UnsupportedConfigVersion { version } => write!(
                f,
                "Unsupported config version {} (expected {})",
                version, CONFIG_VERSION
            ),
        }
    }
}

impl core::error::Error for Error {}

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
