// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! neosd-parser
//!
//! Reads NEO-SD packed ROM files: decodes the header, checks the payload
//! length against it, and hands out the individual ROM regions.
//!
//! ```
//! use neosd_gen::builder::{FileData, assemble};
//! use neosd_gen::meta::Metadata;
//! use neosd_parser::Parser;
//!
//! let package = assemble(
//!     Metadata::with_year(1990),
//!     [FileData { path: "g-p1.p1".to_string(), data: vec![1, 2, 3, 4] }],
//! )?;
//! let data = package.to_bytes();
//!
//! let parser = Parser::new(&data)?;
//! assert_eq!(parser.header().name, "Untitled");
//! assert_eq!(parser.program(), &[1, 2, 3, 4]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod parsing;

use log::{debug, warn};
use neosd_gen::HEADER_LEN;
use neosd_gen::meta::{Genre, RomSizes};

use crate::parsing::{field_text, parse_and_validate_header};

/// Error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Data too small: {len} bytes, need at least {required}")]
    TooSmall { len: usize, required: usize },

    #[error("Not a NEO-SD file: bad magic {found:02X?}")]
    BadMagic { found: [u8; 4] },

    #[error("{0}")]
    Header(String),

    #[error("Length mismatch: header describes {expected} bytes, file is {actual} bytes")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Gen(#[from] neosd_gen::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

/// Decoded NEO-SD header
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NeoHeader {
    pub program_size: u32,
    pub fix_size: u32,
    pub sound_size: u32,
    pub sample_size: u32,
    pub sample2_size: u32,
    pub sprite_size: u32,
    pub year: u32,
    /// Raw genre value from the header
    pub genre_code: u32,
    /// Genre, if `genre_code` is a known value
    pub genre: Option<Genre>,
    pub screenshot: u32,
    pub ngh: u32,
    pub name: String,
    pub company: String,
}

impl NeoHeader {
    /// Payload length described by the header, excluding the header itself
    pub fn payload_len(&self) -> u64 {
        [
            self.program_size,
            self.fix_size,
            self.sound_size,
            self.sample_size,
            self.sample2_size,
            self.sprite_size,
        ]
        .iter()
        .map(|size| *size as u64)
        .sum()
    }

    /// Sizes in the form used by the generator
    pub fn sizes(&self) -> RomSizes {
        RomSizes {
            program: self.program_size,
            fix: self.fix_size,
            sound: self.sound_size,
            sample: self.sample_size,
            sprite: self.sprite_size,
        }
    }
}

/// Parses just the header from the start of `data`.
///
/// Only the header needs to be present.
pub fn parse_header(data: &[u8]) -> Result<NeoHeader> {
    let raw = parse_and_validate_header(data)?;

    let genre = Genre::from_code(raw.genre);
    if genre.is_none() {
        warn!("Unknown genre code {}", raw.genre);
    }

    Ok(NeoHeader {
        program_size: raw.p_size,
        fix_size: raw.s_size,
        sound_size: raw.m_size,
        sample_size: raw.v1_size,
        sample2_size: raw.v2_size,
        sprite_size: raw.c_size,
        year: raw.year,
        genre_code: raw.genre,
        genre,
        screenshot: raw.screenshot,
        ngh: raw.ngh,
        name: field_text(&raw.name),
        company: field_text(&raw.manu),
    })
}

/// A payload region of a NEO-SD file
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Region {
    Program,
    Fix,
    Sound,
    Sample,
    Sample2,
    Sprite,
}

impl Region {
    /// Every region, in file order
    pub const ALL: [Region; 6] = [
        Region::Program,
        Region::Fix,
        Region::Sound,
        Region::Sample,
        Region::Sample2,
        Region::Sprite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Program => "prom",
            Region::Fix => "srom",
            Region::Sound => "mrom",
            Region::Sample => "vrom",
            Region::Sample2 => "vrom2",
            Region::Sprite => "crom",
        }
    }

    fn size(&self, header: &NeoHeader) -> u32 {
        match self {
            Region::Program => header.program_size,
            Region::Fix => header.fix_size,
            Region::Sound => header.sound_size,
            Region::Sample => header.sample_size,
            Region::Sample2 => header.sample2_size,
            Region::Sprite => header.sprite_size,
        }
    }
}

/// Parser over a complete NEO-SD file held in memory
#[derive(Debug)]
pub struct Parser<'a> {
    data: &'a [u8],
    header: NeoHeader,
}

impl<'a> Parser<'a> {
    /// Parses the header and checks the file is exactly as long as the
    /// header says it should be.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let header = parse_header(data)?;

        let expected = HEADER_LEN as u64 + header.payload_len();
        let actual = data.len() as u64;
        if expected != actual {
            return Err(Error::LengthMismatch { expected, actual });
        }

        debug!("NEO-SD file OK: {} bytes, \"{}\"", actual, header.name);

        Ok(Self { data, header })
    }

    pub fn header(&self) -> &NeoHeader {
        &self.header
    }

    /// Bytes of the given region
    pub fn region(&self, region: Region) -> &'a [u8] {
        // Lengths were checked in new(), so these slices are in bounds
        let mut offset = HEADER_LEN;
        for other in Region::ALL {
            let len = other.size(&self.header) as usize;
            if other == region {
                return &self.data[offset..offset + len];
            }
            offset += len;
        }
        &[]
    }

    /// Non-empty regions, in file order
    pub fn regions(&self) -> Vec<(Region, &'a [u8])> {
        Region::ALL
            .into_iter()
            .map(|region| (region, self.region(region)))
            .filter(|(_, data)| !data.is_empty())
            .collect()
    }

    pub fn program(&self) -> &'a [u8] {
        self.region(Region::Program)
    }

    pub fn fix(&self) -> &'a [u8] {
        self.region(Region::Fix)
    }

    pub fn sound(&self) -> &'a [u8] {
        self.region(Region::Sound)
    }

    pub fn sample(&self) -> &'a [u8] {
        self.region(Region::Sample)
    }

    /// Interleaved sprite data
    pub fn sprites(&self) -> &'a [u8] {
        self.region(Region::Sprite)
    }

    /// Sprite data split back into plane A (odd ROMs) and plane B (even
    /// ROMs).  Each plane holds every pair concatenated in order.
    pub fn sprite_planes(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        Ok(neosd_gen::deinterleave(self.sprites())?)
    }
}
