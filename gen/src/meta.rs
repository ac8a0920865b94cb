// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! NEO-SD header generator.
//!
//! The header is a fixed 4096 byte block at the start of a NEO-SD file:
//!
//! ```text
//! struct NeoFile {
//!     uint8_t header1, header2, header3, version; // NEO\x01
//!     uint32_t PSize, SSize, MSize, V1Size, V2Size, CSize;
//!     uint32_t Year;
//!     uint32_t Genre;
//!     uint32_t Screenshot;
//!     uint32_t NGH;
//!     uint8_t Name[33];
//!     uint8_t Manu[17];
//!     // zero filled to 4096 bytes
//! }
//! ```
//!
//! All integers are little-endian.  `V2Size` and `Screenshot` are always
//! written as zero.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use crate::rom::{RomBuckets, RomRole};
use crate::{Error, Result};

/// Total length of the header, in bytes
pub const HEADER_LEN: usize = 4096;

/// Identification bytes at the start of every header
pub const HEADER_MAGIC: &[u8; 4] = b"NEO\x01";

/// Longest game name that fits in the header, excluding the terminator
pub const MAX_NAME_LEN: usize = 32;

/// Longest company name that fits in the header, excluding the terminator
pub const MAX_COMPANY_LEN: usize = 16;

pub const DEFAULT_NAME: &str = "Untitled";
pub const DEFAULT_COMPANY: &str = "None";

pub const PROGRAM_SIZE_OFFSET: usize = 4;
pub const FIX_SIZE_OFFSET: usize = 8;
pub const SOUND_SIZE_OFFSET: usize = 12;
pub const SAMPLE_SIZE_OFFSET: usize = 16;
pub const SAMPLE2_SIZE_OFFSET: usize = 20;
pub const SPRITE_SIZE_OFFSET: usize = 24;
pub const YEAR_OFFSET: usize = 28;
pub const GENRE_OFFSET: usize = 32;
pub const SCREENSHOT_OFFSET: usize = 36;
pub const NGH_OFFSET: usize = 40;
pub const NAME_OFFSET: usize = 44;
pub const COMPANY_OFFSET: usize = NAME_OFFSET + MAX_NAME_LEN + 1; // 77

const _: () = assert!(COMPANY_OFFSET + MAX_COMPANY_LEN + 1 <= HEADER_LEN);

/// Genre shown by the NEO-SD menu
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum Genre {
    #[default]
    Other,
    Action,
    BeatEmUp,
    Sports,
    Driving,
    Platformer,
    Mahjong,
    Shooter,
    Quiz,
    Fighting,
    Puzzle,
}

impl Genre {
    /// Every genre, in code order
    pub const ALL: [Genre; 11] = [
        Genre::Other,
        Genre::Action,
        Genre::BeatEmUp,
        Genre::Sports,
        Genre::Driving,
        Genre::Platformer,
        Genre::Mahjong,
        Genre::Shooter,
        Genre::Quiz,
        Genre::Fighting,
        Genre::Puzzle,
    ];

    /// Names accepted by [`Genre::try_from_str`]
    pub const NAMES: [&'static str; 11] = [
        "Action",
        "BeatEmUp",
        "Sports",
        "Driving",
        "Platformer",
        "Mahjong",
        "Shooter",
        "Quiz",
        "Fighting",
        "Puzzle",
        "Other",
    ];

    /// Value stored in the header
    pub const fn code(&self) -> u32 {
        match self {
            Genre::Other => 0,
            Genre::Action => 1,
            Genre::BeatEmUp => 2,
            Genre::Sports => 3,
            Genre::Driving => 4,
            Genre::Platformer => 5,
            Genre::Mahjong => 6,
            Genre::Shooter => 7,
            Genre::Quiz => 8,
            Genre::Fighting => 9,
            Genre::Puzzle => 10,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|genre| genre.code() == code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Other => "Other",
            Genre::Action => "Action",
            Genre::BeatEmUp => "BeatEmUp",
            Genre::Sports => "Sports",
            Genre::Driving => "Driving",
            Genre::Platformer => "Platformer",
            Genre::Mahjong => "Mahjong",
            Genre::Shooter => "Shooter",
            Genre::Quiz => "Quiz",
            Genre::Fighting => "Fighting",
            Genre::Puzzle => "Puzzle",
        }
    }

    /// Case-insensitive lookup by name
    pub fn try_from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|genre| genre.name().eq_ignore_ascii_case(s))
    }
}

impl core::fmt::Display for Genre {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl core::str::FromStr for Genre {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from_str(s).ok_or_else(|| Error::InvalidGenre {
            value: s.to_string(),
        })
    }
}

/// Parses an NGH number.
///
/// Accepts decimal, or hexadecimal prefixed with `0x`.  Octal (`0o`) and
/// binary (`0b`) prefixes and `_` digit separators are also accepted.
///
/// ```
/// assert_eq!(neosd_gen::parse_ngh("0x1234").unwrap(), 4660);
/// assert_eq!(neosd_gen::parse_ngh("201").unwrap(), 201);
/// ```
pub fn parse_ngh(s: &str) -> Result<u32> {
    let invalid = || Error::InvalidNgh {
        value: s.to_string(),
    };

    let trimmed = s.trim();
    let prefix = trimmed.get(..2).map(|p| p.to_ascii_lowercase());
    let (radix, digits) = match prefix.as_deref() {
        Some("0x") => (16, &trimmed[2..]),
        Some("0o") => (8, &trimmed[2..]),
        Some("0b") => (2, &trimmed[2..]),
        _ => (10, trimmed),
    };

    // Separators may only sit between digits, or straight after a prefix
    let leading_ok = radix != 10 || !digits.starts_with('_');
    if digits.is_empty()
        || !leading_ok
        || digits.ends_with('_')
        || digits.contains("__")
        || digits.starts_with(['+', '-'])
    {
        return Err(invalid());
    }

    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return Err(invalid());
    }

    // Leading zeros are ambiguous in decimal, so only a plain zero is allowed
    if radix == 10 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
        return Err(invalid());
    }

    u32::from_str_radix(&digits, radix).map_err(|_| invalid())
}

/// Payload sizes recorded in the header
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RomSizes {
    pub program: u32,
    pub fix: u32,
    pub sound: u32,
    pub sample: u32,
    /// Size of the interleaved sprite data, i.e. both planes
    pub sprite: u32,
}

impl RomSizes {
    /// Totals up each bucket.
    ///
    /// The sprite size is twice the size of plane A, which is only the true
    /// interleaved size once the planes have been validated against each
    /// other.
    pub fn from_buckets(buckets: &RomBuckets) -> Result<Self> {
        let sprite = buckets
            .total_len(RomRole::SpritePlaneA)
            .checked_mul(2)
            .ok_or(Error::SizeTooLarge {
                field: "CSize",
                size: usize::MAX,
            })?;

        Ok(Self {
            program: size_field("PSize", buckets.total_len(RomRole::Program))?,
            fix: size_field("SSize", buckets.total_len(RomRole::Fix))?,
            sound: size_field("MSize", buckets.total_len(RomRole::Sound))?,
            sample: size_field("V1Size", buckets.total_len(RomRole::Sample))?,
            sprite: size_field("CSize", sprite)?,
        })
    }

    /// Combined payload length following the header
    pub fn payload_len(&self) -> usize {
        [self.program, self.fix, self.sound, self.sample, self.sprite]
            .iter()
            .map(|size| *size as usize)
            .sum()
    }
}

fn size_field(field: &'static str, size: usize) -> Result<u32> {
    u32::try_from(size).map_err(|_| Error::SizeTooLarge { field, size })
}

/// Game metadata written to the header
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Metadata {
    ngh: u32,
    name: String,
    company: String,
    genre: Genre,
    year: u32,
}

impl Metadata {
    /// Creates metadata, checking the name and company fit the header.
    pub fn new(
        ngh: u32,
        name: impl Into<String>,
        company: impl Into<String>,
        genre: Genre,
        year: u32,
    ) -> Result<Self> {
        let metadata = Self {
            ngh,
            name: name.into(),
            company: company.into(),
            genre,
            year,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Metadata with the default name, company, genre and NGH.
    pub fn with_year(year: u32) -> Self {
        Self {
            ngh: 0,
            name: DEFAULT_NAME.to_string(),
            company: DEFAULT_COMPANY.to_string(),
            genre: Genre::Other,
            year,
        }
    }

    pub fn ngh(&self) -> u32 {
        self.ngh
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    /// Checks the text fields are ASCII and fit in the header.
    pub fn validate(&self) -> Result<()> {
        check_text_field("name", &self.name, MAX_NAME_LEN)?;
        check_text_field("company", &self.company, MAX_COMPANY_LEN)
    }

    /// Writes the header to the provided buffer.
    ///
    /// The buffer must be at least [`HEADER_LEN`] bytes.  The full header
    /// length is written, including zero filling every unused byte.  Returns
    /// the number of bytes written.
    pub fn write_header(&self, sizes: &RomSizes, buf: &mut [u8]) -> Result<usize> {
        self.validate()?;

        if buf.len() < HEADER_LEN {
            return Err(Error::InvalidConfig {
                error: format!(
                    "Header buffer too small: {} bytes, need {}",
                    buf.len(),
                    HEADER_LEN
                ),
            });
        }

        let buf = &mut buf[..HEADER_LEN];
        buf.fill(0);

        buf[0..4].copy_from_slice(HEADER_MAGIC);
        write_u32(buf, PROGRAM_SIZE_OFFSET, sizes.program);
        write_u32(buf, FIX_SIZE_OFFSET, sizes.fix);
        write_u32(buf, SOUND_SIZE_OFFSET, sizes.sound);
        write_u32(buf, SAMPLE_SIZE_OFFSET, sizes.sample);
        // Secondary sample bank unsupported
        write_u32(buf, SAMPLE2_SIZE_OFFSET, 0);
        write_u32(buf, SPRITE_SIZE_OFFSET, sizes.sprite);
        write_u32(buf, YEAR_OFFSET, self.year);
        write_u32(buf, GENRE_OFFSET, self.genre.code());
        // No screenshot
        write_u32(buf, SCREENSHOT_OFFSET, 0);
        write_u32(buf, NGH_OFFSET, self.ngh);

        // Strings are NUL terminated by the zero fill above
        buf[NAME_OFFSET..NAME_OFFSET + self.name.len()].copy_from_slice(self.name.as_bytes());
        buf[COMPANY_OFFSET..COMPANY_OFFSET + self.company.len()]
            .copy_from_slice(self.company.as_bytes());

        Ok(HEADER_LEN)
    }

    /// Allocates and returns a complete header.
    pub fn header(&self, sizes: &RomSizes) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; HEADER_LEN];
        self.write_header(sizes, &mut buf)?;
        Ok(buf)
    }
}

fn check_text_field(field: &'static str, value: &str, max_len: usize) -> Result<()> {
    if value.len() > max_len {
        return Err(Error::MetadataFieldTooLong { field, max_len });
    }
    if !value.is_ascii() {
        return Err(Error::MetadataFieldNotAscii { field });
    }
    Ok(())
}

fn write_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
