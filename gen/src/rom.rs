// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! ROM role classification.
//!
//! Neo Geo ROM dumps follow a naming convention where the chip label is part
//! of the filename, e.g. `201-p1.p1` or `mslug.c3`.  [`classify`] maps such a
//! filename onto a [`RomRole`], and [`RomBuckets`] groups the loaded images by
//! role, in the order they were added.

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::{Error, Result};

/// Functional category of a ROM dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum RomRole {
    /// 68000 program ROM (`p1`, `p2`)
    Program,

    /// Fix layer (text) graphics ROM (`s1`)
    Fix,

    /// Z80 sound driver ROM (`m1`)
    Sound,

    /// ADPCM sample ROM (`v1`-`v4`)
    Sample,

    /// Sprite ROM holding the odd bytes (`c1`, `c3`, `c5`, `c7`)
    SpritePlaneA,

    /// Sprite ROM holding the even bytes (`c2`, `c4`, `c6`, `c8`)
    SpritePlaneB,
}

// Characters that may introduce a role token
const SEPARATORS: &[u8] = b"-.";

// Token table.  Each token is exactly two bytes, so no token can be a prefix
// of another and the order here never affects the result.
const TOKENS: &[(&[u8; 2], RomRole)] = &[
    (b"p1", RomRole::Program),
    (b"p2", RomRole::Program),
    (b"s1", RomRole::Fix),
    (b"m1", RomRole::Sound),
    (b"v1", RomRole::Sample),
    (b"v2", RomRole::Sample),
    (b"v3", RomRole::Sample),
    (b"v4", RomRole::Sample),
    (b"c1", RomRole::SpritePlaneA),
    (b"c3", RomRole::SpritePlaneA),
    (b"c5", RomRole::SpritePlaneA),
    (b"c7", RomRole::SpritePlaneA),
    (b"c2", RomRole::SpritePlaneB),
    (b"c4", RomRole::SpritePlaneB),
    (b"c6", RomRole::SpritePlaneB),
    (b"c8", RomRole::SpritePlaneB),
];

impl RomRole {
    /// Short type label, as shown when a file is added
    pub fn type_name(&self) -> &'static str {
        match self {
            RomRole::Program => "PROM",
            RomRole::Fix => "SROM",
            RomRole::Sound => "MROM",
            RomRole::Sample => "VROM",
            RomRole::SpritePlaneA => "CROM-ODD",
            RomRole::SpritePlaneB => "CROM-EVEN",
        }
    }

    fn index(&self) -> usize {
        match self {
            RomRole::Program => 0,
            RomRole::Fix => 1,
            RomRole::Sound => 2,
            RomRole::Sample => 3,
            RomRole::SpritePlaneA => 4,
            RomRole::SpritePlaneB => 5,
        }
    }
}

impl core::fmt::Display for RomRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Classifies a ROM by its filename.
///
/// Searches for a `-` or `.` immediately followed by a role token.  The
/// leftmost match wins.  Matching is case-sensitive.
///
/// ```
/// use neosd_gen::rom::{RomRole, classify};
///
/// assert_eq!(classify("201-p1.p1").unwrap(), RomRole::Program);
/// assert_eq!(classify("mslug.c3").unwrap(), RomRole::SpritePlaneA);
/// assert!(classify("readme.txt").is_err());
/// ```
pub fn classify(filename: &str) -> Result<RomRole> {
    let bytes = filename.as_bytes();

    for (ii, sep) in bytes.iter().enumerate() {
        if !SEPARATORS.contains(sep) {
            continue;
        }
        let Some(candidate) = bytes.get(ii + 1..ii + 3) else {
            break;
        };
        if let Some((_, role)) = TOKENS.iter().find(|(token, _)| &token[..] == candidate) {
            return Ok(*role);
        }
    }

    Err(Error::UnrecognizedFile {
        path: filename.to_string(),
    })
}

/// Loaded ROM images, grouped by role.
///
/// Within a role, images are kept in the order they were added.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct RomBuckets {
    buckets: [Vec<Vec<u8>>; 6],
}

impl RomBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an image to the bucket for `role`
    pub fn push(&mut self, role: RomRole, data: Vec<u8>) {
        self.buckets[role.index()].push(data);
    }

    /// Images for `role`, in insertion order
    pub fn bucket(&self, role: RomRole) -> &[Vec<u8>] {
        &self.buckets[role.index()]
    }

    /// Removes and returns the images for `role`
    pub fn take(&mut self, role: RomRole) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.buckets[role.index()])
    }

    /// Number of images held for `role`
    pub fn count(&self, role: RomRole) -> usize {
        self.bucket(role).len()
    }

    /// Combined length in bytes of all images held for `role`
    pub fn total_len(&self, role: RomRole) -> usize {
        self.bucket(role).iter().map(|data| data.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_classify_every_token() {
        for (token, role) in TOKENS {
            let token = core::str::from_utf8(&token[..]).unwrap();
            for sep in ["-", "."] {
                let name = format!("201{}{}.bin", sep, token);
                assert_eq!(classify(&name).unwrap(), *role, "{}", name);
            }
        }
    }

    #[test]
    fn test_classify_mame_style_names() {
        assert_eq!(classify("201-p1.p1").unwrap(), RomRole::Program);
        assert_eq!(classify("201-s1.s1").unwrap(), RomRole::Fix);
        assert_eq!(classify("201-m1.m1").unwrap(), RomRole::Sound);
        assert_eq!(classify("201-v2.v2").unwrap(), RomRole::Sample);
        assert_eq!(classify("201-c7.c7").unwrap(), RomRole::SpritePlaneA);
        assert_eq!(classify("201-c8.c8").unwrap(), RomRole::SpritePlaneB);
    }

    #[test]
    fn test_classify_leftmost_match_wins() {
        // The `-c1` comes before the `.p1` extension
        assert_eq!(classify("game-c1.p1").unwrap(), RomRole::SpritePlaneA);
        // `.x` isn't a token, so the search moves on to `-m1`
        assert_eq!(classify("a.xy-m1").unwrap(), RomRole::Sound);
    }

    #[test]
    fn test_classify_token_prefix_only() {
        // Only the two characters after the separator are inspected
        assert_eq!(classify("game-v12.bin").unwrap(), RomRole::Sample);
    }

    #[test]
    fn test_classify_unrecognized() {
        for name in [
            "readme.txt",
            "game-p3.bin",
            "game-c9.bin",
            "game-v5.bin",
            "gamep1.bin",
            "game_p1.bin",
            "game-P1.bin",
            "game-",
            "game.p",
            "",
        ] {
            assert_eq!(
                classify(name),
                Err(Error::UnrecognizedFile {
                    path: name.to_string()
                }),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_buckets_keep_insertion_order() {
        let mut buckets = RomBuckets::new();
        assert!(buckets.is_empty());

        buckets.push(RomRole::Program, alloc::vec![1, 2]);
        buckets.push(RomRole::Fix, alloc::vec![9]);
        buckets.push(RomRole::Program, alloc::vec![3]);

        assert!(!buckets.is_empty());
        assert_eq!(
            buckets.bucket(RomRole::Program),
            &[alloc::vec![1u8, 2], alloc::vec![3u8]]
        );
        assert_eq!(buckets.count(RomRole::Program), 2);
        assert_eq!(buckets.total_len(RomRole::Program), 3);
        assert_eq!(buckets.total_len(RomRole::Fix), 1);
        assert_eq!(buckets.count(RomRole::SpritePlaneA), 0);
    }
}
