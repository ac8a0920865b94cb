// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! Sprite (C ROM) image handling.
//!
//! Neo Geo sprite graphics are split across pairs of ROMs, one holding the
//! odd bytes and the other the even bytes.  The NEO-SD format stores each
//! pair as a single byte-interleaved image.

use alloc::vec::Vec;

use crate::rom::{RomBuckets, RomRole};
use crate::{Error, Result};

/// Interleaves a sprite ROM pair into a single image.
///
/// The output is twice the length of either input, with `a` on the even
/// offsets and `b` on the odd offsets.  Both planes must be the same length.
pub fn interleave(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    if a.len() != b.len() {
        return Err(Error::PlaneLengthMismatch {
            len_a: a.len(),
            len_b: b.len(),
        });
    }

    let mut out = Vec::with_capacity(a.len() * 2);
    for (byte_a, byte_b) in a.iter().zip(b.iter()) {
        out.push(*byte_a);
        out.push(*byte_b);
    }

    Ok(out)
}

/// Splits an interleaved sprite image back into its two planes.
///
/// Inverse of [`interleave`].
pub fn deinterleave(data: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    if data.len() % 2 != 0 {
        return Err(Error::PlaneLengthMismatch {
            len_a: data.len().div_ceil(2),
            len_b: data.len() / 2,
        });
    }

    let a = data.iter().step_by(2).copied().collect();
    let b = data.iter().skip(1).step_by(2).copied().collect();

    Ok((a, b))
}

/// Checks the two sprite plane buckets can be paired up.
///
/// Both the number of files and the combined byte counts must match.
/// Individual pairs are length checked again when interleaved.
pub fn validate_sprite_planes(a: &[Vec<u8>], b: &[Vec<u8>]) -> Result<()> {
    let total_a: usize = a.iter().map(|data| data.len()).sum();
    let total_b: usize = b.iter().map(|data| data.len()).sum();

    if a.len() != b.len() || total_a != total_b {
        return Err(Error::SpritePlaneMismatch {
            count_a: a.len(),
            count_b: b.len(),
            total_a,
            total_b,
        });
    }

    Ok(())
}

/// Interleaves every sprite ROM pair held in `buckets`.
///
/// The k-th plane A image is paired with the k-th plane B image.  Returns
/// one image per pair, in order.  Buckets should have been through
/// [`validate_sprite_planes`] first, as unpaired images are ignored here.
pub(crate) fn sprite_images(buckets: &RomBuckets) -> Result<Vec<Vec<u8>>> {
    let a = buckets.bucket(RomRole::SpritePlaneA);
    let b = buckets.bucket(RomRole::SpritePlaneB);

    a.iter()
        .zip(b.iter())
        .map(|(plane_a, plane_b)| interleave(plane_a, plane_b))
        .collect()
}
