// Copyright (C) 2025 Piers Finlayson <piers@piers.rocks>
//
// MIT License

//! neosd-parser
//!
//! Contains code and internal structures for parsing the NEO-SD header

use deku::prelude::*;
use log::debug;
use neosd_gen::HEADER_MAGIC;
use neosd_gen::meta::{MAX_COMPANY_LEN, MAX_NAME_LEN};

use crate::Error;

#[derive(Debug, DekuRead)]
#[deku(endian = "little", magic = b"NEO\x01")]
// Used internally to construct [`NeoHeader`](crate::NeoHeader)
//
// Reflects `NeoFile` from the NEO-SD documentation.  The remainder of the
// 4096 byte header is filler.
pub(crate) struct NeoFileHeader {
    #[deku(endian = "little")]
    pub p_size: u32,
    #[deku(endian = "little")]
    pub s_size: u32,
    #[deku(endian = "little")]
    pub m_size: u32,
    #[deku(endian = "little")]
    pub v1_size: u32,
    #[deku(endian = "little")]
    pub v2_size: u32,
    #[deku(endian = "little")]
    pub c_size: u32,
    #[deku(endian = "little")]
    pub year: u32,
    #[deku(endian = "little")]
    pub genre: u32,
    #[deku(endian = "little")]
    pub screenshot: u32,
    #[deku(endian = "little")]
    pub ngh: u32,
    pub name: [u8; MAX_NAME_LEN + 1],
    pub manu: [u8; MAX_COMPANY_LEN + 1],
}

impl NeoFileHeader {
    // Bytes actually described by the structure, magic included
    const NEO_FILE_HEADER_SIZE: usize = 94;

    pub(crate) const fn size() -> usize {
        Self::NEO_FILE_HEADER_SIZE
    }
}

/// Parse and validate the NEO-SD header from the start of a buffer
pub(crate) fn parse_and_validate_header(data: &[u8]) -> Result<NeoFileHeader, Error> {
    if data.len() < NeoFileHeader::size() {
        return Err(Error::TooSmall {
            len: data.len(),
            required: NeoFileHeader::size(),
        });
    }

    // Check the magic ourselves, for a clearer error than deku gives
    if &data[0..4] != HEADER_MAGIC {
        let mut found = [0u8; 4];
        found.copy_from_slice(&data[0..4]);
        return Err(Error::BadMagic { found });
    }

    let (_, header) = NeoFileHeader::from_bytes((data, 0))
        .map_err(|e| Error::Header(format!("Failed to parse header: {}", e)))?;

    debug!(
        "Parsed header: P={:#X} S={:#X} M={:#X} V1={:#X} V2={:#X} C={:#X}",
        header.p_size, header.s_size, header.m_size, header.v1_size, header.v2_size, header.c_size
    );

    Ok(header)
}

/// Text from a NUL terminated (or completely full) header field
pub(crate) fn field_text(field: &[u8]) -> String {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_text() {
        assert_eq!(field_text(b"SNK\0\0\0"), "SNK");
        assert_eq!(field_text(b"FULL"), "FULL");
        assert_eq!(field_text(b"\0junk"), "");
    }

    #[test]
    fn test_parse_too_small() {
        assert!(matches!(
            parse_and_validate_header(b"NEO\x01"),
            Err(Error::TooSmall { len: 4, required: 94 })
        ));
    }

    #[test]
    fn test_parse_bad_magic() {
        let mut data = vec![0u8; 4096];
        data[0..4].copy_from_slice(b"NEO\x02");
        assert!(matches!(
            parse_and_validate_header(&data),
            Err(Error::BadMagic { found }) if &found == b"NEO\x02"
        ));
    }
}
