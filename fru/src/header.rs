/*
Copyright 2026 corigan01

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT
OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

//! The 8-byte FRU header: format version, the five area offsets, and its own checksum.

use crate::error::{FruError, Result};

/// The five area kinds, in the order their offsets appear in the header and the order they must
/// appear in the blob (§4.1 monotonicity rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AreaKind {
    InternalUse = 0,
    Chassis = 1,
    Board = 2,
    Product = 3,
    MultiRecord = 4,
}

impl AreaKind {
    pub const ALL: [AreaKind; 5] = [
        AreaKind::InternalUse,
        AreaKind::Chassis,
        AreaKind::Board,
        AreaKind::Product,
        AreaKind::MultiRecord,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AreaKind::InternalUse => "internal use area",
            AreaKind::Chassis => "chassis info area",
            AreaKind::Board => "board info area",
            AreaKind::Product => "product info area",
            AreaKind::MultiRecord => "multi-record area",
        }
    }

    /// Whether this area has a declared, fixed `length` in the header (all but MultiRecord).
    pub fn has_fixed_length(self) -> bool {
        !matches!(self, AreaKind::MultiRecord)
    }

    fn header_byte_index(self) -> usize {
        self as usize + 1
    }
}

/// Bitmask selecting which areas an external fetch actually retrieved; areas outside the mask
/// are treated as absent even if their header offset is non-zero (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchMask(u8);

impl FetchMask {
    pub const ALL: FetchMask = FetchMask(0b1_1111);

    pub fn new(kinds: impl IntoIterator<Item = AreaKind>) -> Self {
        let mut mask = 0u8;
        for kind in kinds {
            mask |= 1 << (kind as u8);
        }
        FetchMask(mask)
    }

    pub fn contains(self, kind: AreaKind) -> bool {
        self.0 & (1 << (kind as u8)) != 0
    }
}

impl Default for FetchMask {
    fn default() -> Self {
        FetchMask::ALL
    }
}

pub const HEADER_LEN: usize = 8;
const FORMAT_VERSION: u8 = 1;

/// A present area's offset/length as derived by the header parser, before the area body itself
/// has been decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaSlot {
    pub kind: AreaKind,
    pub offset: usize,
    pub length: usize,
}

/// The parsed 8-byte FRU header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub format_version: u8,
    /// Raw `offset / 8` value per area slot, 0 meaning absent; index matches [`AreaKind`] order.
    offsets: [u8; 5],
}

impl Header {
    pub fn empty() -> Self {
        Header { format_version: FORMAT_VERSION, offsets: [0; 5] }
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(FruError::bad_format(0, "blob shorter than the 8-byte header"));
        }
        let header = &data[..HEADER_LEN];
        if header[0] & 0x0F != FORMAT_VERSION {
            return Err(FruError::bad_format(0, format!(
                "unsupported format_version {:#x}",
                header[0] & 0x0F
            )));
        }
        let sum: u8 = header.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        if sum != 0 {
            return Err(FruError::bad_format(0, "header checksum mismatch"));
        }
        Ok(Header {
            format_version: header[0] & 0x0F,
            offsets: [header[1], header[2], header[3], header[4], header[5]],
        })
    }

    pub fn offset_words(&self, kind: AreaKind) -> u8 {
        self.offsets[kind as usize]
    }

    pub fn set_offset_words(&mut self, kind: AreaKind, words: u8) {
        self.offsets[kind as usize] = words;
    }

    /// Resolves present-area offsets under `mask`, enforcing the strict-monotonicity invariant
    /// (§4.1). Lengths are left at `None`; the caller fills them in from blob end / next offset.
    pub fn present_slots(&self, mask: FetchMask) -> Result<Vec<(AreaKind, usize)>> {
        let mut slots = Vec::new();
        let mut last_offset = 0usize;
        for kind in AreaKind::ALL {
            if !mask.contains(kind) {
                continue;
            }
            let words = self.offsets[kind.header_byte_index() - 1];
            if words == 0 {
                continue;
            }
            let offset = words as usize * 8;
            if offset <= last_offset && !slots.is_empty() {
                return Err(FruError::bad_format(
                    kind.header_byte_index(),
                    format!("{} offset is not strictly increasing", kind.name()),
                ));
            }
            last_offset = offset;
            slots.push((kind, offset));
        }
        Ok(slots)
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0] = self.format_version;
        out[1] = self.offsets[0];
        out[2] = self.offsets[1];
        out[3] = self.offsets[2];
        out[4] = self.offsets[3];
        out[5] = self.offsets[4];
        out[6] = 0;
        let sum: u8 = out[..7].iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        out[7] = sum.wrapping_neg();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_decode() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0xFD];
        let header = Header::decode(&data).unwrap();
        assert_eq!(header.format_version, 1);
        assert_eq!(header.offset_words(AreaKind::Chassis), 2);
        assert_eq!(header.offset_words(AreaKind::Board), 0);
    }

    #[test]
    fn bad_version_rejected() {
        let data = [0x02, 0, 0, 0, 0, 0, 0, 0xFE];
        assert!(Header::decode(&data).is_err());
    }

    #[test]
    fn bad_checksum_rejected() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(Header::decode(&data).is_err());
    }

    #[test]
    fn non_monotonic_offsets_rejected() {
        let mut header = Header::empty();
        header.set_offset_words(AreaKind::Chassis, 4);
        header.set_offset_words(AreaKind::Board, 2);
        assert!(header.present_slots(FetchMask::ALL).is_err());
    }

    #[test]
    fn encode_round_trips_through_decode() {
        let mut header = Header::empty();
        header.set_offset_words(AreaKind::Chassis, 1);
        header.set_offset_words(AreaKind::Board, 3);
        let bytes = header.encode();
        let decoded = Header::decode(&bytes).unwrap();
        assert_eq!(decoded, header);
    }
}
