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

//! Product Info Area: `[version][length/8][lang_code]` + fields.

use super::{checksum, decode_fields, encode_fields, FieldVector};
use crate::error::{FruError, Result};

pub const HEADER_LEN: usize = 3;
pub const FIXED_NAMES: [&str; 7] = [
    "manufacturer",
    "product_name",
    "part_number",
    "product_version",
    "serial_number",
    "asset_tag",
    "fru_file_id",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfoArea {
    pub version: u8,
    pub lang_code: u8,
    pub fields: FieldVector,
}

impl ProductInfoArea {
    pub fn empty(lang_code: u8) -> Self {
        ProductInfoArea {
            version: 1,
            lang_code,
            fields: FieldVector {
                fixed: (0..FIXED_NAMES.len())
                    .scan(HEADER_LEN, |pos, _| {
                        let s = crate::string::FruString::empty_ascii(*pos);
                        *pos += s.raw_len;
                        Some(s)
                    })
                    .collect(),
                custom: Vec::new(),
            },
        }
    }

    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < HEADER_LEN {
            return Err(FruError::bad_format(0, "product info area shorter than its header"));
        }
        if data[0] & 0x0F != 1 {
            return Err(FruError::bad_format(0, "unsupported product info area version"));
        }
        let length = data[1] as usize * 8;
        if length == 0 || length > data.len() {
            return Err(FruError::bad_format(1, "product info area length out of range"));
        }
        if checksum(&data[..length - 1]) != data[length - 1] {
            return Err(FruError::bad_format(length - 1, "product info area checksum mismatch"));
        }
        let lang_code = data[2];
        let (fields, _) = decode_fields(data, HEADER_LEN, lang_code, false, FIXED_NAMES.len())?;
        Ok((ProductInfoArea { version: 1, lang_code, fields }, length))
    }

    pub(crate) fn encode(&self, length: usize) -> Vec<u8> {
        let header = [self.version, (length / 8) as u8, self.lang_code];
        encode_fields(&header, &self.fields, length)
    }
}
