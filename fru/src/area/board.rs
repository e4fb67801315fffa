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

//! Board Info Area: `[version][length/8][lang_code][mfg_time: 24-bit LE]` + fields.

use super::{checksum, decode_fields, encode_fields, FieldVector};
use crate::error::{FruError, Result};
use crate::time::{fru_minutes_to_unix, unix_to_fru_minutes};

pub const HEADER_LEN: usize = 6;
pub const FIXED_NAMES: [&str; 5] =
    ["manufacturer", "product_name", "serial_number", "part_number", "fru_file_id"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardInfoArea {
    pub version: u8,
    pub lang_code: u8,
    pub mfg_time_unix: i64,
    pub fields: FieldVector,
}

impl BoardInfoArea {
    pub fn empty(lang_code: u8, mfg_time_unix: i64) -> Self {
        BoardInfoArea {
            version: 1,
            lang_code,
            mfg_time_unix,
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
            return Err(FruError::bad_format(0, "board info area shorter than its header"));
        }
        if data[0] & 0x0F != 1 {
            return Err(FruError::bad_format(0, "unsupported board info area version"));
        }
        let length = data[1] as usize * 8;
        if length == 0 || length > data.len() {
            return Err(FruError::bad_format(1, "board info area length out of range"));
        }
        if checksum(&data[..length - 1]) != data[length - 1] {
            return Err(FruError::bad_format(length - 1, "board info area checksum mismatch"));
        }
        let lang_code = data[2];
        let mfg_time_unix = fru_minutes_to_unix([data[3], data[4], data[5]]);
        let (fields, _) = decode_fields(data, HEADER_LEN, lang_code, false, FIXED_NAMES.len())?;
        Ok((BoardInfoArea { version: 1, lang_code, mfg_time_unix, fields }, length))
    }

    pub(crate) fn encode(&self, length: usize) -> Vec<u8> {
        let minutes = unix_to_fru_minutes(self.mfg_time_unix);
        let header =
            [self.version, (length / 8) as u8, self.lang_code, minutes[0], minutes[1], minutes[2]];
        encode_fields(&header, &self.fields, length)
    }
}
