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

//! Chassis Info Area: `[version][length/8][chassis_type]` + fields, forced to ASCII regardless
//! of any language code (chassis area carries no language byte of its own).

use super::{checksum, decode_fields, encode_fields, FieldVector};
use crate::error::{FruError, Result};

pub const HEADER_LEN: usize = 3;
pub const FIXED_NAMES: [&str; 2] = ["part_number", "serial_number"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChassisInfoArea {
    pub version: u8,
    pub chassis_type: u8,
    pub fields: FieldVector,
}

impl ChassisInfoArea {
    pub fn empty(chassis_type: u8) -> Self {
        ChassisInfoArea {
            version: 1,
            chassis_type,
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
            return Err(FruError::bad_format(0, "chassis info area shorter than its header"));
        }
        if data[0] & 0x0F != 1 {
            return Err(FruError::bad_format(0, "unsupported chassis info area version"));
        }
        let length = data[1] as usize * 8;
        if length == 0 || length > data.len() {
            return Err(FruError::bad_format(1, "chassis info area length out of range"));
        }
        if checksum(&data[..length - 1]) != data[length - 1] {
            return Err(FruError::bad_format(length - 1, "chassis info area checksum mismatch"));
        }
        let chassis_type = data[2];
        let (fields, _) = decode_fields(data, HEADER_LEN, 0, true, FIXED_NAMES.len())?;
        Ok((ChassisInfoArea { version: 1, chassis_type, fields }, length))
    }

    pub(crate) fn encode(&self, length: usize) -> Vec<u8> {
        let header = [self.version, (length / 8) as u8, self.chassis_type];
        encode_fields(&header, &self.fields, length)
    }
}
