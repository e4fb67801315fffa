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

//! Multi-Record Area: a sequence of `[type][0x02|eol][len][data_cksum][hdr_cksum]` elements, each
//! followed by its payload, terminated by the end-of-list bit.

use super::checksum;
use crate::error::{FruError, Result};

const ELEM_HEADER_LEN: usize = 5;
const ELEM_FORMAT_VERSION: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiRecordElem {
    pub type_id: u8,
    pub format_version: u8,
    pub payload: Vec<u8>,
    pub(crate) changed: bool,
}

impl MultiRecordElem {
    pub fn new(type_id: u8, payload: Vec<u8>) -> Self {
        MultiRecordElem { type_id, format_version: ELEM_FORMAT_VERSION, payload, changed: true }
    }

    pub(crate) fn encoded_len(&self) -> usize {
        ELEM_HEADER_LEN + self.payload.len()
    }

    fn encode(&self, end_of_list: bool) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.push(self.type_id);
        out.push(ELEM_FORMAT_VERSION | if end_of_list { 0x80 } else { 0 });
        out.push(self.payload.len() as u8);
        out.push(checksum(&self.payload));
        let hdr_cksum = checksum(&out);
        out.push(hdr_cksum);
        out.extend_from_slice(&self.payload);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiRecordArea {
    pub elems: Vec<MultiRecordElem>,
}

impl MultiRecordArea {
    pub fn empty() -> Self {
        MultiRecordArea::default()
    }

    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        let mut elems = Vec::new();
        let mut pos = 0usize;
        loop {
            let header = data.get(pos..pos + ELEM_HEADER_LEN).ok_or_else(|| {
                FruError::bad_format(pos, format!("multi-record element {} header truncated", elems.len()))
            })?;
            if checksum(&header[..4]) != header[4] {
                return Err(FruError::bad_format(
                    pos,
                    format!("multi-record element {} header checksum mismatch", elems.len()),
                ));
            }
            let type_id = header[0];
            let format_version = header[1] & 0x0F;
            let end_of_list = header[1] & 0x80 != 0;
            let len = header[2] as usize;
            let data_cksum = header[3];
            let payload_start = pos + ELEM_HEADER_LEN;
            let payload = data.get(payload_start..payload_start + len).ok_or_else(|| {
                FruError::bad_format(pos, format!("multi-record element {} payload overruns area", elems.len()))
            })?;
            if checksum(payload) != data_cksum {
                return Err(FruError::bad_format(
                    payload_start,
                    format!("multi-record element {} data checksum mismatch", elems.len()),
                ));
            }
            elems.push(MultiRecordElem {
                type_id,
                format_version,
                payload: payload.to_vec(),
                changed: false,
            });
            pos = payload_start + len;
            if end_of_list {
                break;
            }
        }
        Ok((MultiRecordArea { elems }, pos))
    }

    pub(crate) fn used_length(&self) -> usize {
        self.elems.iter().map(|e| e.encoded_len()).sum()
    }

    pub(crate) fn elem_offset(&self, index: usize) -> usize {
        self.elems[..index].iter().map(|e| e.encoded_len()).sum()
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.used_length());
        let last = self.elems.len().saturating_sub(1);
        for (i, elem) in self.elems.iter().enumerate() {
            out.extend(elem.encode(i == last));
        }
        out
    }
}
