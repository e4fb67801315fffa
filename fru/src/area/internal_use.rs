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

//! Internal Use Area: a version byte followed by an opaque, caller-defined payload. No checksum.

use crate::error::{FruError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalUseArea {
    pub version: u8,
    pub payload: Vec<u8>,
}

impl InternalUseArea {
    pub fn empty(capacity: usize) -> Self {
        InternalUseArea { version: 1, payload: vec![0u8; capacity.saturating_sub(1)] }
    }

    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        if data.is_empty() {
            return Err(FruError::bad_format(0, "internal use area is empty"));
        }
        if data[0] & 0x0F != 1 {
            return Err(FruError::bad_format(0, "unsupported internal use area version"));
        }
        Ok((InternalUseArea { version: data[0], payload: data[1..].to_vec() }, data.len()))
    }

    pub(crate) fn encode(&self, length: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(length);
        out.push(self.version);
        out.extend_from_slice(&self.payload);
        out.resize(length, 0);
        out
    }
}
