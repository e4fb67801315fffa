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

//! IPMI Platform Management FRU Information codec and in-memory model.
//!
//! Decodes and mutates the "normal" (non-OEM-format) FRU layout described by the IPMI Platform
//! Management FRU Information Storage Definition: an 8-byte header pointing at up to five areas
//! (internal-use, chassis, board, product, multi-record), each independently checksummed. Mutation
//! tracks a minimal byte-range delta so a caller can write back only what changed.

pub mod area;
pub mod error;
pub mod field;
pub mod fru;
pub mod header;
pub mod oem;
pub mod string;
pub mod time;

pub use crate::error::{FruError, Result};
pub use crate::fru::{DeltaList, NormalFru};
pub use crate::header::{AreaKind, FetchMask};
pub use crate::string::FieldValue;
