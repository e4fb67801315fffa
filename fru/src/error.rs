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

use thiserror::Error;

/// Errors surfaced by the FRU codec and in-memory model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FruError {
    /// Checksum mismatch, wrong version, truncation, field order violation, field overrun, or
    /// an invalid type/length byte.
    #[error("bad FRU format at offset {offset}: {reason}")]
    BadFormat { offset: usize, reason: String },

    /// Operation on an absent area, or an out-of-range array index.
    #[error("not present: {what}")]
    NotPresent { what: String },

    /// `add_area` on an already-present area.
    #[error("area already exists: {what}")]
    Exists { what: String },

    /// Growth would exceed the area's reserved capacity.
    #[error("no space: needed {needed} bytes, {available} available")]
    NoSpace { needed: usize, available: usize },

    /// Bad offset alignment, zero length, unknown field index, or bad enum value.
    #[error("invalid argument: {reason}")]
    InvalidArg { reason: String },

    /// Attempt to set a read-only field (e.g. a version byte).
    #[error("field is read-only: {field}")]
    ReadOnly { field: String },

    /// Allocation failure.
    #[error("out of memory")]
    OutOfMemory,
}

impl FruError {
    pub(crate) fn bad_format(offset: usize, reason: impl Into<String>) -> Self {
        Self::BadFormat { offset, reason: reason.into() }
    }

    pub(crate) fn not_present(what: impl Into<String>) -> Self {
        Self::NotPresent { what: what.into() }
    }

    pub(crate) fn exists(what: impl Into<String>) -> Self {
        Self::Exists { what: what.into() }
    }

    pub(crate) fn no_space(needed: usize, available: usize) -> Self {
        Self::NoSpace { needed, available }
    }

    pub(crate) fn invalid_arg(reason: impl Into<String>) -> Self {
        Self::InvalidArg { reason: reason.into() }
    }

    pub(crate) fn read_only(field: impl Into<String>) -> Self {
        Self::ReadOnly { field: field.into() }
    }
}

pub type Result<T> = core::result::Result<T, FruError>;
