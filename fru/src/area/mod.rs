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

//! Per-area codecs and the shared bookkeeping (`FieldVector`, the area envelope) they all build
//! on.

pub mod board;
pub mod chassis;
pub mod internal_use;
pub mod multi_record;
pub mod product;

use crate::error::{FruError, Result};
use crate::header::AreaKind;
use crate::string::{decode_one, FruString, END_OF_FIELDS};

pub use board::BoardInfoArea;
pub use chassis::ChassisInfoArea;
pub use internal_use::InternalUseArea;
pub use multi_record::{MultiRecordArea, MultiRecordElem};
pub use product::ProductInfoArea;

/// The ordered fixed-then-custom fields of a Chassis/Board/Product area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldVector {
    pub fixed: Vec<FruString>,
    pub custom: Vec<FruString>,
}

impl FieldVector {
    pub fn all(&self) -> impl Iterator<Item = &FruString> {
        self.fixed.iter().chain(self.custom.iter())
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut FruString> {
        self.fixed.iter_mut().chain(self.custom.iter_mut())
    }

    /// Bytes consumed by fixed + custom strings, not counting the end marker.
    pub fn fields_len(&self) -> usize {
        self.all().map(|s| s.raw_len).sum()
    }

    /// Re-derives every string's `offset` from `header_len` and marks any string whose offset
    /// moved as `changed` (per §4.4's "follower strings shift and are marked changed" rule).
    pub(crate) fn recompute_offsets(&mut self, header_len: usize) {
        let mut pos = header_len;
        for s in self.all_mut() {
            if s.offset != pos {
                s.offset = pos;
                s.changed = true;
            }
            pos += s.raw_len;
        }
    }
}

/// One's-complement checksum: the byte that makes `bytes` (plus the checksum itself) sum to 0
/// mod 256.
pub(crate) fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b)).wrapping_neg()
}

/// Decodes `fixed_count` fixed-position fields followed by zero or more custom fields, stopping
/// at the `0xC1` end marker. Fixed fields must all be present (even if empty); a premature marker
/// there is `BadFormat`.
pub(crate) fn decode_fields(
    data: &[u8],
    start: usize,
    lang_code: u8,
    force_english: bool,
    fixed_count: usize,
) -> Result<(FieldVector, usize)> {
    let mut pos = start;
    let mut fixed = Vec::with_capacity(fixed_count);
    for _ in 0..fixed_count {
        let (s, consumed) = decode_one(data, pos, lang_code, force_english)?
            .ok_or_else(|| FruError::bad_format(pos, "end-of-fields marker before all fixed fields"))?;
        fixed.push(s);
        pos += consumed;
    }
    let mut custom = Vec::new();
    loop {
        match decode_one(data, pos, lang_code, force_english)? {
            None => break,
            Some((s, consumed)) => {
                custom.push(s);
                pos += consumed;
            }
        }
    }
    Ok((FieldVector { fixed, custom }, pos))
}

/// Encodes `header` followed by every field, the end marker, zero padding, and a trailing
/// checksum, filling exactly `area_length` bytes.
pub(crate) fn encode_fields(header: &[u8], fields: &FieldVector, area_length: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(area_length);
    out.extend_from_slice(header);
    for s in fields.all() {
        out.extend(s.encode());
    }
    out.push(END_OF_FIELDS);
    out.resize(area_length - 1, 0);
    let sum = checksum(&out);
    out.push(sum);
    out
}

/// The decoded body of one area, keyed by [`AreaKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaBody {
    InternalUse(InternalUseArea),
    Chassis(ChassisInfoArea),
    Board(BoardInfoArea),
    Product(ProductInfoArea),
    MultiRecord(MultiRecordArea),
}

impl AreaBody {
    pub fn kind(&self) -> AreaKind {
        match self {
            AreaBody::InternalUse(_) => AreaKind::InternalUse,
            AreaBody::Chassis(_) => AreaKind::Chassis,
            AreaBody::Board(_) => AreaKind::Board,
            AreaBody::Product(_) => AreaKind::Product,
            AreaBody::MultiRecord(_) => AreaKind::MultiRecord,
        }
    }

    pub fn fields(&self) -> Option<&FieldVector> {
        match self {
            AreaBody::Chassis(a) => Some(&a.fields),
            AreaBody::Board(a) => Some(&a.fields),
            AreaBody::Product(a) => Some(&a.fields),
            AreaBody::InternalUse(_) | AreaBody::MultiRecord(_) => None,
        }
    }

    pub fn fields_mut(&mut self) -> Option<&mut FieldVector> {
        match self {
            AreaBody::Chassis(a) => Some(&mut a.fields),
            AreaBody::Board(a) => Some(&mut a.fields),
            AreaBody::Product(a) => Some(&mut a.fields),
            AreaBody::InternalUse(_) | AreaBody::MultiRecord(_) => None,
        }
    }
}

/// One area's envelope bookkeeping (§3) plus its decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRecord {
    pub offset: usize,
    pub length: usize,
    pub used_length: usize,
    pub orig_used_length: usize,
    pub changed: bool,
    pub rewrite: bool,
    pub body: AreaBody,
}

impl AreaRecord {
    pub fn kind(&self) -> AreaKind {
        self.body.kind()
    }

    pub(crate) fn new(offset: usize, length: usize, used_length: usize, body: AreaBody) -> Self {
        AreaRecord {
            offset,
            length,
            used_length,
            orig_used_length: used_length,
            changed: false,
            rewrite: false,
            body,
        }
    }

    /// Header-length prefix for fixed-layout areas (bytes before the FieldVector starts).
    fn header_len(&self) -> usize {
        match &self.body {
            AreaBody::Chassis(_) => chassis::HEADER_LEN,
            AreaBody::Board(_) => board::HEADER_LEN,
            AreaBody::Product(_) => product::HEADER_LEN,
            AreaBody::InternalUse(_) | AreaBody::MultiRecord(_) => 0,
        }
    }

    /// Full re-encode of this area's body into exactly `self.length` (or `self.used_length` for
    /// MultiRecord) bytes; always correct, regardless of dirty/rewrite state.
    pub(crate) fn encode_body(&self) -> Vec<u8> {
        match &self.body {
            AreaBody::InternalUse(a) => a.encode(self.length),
            AreaBody::Chassis(a) => a.encode(self.length),
            AreaBody::Board(a) => a.encode(self.length),
            AreaBody::Product(a) => a.encode(self.length),
            AreaBody::MultiRecord(a) => a.encode(),
        }
    }

    /// Byte ranges, relative to the start of the blob, that differ from the last committed
    /// image, per §4.4's delta rules. Empty when the area has no pending changes.
    pub(crate) fn delta_ranges(&self) -> Vec<(usize, usize)> {
        if !self.changed {
            return Vec::new();
        }
        if self.rewrite {
            let span = match self.body {
                AreaBody::MultiRecord(_) => self.used_length,
                _ => self.length,
            };
            return vec![(self.offset, span)];
        }

        let mut out = Vec::new();
        if let Some(fields) = self.body.fields() {
            for s in fields.all() {
                if s.changed {
                    out.push((self.offset + s.offset, s.raw_len));
                }
            }
            let header_len = self.header_len();
            let marker_pos = header_len + fields.fields_len();
            out.push((self.offset + marker_pos, 1));
            out.push((self.offset + self.length - 1, 1));
        }
        if let AreaBody::MultiRecord(mr) = &self.body {
            for (i, elem) in mr.elems.iter().enumerate() {
                if elem.changed {
                    out.push((self.offset + mr.elem_offset(i), elem.encoded_len()));
                }
            }
        }
        if self.used_length < self.orig_used_length {
            out.push((
                self.offset + self.used_length,
                self.orig_used_length - self.used_length,
            ));
        }
        out
    }

    /// Replaces a fixed field's value in place (§4.4 "Setting a string").
    pub fn set_fixed_string(&mut self, field_index: usize, value: crate::string::FieldValue) -> Result<()> {
        crate::string::validate_len(&value)?;
        let new_bytes = crate::string::encode_value(&value);
        let new_raw_len = new_bytes.len();
        let header_len = self.header_len();
        let fields = self
            .body
            .fields_mut()
            .ok_or_else(|| FruError::invalid_arg("area has no string fields"))?;
        let old = fields
            .fixed
            .get(field_index)
            .ok_or_else(|| FruError::invalid_arg(format!("field index {field_index} out of range")))?;
        let diff = new_raw_len as isize - old.raw_len as isize;
        let used_after = self.used_length as isize + diff;
        if used_after < 0 || used_after as usize > self.length {
            return Err(FruError::no_space((used_after.max(0)) as usize, self.length));
        }
        let (decoded, _) = crate::string::decode_one(&new_bytes, 0, crate::string::LANG_CODE_ENGLISH, true)?
            .expect("just-encoded string never decodes as the end marker");
        let slot = &mut fields.fixed[field_index];
        slot.kind = decoded.kind;
        slot.value = decoded.value;
        slot.raw_len = new_raw_len;
        slot.changed = true;
        fields.recompute_offsets(header_len);
        self.used_length = used_after as usize;
        self.changed = true;
        Ok(())
    }

    /// Replaces a custom field's value in place, without disturbing any other field's position
    /// (§4.4 "Setting a string"; mirrors `set_fixed_string`).
    pub fn set_custom_string(&mut self, custom_index: usize, value: crate::string::FieldValue) -> Result<()> {
        crate::string::validate_len(&value)?;
        let new_bytes = crate::string::encode_value(&value);
        let new_raw_len = new_bytes.len();
        let header_len = self.header_len();
        let fields = self
            .body
            .fields_mut()
            .ok_or_else(|| FruError::invalid_arg("area has no string fields"))?;
        let old = fields
            .custom
            .get(custom_index)
            .ok_or_else(|| FruError::invalid_arg(format!("custom field index {custom_index} out of range")))?;
        let diff = new_raw_len as isize - old.raw_len as isize;
        let used_after = self.used_length as isize + diff;
        if used_after < 0 || used_after as usize > self.length {
            return Err(FruError::no_space((used_after.max(0)) as usize, self.length));
        }
        let (decoded, _) = crate::string::decode_one(&new_bytes, 0, crate::string::LANG_CODE_ENGLISH, true)?
            .expect("just-encoded string never decodes as the end marker");
        let slot = &mut fields.custom[custom_index];
        slot.kind = decoded.kind;
        slot.value = decoded.value;
        slot.raw_len = new_raw_len;
        slot.changed = true;
        fields.recompute_offsets(header_len);
        self.used_length = used_after as usize;
        self.changed = true;
        Ok(())
    }

    /// Appends a new custom field, returning its index (§4.4).
    pub fn append_custom(&mut self, value: crate::string::FieldValue) -> Result<usize> {
        crate::string::validate_len(&value)?;
        let new_bytes = crate::string::encode_value(&value);
        let new_raw_len = new_bytes.len();
        let header_len = self.header_len();
        let used_after = self.used_length + new_raw_len;
        if used_after > self.length {
            return Err(FruError::no_space(used_after, self.length));
        }
        let fields = self
            .body
            .fields_mut()
            .ok_or_else(|| FruError::invalid_arg("area has no string fields"))?;
        let (decoded, _) = crate::string::decode_one(&new_bytes, 0, crate::string::LANG_CODE_ENGLISH, true)?
            .expect("just-encoded string never decodes as the end marker");
        fields.custom.push(crate::string::FruString { changed: true, ..decoded });
        fields.recompute_offsets(header_len);
        self.used_length = used_after;
        self.changed = true;
        Ok(fields.custom.len() - 1)
    }

    /// Deletes a custom field, shifting every following field down by one (§4.4).
    pub fn delete_custom(&mut self, custom_index: usize) -> Result<()> {
        let header_len = self.header_len();
        let fields = self
            .body
            .fields_mut()
            .ok_or_else(|| FruError::invalid_arg("area has no string fields"))?;
        if custom_index >= fields.custom.len() {
            return Err(FruError::invalid_arg(format!("custom field index {custom_index} out of range")));
        }
        let removed = fields.custom.remove(custom_index);
        fields.recompute_offsets(header_len);
        self.used_length -= removed.raw_len;
        self.changed = true;
        Ok(())
    }

    /// `set_record` (§6): `Some(index)` replaces an existing element, `None` appends a new one.
    /// Returns whether the record count toggled between zero and nonzero, so the caller can set
    /// the NormalFru's `header_changed` flag (§4.4 "Growing a multi-record").
    pub fn set_multi_record(&mut self, index: Option<usize>, type_id: u8, payload: Vec<u8>) -> Result<bool> {
        let mr = match &mut self.body {
            AreaBody::MultiRecord(mr) => mr,
            _ => return Err(FruError::invalid_arg("area is not a multi-record area")),
        };
        let was_empty = mr.elems.is_empty();
        let new_elem = MultiRecordElem::new(type_id, payload);
        let insert_at = index.unwrap_or(mr.elems.len());
        let diff = match index {
            Some(i) => {
                let old = mr.elems.get(i).ok_or_else(|| {
                    FruError::invalid_arg(format!("multi-record index {i} out of range"))
                })?;
                new_elem.encoded_len() as isize - old.encoded_len() as isize
            }
            None => new_elem.encoded_len() as isize,
        };
        let used_after = self.used_length as isize + diff;
        if used_after < 0 || used_after as usize > self.length {
            return Err(FruError::no_space(used_after.max(0) as usize, self.length));
        }
        match index {
            Some(i) => mr.elems[i] = new_elem,
            None => mr.elems.push(new_elem),
        }
        for elem in &mut mr.elems[insert_at..] {
            elem.changed = true;
        }
        self.used_length = used_after as usize;
        self.changed = true;
        Ok(was_empty != mr.elems.is_empty())
    }

    /// Deletes a multi-record element, shifting every following element down by one.
    pub fn delete_multi_record(&mut self, index: usize) -> Result<bool> {
        let mr = match &mut self.body {
            AreaBody::MultiRecord(mr) => mr,
            _ => return Err(FruError::invalid_arg("area is not a multi-record area")),
        };
        if index >= mr.elems.len() {
            return Err(FruError::invalid_arg(format!("multi-record index {index} out of range")));
        }
        let was_empty = mr.elems.is_empty();
        let removed = mr.elems.remove(index);
        for elem in &mut mr.elems[index..] {
            elem.changed = true;
        }
        self.used_length -= removed.encoded_len();
        self.changed = true;
        Ok(was_empty != mr.elems.is_empty())
    }
}
