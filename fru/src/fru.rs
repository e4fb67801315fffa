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

//! [`NormalFru`]: the in-memory model tying the header and its five areas together, plus the
//! decode/encode/write-back lifecycle.

use crate::area::{
    board::BoardInfoArea, chassis::ChassisInfoArea, internal_use::InternalUseArea,
    multi_record::MultiRecordArea, product::ProductInfoArea, AreaBody, AreaRecord,
};
use crate::error::{FruError, Result};
use crate::header::{AreaKind, FetchMask, Header, HEADER_LEN};
use crate::oem::{self, FruNode};

/// Byte ranges, relative to the start of the blob, that must be rewritten to commit pending
/// mutations (§3, §4.4).
pub type DeltaList = Vec<(usize, usize)>;

/// The in-memory model of one FRU blob: the header plus up to five present areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalFru {
    header: Header,
    areas: [Option<AreaRecord>; 5],
    header_changed: bool,
    blob_capacity: usize,
}

impl NormalFru {
    /// A fresh, area-less FRU over a blob of `blob_capacity` bytes (§3 "Lifecycle").
    pub fn new(blob_capacity: usize) -> Self {
        NormalFru {
            header: Header::empty(),
            areas: Default::default(),
            header_changed: true,
            blob_capacity,
        }
    }

    /// Decodes a complete blob into a [`NormalFru`] (§4.1).
    pub fn decode(blob: &[u8], mask: FetchMask) -> Result<Self> {
        let span = tracing::info_span!("fru_decode");
        let _enter = span.enter();

        let header = Header::decode(blob)?;
        let slots = header.present_slots(mask)?;
        let mut areas: [Option<AreaRecord>; 5] = Default::default();

        for (i, &(kind, offset)) in slots.iter().enumerate() {
            let next_offset = slots.get(i + 1).map(|&(_, o)| o).unwrap_or(blob.len());
            if offset >= blob.len() {
                return Err(FruError::bad_format(offset, format!("{} offset past end of blob", kind.name())));
            }
            let area_data = &blob[offset..next_offset.min(blob.len())];
            let record = decode_area(kind, offset, area_data)?;
            tracing::debug!(area = kind.name(), offset, length = record.length, "decoded area");
            areas[kind as usize] = Some(record);
        }

        Ok(NormalFru { header, areas, header_changed: false, blob_capacity: blob.len() })
    }

    /// Re-encodes every dirty area (and the header, if changed) into `blob`, returning the byte
    /// ranges that actually need to be written back (§4.4).
    pub fn encode(&mut self, blob: &mut [u8]) -> Result<DeltaList> {
        let span = tracing::info_span!("fru_encode");
        let _enter = span.enter();

        let mut deltas = DeltaList::new();
        for area in self.areas.iter().flatten() {
            let bytes = area.encode_body();
            let end = area.offset + bytes.len();
            if end > blob.len() {
                return Err(FruError::no_space(end, blob.len()));
            }
            blob[area.offset..end].copy_from_slice(&bytes);
            deltas.extend(area.delta_ranges());
        }
        if self.header_changed {
            let bytes = self.header.encode();
            blob[..HEADER_LEN].copy_from_slice(&bytes);
            deltas.push((0, HEADER_LEN));
        }
        Ok(deltas)
    }

    /// Clears all dirty flags and snapshots `orig_used_length` after a successful write-back
    /// (§4.4).
    pub fn write_complete(&mut self) {
        for area in self.areas.iter_mut().flatten() {
            area.changed = false;
            area.rewrite = false;
            area.orig_used_length = area.used_length;
            if let Some(fields) = area.body.fields_mut() {
                for s in fields.all_mut() {
                    s.changed = false;
                }
            }
            if let AreaBody::MultiRecord(mr) = &mut area.body {
                for e in mr.elems.iter_mut() {
                    e.changed = false;
                }
            }
        }
        self.header_changed = false;
    }

    pub fn area(&self, kind: AreaKind) -> Option<&AreaRecord> {
        self.areas[kind as usize].as_ref()
    }

    pub fn area_mut(&mut self, kind: AreaKind) -> Option<&mut AreaRecord> {
        self.areas[kind as usize].as_mut()
    }

    fn admit_span(&self, kind: AreaKind, offset: usize, length: usize) -> Result<()> {
        if offset % 8 != 0 || offset < HEADER_LEN || offset > 2040 {
            return Err(FruError::invalid_arg(format!("offset {offset} is not a valid area offset")));
        }
        if kind.has_fixed_length() && length % 8 != 0 {
            return Err(FruError::invalid_arg(format!("length {length} is not a multiple of 8")));
        }
        if length > self.blob_capacity.saturating_sub(offset) {
            return Err(FruError::invalid_arg("area does not fit in the blob"));
        }
        let new_end = offset + length;
        for (other_kind, other) in AreaKind::ALL.iter().zip(self.areas.iter()) {
            if *other_kind == kind {
                continue;
            }
            if let Some(rec) = other {
                let other_end = rec.offset + rec.length;
                if offset < other_end && rec.offset < new_end {
                    return Err(FruError::invalid_arg(format!(
                        "{} overlaps {}",
                        kind.name(),
                        other_kind.name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Adds a fresh, field-less area at `offset` with capacity `length` (§4.1).
    pub fn add_area(&mut self, kind: AreaKind, offset: usize, length: usize) -> Result<()> {
        if self.areas[kind as usize].is_some() {
            tracing::warn!(area = kind.name(), "rejected add_area: area already present");
            return Err(FruError::exists(kind.name()));
        }
        if let Err(e) = self.admit_span(kind, offset, length) {
            tracing::warn!(area = kind.name(), offset, length, "rejected add_area");
            return Err(e);
        }
        let body = empty_body(kind, length);
        let used_length = initial_used_length(&body);
        self.areas[kind as usize] = Some(AreaRecord::new(offset, length, used_length, body));
        let word = if kind == AreaKind::MultiRecord && used_length == 0 {
            0
        } else {
            (offset / 8) as u8
        };
        self.header.set_offset_words(kind, word);
        self.header_changed = true;
        Ok(())
    }

    /// Removes a present area, freeing its header slot (§4.1 companion operation).
    pub fn delete_area(&mut self, kind: AreaKind) -> Result<()> {
        if self.areas[kind as usize].take().is_none() {
            return Err(FruError::not_present(kind.name()));
        }
        self.header.set_offset_words(kind, 0);
        self.header_changed = true;
        Ok(())
    }

    pub fn area_get_offset(&self, kind: AreaKind) -> Result<usize> {
        self.area(kind).map(|a| a.offset).ok_or_else(|| FruError::not_present(kind.name()))
    }

    pub fn area_get_length(&self, kind: AreaKind) -> Result<usize> {
        self.area(kind).map(|a| a.length).ok_or_else(|| FruError::not_present(kind.name()))
    }

    pub fn area_get_used_length(&self, kind: AreaKind) -> Result<usize> {
        self.area(kind).map(|a| a.used_length).ok_or_else(|| FruError::not_present(kind.name()))
    }

    /// Moves a present area; marks it (and the header) for a full rewrite (§4.4).
    ///
    /// MultiRecord has no declared length (§4.3.1): it runs to the end of its reserved span by
    /// convention, so a move recomputes `length` to keep that end boundary fixed rather than
    /// carrying the old length to the new offset unchanged.
    pub fn area_set_offset(&mut self, kind: AreaKind, new_offset: usize) -> Result<()> {
        let old_offset = self.area_get_offset(kind)?;
        let length = self.area_get_length(kind)?;
        let new_length = if kind == AreaKind::MultiRecord {
            (length + old_offset)
                .checked_sub(new_offset)
                .ok_or_else(|| FruError::invalid_arg("multi-record area would end before it starts"))?
        } else {
            length
        };
        self.admit_span(kind, new_offset, new_length)?;
        let area = self.area_mut(kind).expect("presence checked above");
        if new_length < area.used_length {
            return Err(FruError::no_space(area.used_length, new_length));
        }
        area.offset = new_offset;
        area.length = new_length;
        area.rewrite = true;
        area.changed = true;
        let word = if kind == AreaKind::MultiRecord && area.used_length == 0 {
            0
        } else {
            (new_offset / 8) as u8
        };
        self.header.set_offset_words(kind, word);
        self.header_changed = true;
        Ok(())
    }

    /// Grows or shrinks a present area's reserved capacity; marks it for a full rewrite (§4.4).
    pub fn area_set_length(&mut self, kind: AreaKind, new_length: usize) -> Result<()> {
        let offset = self.area_get_offset(kind)?;
        self.admit_span(kind, offset, new_length)?;
        let area = self.area_mut(kind).expect("presence checked above");
        if new_length < area.used_length {
            return Err(FruError::no_space(area.used_length, new_length));
        }
        area.length = new_length;
        area.rewrite = true;
        area.changed = true;
        self.header_changed = true;
        Ok(())
    }

    fn multi_record_area(&self) -> Result<&MultiRecordArea> {
        match self.area(AreaKind::MultiRecord).map(|a| &a.body) {
            Some(AreaBody::MultiRecord(mr)) => Ok(mr),
            _ => Err(FruError::not_present(AreaKind::MultiRecord.name())),
        }
    }

    fn multi_record_elem(&self, index: usize) -> Result<&crate::area::MultiRecordElem> {
        self.multi_record_area()?
            .elems
            .get(index)
            .ok_or_else(|| FruError::not_present(format!("multi-record index {index}")))
    }

    /// The number of elements currently present in the multi-record area (§6 `num_records`).
    pub fn num_multi_records(&self) -> Result<usize> {
        Ok(self.multi_record_area()?.elems.len())
    }

    /// `get_type` (§6).
    pub fn multi_record_get_type(&self, index: usize) -> Result<u8> {
        Ok(self.multi_record_elem(index)?.type_id)
    }

    /// `get_format_version` (§6).
    pub fn multi_record_get_format_version(&self, index: usize) -> Result<u8> {
        Ok(self.multi_record_elem(index)?.format_version)
    }

    /// `get_data_len` (§6).
    pub fn multi_record_get_data_len(&self, index: usize) -> Result<usize> {
        Ok(self.multi_record_elem(index)?.payload.len())
    }

    /// `get_data` (§6).
    pub fn multi_record_get_data(&self, index: usize) -> Result<&[u8]> {
        Ok(&self.multi_record_elem(index)?.payload)
    }

    /// `set_record` (§6): `index = None` appends a new element; `data = None` deletes the element
    /// at `index` (which must then be `Some`). Toggling the record count between zero and
    /// nonzero flips the header's MultiRecord offset byte between 0 and its real value (§4.4).
    pub fn multi_record_set(
        &mut self,
        index: Option<usize>,
        type_id: u8,
        data: Option<Vec<u8>>,
    ) -> Result<()> {
        let offset_words = self.header.offset_words(AreaKind::MultiRecord);
        let area = self
            .area_mut(AreaKind::MultiRecord)
            .ok_or_else(|| FruError::not_present(AreaKind::MultiRecord.name()))?;
        let toggled = match data {
            Some(payload) => area.set_multi_record(index, type_id, payload)?,
            None => {
                let index = index.ok_or_else(|| {
                    FruError::invalid_arg("deleting a multi-record requires an index")
                })?;
                area.delete_multi_record(index)?
            }
        };
        if toggled {
            let now_nonempty = match &area.body {
                AreaBody::MultiRecord(mr) => !mr.elems.is_empty(),
                _ => unreachable!(),
            };
            let word = if now_nonempty { (area.offset / 8) as u8 } else { 0 };
            debug_assert!(now_nonempty || offset_words != 0);
            self.header.set_offset_words(AreaKind::MultiRecord, word);
            self.header_changed = true;
        }
        Ok(())
    }

    /// `multi_record_get_root_node` (§6): dispatches the element's payload to the registered OEM
    /// decoder. The manufacturer id is always read from the payload's first 3 bytes (LE), as the
    /// standards-defined decoders ignore it and OEM records carry it there by convention.
    pub fn multi_record_get_root_node(&self, index: usize) -> Result<FruNode> {
        let elem = self.multi_record_elem(index)?;
        if elem.payload.len() < 3 {
            return Err(FruError::invalid_arg("multi-record payload shorter than 3 bytes"));
        }
        let manufacturer_id = elem.payload[0] as u32
            | (elem.payload[1] as u32) << 8
            | (elem.payload[2] as u32) << 16;
        oem::decode(manufacturer_id, elem.type_id, &elem.payload)
    }
}

fn initial_used_length(body: &AreaBody) -> usize {
    match body {
        AreaBody::InternalUse(a) => 1 + a.payload.len(),
        AreaBody::Chassis(a) => crate::area::chassis::HEADER_LEN + a.fields.fields_len() + 2,
        AreaBody::Board(a) => crate::area::board::HEADER_LEN + a.fields.fields_len() + 2,
        AreaBody::Product(a) => crate::area::product::HEADER_LEN + a.fields.fields_len() + 2,
        AreaBody::MultiRecord(mr) => mr.used_length(),
    }
}

fn empty_body(kind: AreaKind, length: usize) -> AreaBody {
    match kind {
        AreaKind::InternalUse => AreaBody::InternalUse(InternalUseArea::empty(length)),
        AreaKind::Chassis => AreaBody::Chassis(ChassisInfoArea::empty(0)),
        AreaKind::Board => AreaBody::Board(BoardInfoArea::empty(crate::string::LANG_CODE_ENGLISH, 0)),
        AreaKind::Product => AreaBody::Product(ProductInfoArea::empty(crate::string::LANG_CODE_ENGLISH)),
        AreaKind::MultiRecord => AreaBody::MultiRecord(MultiRecordArea::empty()),
    }
}

fn decode_area(kind: AreaKind, offset: usize, data: &[u8]) -> Result<AreaRecord> {
    let (body, length) = match kind {
        AreaKind::InternalUse => {
            let (a, len) = InternalUseArea::decode(data)?;
            (AreaBody::InternalUse(a), len)
        }
        AreaKind::Chassis => {
            let (a, len) = ChassisInfoArea::decode(data)?;
            (AreaBody::Chassis(a), len)
        }
        AreaKind::Board => {
            let (a, len) = BoardInfoArea::decode(data)?;
            (AreaBody::Board(a), len)
        }
        AreaKind::Product => {
            let (a, len) = ProductInfoArea::decode(data)?;
            (AreaBody::Product(a), len)
        }
        AreaKind::MultiRecord => {
            let (a, used) = MultiRecordArea::decode(data)?;
            let body = AreaBody::MultiRecord(a);
            return Ok(AreaRecord::new(offset, data.len(), used, body));
        }
    };
    let used_length = initial_used_length(&body);
    Ok(AreaRecord::new(offset, length, used_length, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::FieldValue;

    fn checksum(bytes: &[u8]) -> u8 {
        bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b)).wrapping_neg()
    }

    fn header_bytes(chassis_off: u8) -> [u8; 8] {
        let mut h = [1u8, 0, chassis_off, 0, 0, 0, 0, 0];
        h[7] = checksum(&h[..7]);
        h
    }

    #[test]
    fn decode_minimal_header_only() {
        let blob = header_bytes(0);
        let fru = NormalFru::decode(&blob, FetchMask::ALL).unwrap();
        assert!(fru.area(AreaKind::Chassis).is_none());
    }

    #[test]
    fn add_area_then_encode_round_trips() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::Chassis, 8, 16).unwrap();
        let mut blob = vec![0u8; 64];
        let deltas = fru.encode(&mut blob).unwrap();
        assert!(!deltas.is_empty());

        let decoded = NormalFru::decode(&blob, FetchMask::ALL).unwrap();
        assert!(decoded.area(AreaKind::Chassis).is_some());
    }

    #[test]
    fn set_fixed_string_grows_used_length_and_emits_delta() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::Chassis, 8, 16).unwrap();
        let mut blob = vec![0u8; 64];
        fru.encode(&mut blob).unwrap();
        fru.write_complete();

        let area = fru.area_mut(AreaKind::Chassis).unwrap();
        area.set_fixed_string(0, FieldValue::Ascii("ABC".into())).unwrap();

        let deltas = fru.encode(&mut blob).unwrap();
        assert!(!deltas.is_empty());
        let decoded = NormalFru::decode(&blob, FetchMask::ALL).unwrap();
        let area = decoded.area(AreaKind::Chassis).unwrap();
        assert_eq!(area.body.fields().unwrap().fixed[0].value.as_text(), Some("ABC"));
    }

    #[test]
    fn no_space_rejected_when_area_is_full() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::Chassis, 8, 8).unwrap();
        let area = fru.area_mut(AreaKind::Chassis).unwrap();
        let huge = "x".repeat(60);
        assert!(area.set_fixed_string(0, FieldValue::Ascii(huge)).is_err());
    }

    #[test]
    fn delete_area_frees_header_slot() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::Chassis, 8, 16).unwrap();
        fru.delete_area(AreaKind::Chassis).unwrap();
        assert!(fru.area(AreaKind::Chassis).is_none());
        assert!(fru.add_area(AreaKind::Chassis, 8, 16).is_ok());
    }

    #[test]
    fn multi_record_round_trip_with_two_elements() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::MultiRecord, 8, 56).unwrap();
        fru.multi_record_set(None, 0x01, Some(vec![0u8; 13])).unwrap();
        fru.multi_record_set(None, 0x02, Some(vec![1u8; 13])).unwrap();

        let mut blob = vec![0u8; 64];
        fru.encode(&mut blob).unwrap();
        fru.write_complete();

        let decoded = NormalFru::decode(&blob, FetchMask::ALL).unwrap();
        assert_eq!(decoded.num_multi_records().unwrap(), 2);
        assert_eq!(decoded.multi_record_get_type(0).unwrap(), 0x01);
        assert_eq!(decoded.multi_record_get_type(1).unwrap(), 0x02);
        assert_eq!(decoded.multi_record_get_format_version(1).unwrap(), 2);
        assert_eq!(decoded.multi_record_get_data_len(0).unwrap(), 13);
    }

    #[test]
    fn multi_record_count_toggle_flips_header_offset() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::MultiRecord, 8, 56).unwrap();
        let mut blob = vec![0u8; 64];
        fru.encode(&mut blob).unwrap();
        fru.write_complete();

        fru.multi_record_set(None, 0x01, Some(vec![0u8; 13])).unwrap();
        assert!(fru.header_changed);
        fru.encode(&mut blob).unwrap();
        fru.write_complete();

        fru.multi_record_set(Some(0), 0x01, None).unwrap();
        assert!(fru.header_changed);
    }

    #[test]
    fn add_area_leaves_multi_record_header_word_zero_until_populated() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::MultiRecord, 8, 56).unwrap();
        assert_eq!(fru.header.offset_words(AreaKind::MultiRecord), 0);

        let mut blob = vec![0u8; 64];
        fru.encode(&mut blob).unwrap();
        let decoded = NormalFru::decode(&blob, FetchMask::ALL).unwrap();
        assert!(decoded.area(AreaKind::MultiRecord).is_none());
    }

    #[test]
    fn area_set_offset_on_multi_record_preserves_end_boundary() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::MultiRecord, 8, 56).unwrap();
        fru.multi_record_set(None, 0x01, Some(vec![0u8; 13])).unwrap();

        fru.area_set_offset(AreaKind::MultiRecord, 16).unwrap();
        assert_eq!(fru.area_get_offset(AreaKind::MultiRecord).unwrap(), 16);
        assert_eq!(fru.area_get_length(AreaKind::MultiRecord).unwrap(), 48);
    }

    #[test]
    fn multi_record_root_node_routes_to_builtin_decoder() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::MultiRecord, 8, 56).unwrap();
        let mut payload = vec![0u8; 13];
        payload[0] = 0x03; // output number
        fru.multi_record_set(None, 0x01, Some(payload)).unwrap();

        let node = fru.multi_record_get_root_node(0).unwrap();
        assert_eq!(node.get_field(0), Some(("output_number", &crate::oem::NodeValue::UInt(3))));
    }
}
