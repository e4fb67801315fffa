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

//! The typed field index (§4.5): a fixed table of every gettable/settable field across
//! Chassis/Board/Product/InternalUse, and the `get`/`set_int`/`set_time`/`set_data` dispatchers
//! over it.

use crate::area::AreaBody;
use crate::error::{FruError, Result};
use crate::fru::NormalFru;
use crate::header::AreaKind;
use crate::string::{FieldValue, StringValue};

/// The scalar type of one field table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Time,
    AsciiString,
    Binary,
}

/// One entry in the fixed field table: a stable name, its scalar kind, and whether it is an
/// array (iterated via `num`).
#[derive(Debug, Clone, Copy)]
pub struct FieldEntry {
    pub name: &'static str,
    pub kind: ScalarKind,
    pub array: bool,
}

/// The value of a fetched field, returned by [`get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldData {
    Int(u32),
    Time(i64),
    Text(String),
    Bytes(Vec<u8>),
}

macro_rules! entry {
    ($name:literal, Int) => {
        FieldEntry { name: $name, kind: ScalarKind::Int, array: false }
    };
    ($name:literal, Time) => {
        FieldEntry { name: $name, kind: ScalarKind::Time, array: false }
    };
    ($name:literal, Ascii) => {
        FieldEntry { name: $name, kind: ScalarKind::AsciiString, array: false }
    };
    ($name:literal, AsciiArray) => {
        FieldEntry { name: $name, kind: ScalarKind::AsciiString, array: true }
    };
    ($name:literal, Binary) => {
        FieldEntry { name: $name, kind: ScalarKind::Binary, array: false }
    };
}

pub const CHASSIS_TYPE: usize = 0;
pub const CHASSIS_PART_NUMBER: usize = 1;
pub const CHASSIS_SERIAL_NUMBER: usize = 2;
pub const CHASSIS_CUSTOM: usize = 3;
pub const BOARD_LANG_CODE: usize = 4;
pub const BOARD_MFG_TIME: usize = 5;
pub const BOARD_MANUFACTURER: usize = 6;
pub const BOARD_PRODUCT_NAME: usize = 7;
pub const BOARD_SERIAL_NUMBER: usize = 8;
pub const BOARD_PART_NUMBER: usize = 9;
pub const BOARD_FRU_FILE_ID: usize = 10;
pub const BOARD_CUSTOM: usize = 11;
pub const PRODUCT_LANG_CODE: usize = 12;
pub const PRODUCT_MANUFACTURER: usize = 13;
pub const PRODUCT_NAME: usize = 14;
pub const PRODUCT_PART_NUMBER: usize = 15;
pub const PRODUCT_VERSION: usize = 16;
pub const PRODUCT_SERIAL_NUMBER: usize = 17;
pub const PRODUCT_ASSET_TAG: usize = 18;
pub const PRODUCT_FRU_FILE_ID: usize = 19;
pub const PRODUCT_CUSTOM: usize = 20;
pub const INTERNAL_USE_VERSION: usize = 21;
pub const INTERNAL_USE_PAYLOAD: usize = 22;

/// The full fixed field table, indexed by the constants above.
pub const FIELD_TABLE: &[FieldEntry] = &[
    entry!("chassis.type", Int),
    entry!("chassis.part_number", Ascii),
    entry!("chassis.serial_number", Ascii),
    entry!("chassis.custom", AsciiArray),
    entry!("board.lang_code", Int),
    entry!("board.mfg_time", Time),
    entry!("board.manufacturer", Ascii),
    entry!("board.product_name", Ascii),
    entry!("board.serial_number", Ascii),
    entry!("board.part_number", Ascii),
    entry!("board.fru_file_id", Ascii),
    entry!("board.custom", AsciiArray),
    entry!("product.lang_code", Int),
    entry!("product.manufacturer", Ascii),
    entry!("product.product_name", Ascii),
    entry!("product.part_number", Ascii),
    entry!("product.product_version", Ascii),
    entry!("product.serial_number", Ascii),
    entry!("product.asset_tag", Ascii),
    entry!("product.fru_file_id", Ascii),
    entry!("product.custom", AsciiArray),
    entry!("internal_use.version", Int),
    entry!("internal_use.payload", Binary),
];

fn string_value_data(v: &StringValue) -> FieldData {
    match v {
        StringValue::Text(s) => FieldData::Text(s.clone()),
        StringValue::Bytes(b) => FieldData::Bytes(b.clone()),
    }
}

/// Returns the field's current value and, for array fields, the next `num` to fetch (or `-1`
/// when exhausted). `num` is ignored for scalar fields.
pub fn get(fru: &NormalFru, index: usize, num: i32) -> Result<(&'static str, FieldData, i32)> {
    let entry = FIELD_TABLE
        .get(index)
        .ok_or_else(|| FruError::invalid_arg(format!("field index {index} out of range")))?;

    let area_kind = area_for(index);
    let area = fru.area(area_kind).ok_or_else(|| FruError::not_present(area_kind.name()))?;

    let data = match index {
        CHASSIS_TYPE => match &area.body {
            AreaBody::Chassis(a) => FieldData::Int(a.chassis_type as u32),
            _ => unreachable!(),
        },
        BOARD_LANG_CODE => match &area.body {
            AreaBody::Board(a) => FieldData::Int(a.lang_code as u32),
            _ => unreachable!(),
        },
        BOARD_MFG_TIME => match &area.body {
            AreaBody::Board(a) => FieldData::Time(a.mfg_time_unix),
            _ => unreachable!(),
        },
        PRODUCT_LANG_CODE => match &area.body {
            AreaBody::Product(a) => FieldData::Int(a.lang_code as u32),
            _ => unreachable!(),
        },
        INTERNAL_USE_VERSION => match &area.body {
            AreaBody::InternalUse(a) => FieldData::Int(a.version as u32),
            _ => unreachable!(),
        },
        INTERNAL_USE_PAYLOAD => match &area.body {
            AreaBody::InternalUse(a) => FieldData::Bytes(a.payload.clone()),
            _ => unreachable!(),
        },
        _ if entry.array => {
            let fields = area.body.fields().expect("array fields only defined on FieldVector areas");
            let i = num.max(0) as usize;
            let s = fields
                .custom
                .get(i)
                .ok_or_else(|| FruError::not_present(format!("{} index {i}", entry.name)))?;
            let next = if i + 1 < fields.custom.len() { i as i32 + 1 } else { -1 };
            return Ok((entry.name, string_value_data(&s.value), next));
        }
        _ => {
            let fields = area.body.fields().expect("scalar string fields only defined on FieldVector areas");
            let fixed_idx = fixed_field_index(index);
            let s = &fields.fixed[fixed_idx];
            FieldData::Text(s.value.as_text().unwrap_or_default().to_string())
        }
    };
    Ok((entry.name, data, -1))
}

/// Sets an `Int`-typed field (`chassis.type`, `board.lang_code`, `product.lang_code`); the
/// `internal_use.version` field is read-only.
pub fn set_int(fru: &mut NormalFru, index: usize, value: u32) -> Result<()> {
    if index == INTERNAL_USE_VERSION {
        return Err(FruError::read_only("internal_use.version"));
    }
    let kind = area_for(index);
    let area = fru.area_mut(kind).ok_or_else(|| FruError::not_present(kind.name()))?;
    match (index, &mut area.body) {
        (CHASSIS_TYPE, AreaBody::Chassis(a)) => a.chassis_type = value as u8,
        (BOARD_LANG_CODE, AreaBody::Board(a)) => a.lang_code = value as u8,
        (PRODUCT_LANG_CODE, AreaBody::Product(a)) => a.lang_code = value as u8,
        _ => return Err(FruError::invalid_arg(format!("field index {index} is not an Int field"))),
    }
    area.changed = true;
    area.rewrite = true;
    Ok(())
}

/// Sets the `board.mfg_time` field.
pub fn set_time(fru: &mut NormalFru, index: usize, value: i64) -> Result<()> {
    if index != BOARD_MFG_TIME {
        return Err(FruError::invalid_arg(format!("field index {index} is not a Time field")));
    }
    let area = fru.area_mut(AreaKind::Board).ok_or_else(|| FruError::not_present("board info area"))?;
    match &mut area.body {
        AreaBody::Board(a) => a.mfg_time_unix = value,
        _ => unreachable!(),
    }
    area.changed = true;
    area.rewrite = true;
    Ok(())
}

/// Sets a string/binary field. For array fields, `num = -1` appends a new custom field;
/// otherwise it addresses an existing one for deletion (`value = None`) or replacement.
pub fn set_data(fru: &mut NormalFru, index: usize, num: i32, value: Option<FieldValue>) -> Result<()> {
    let entry = FIELD_TABLE
        .get(index)
        .ok_or_else(|| FruError::invalid_arg(format!("field index {index} out of range")))?;
    if index == INTERNAL_USE_PAYLOAD {
        let area = fru.area_mut(AreaKind::InternalUse).ok_or_else(|| FruError::not_present("internal use area"))?;
        let bytes = match value {
            Some(FieldValue::Binary(b)) | Some(FieldValue::Unicode(b)) => b,
            Some(FieldValue::Ascii(s)) => s.into_bytes(),
            None => return Err(FruError::invalid_arg("internal_use.payload cannot be deleted")),
        };
        match &mut area.body {
            AreaBody::InternalUse(a) => a.payload = bytes,
            _ => unreachable!(),
        }
        area.changed = true;
        area.rewrite = true;
        return Ok(());
    }

    let kind = area_for(index);
    let area = fru.area_mut(kind).ok_or_else(|| FruError::not_present(kind.name()))?;

    if entry.array {
        return match (num, value) {
            (-1, Some(v)) => area.append_custom(v).map(|_| ()),
            (i, Some(v)) if i >= 0 => area.set_custom_string(i as usize, v),
            (i, None) if i >= 0 => area.delete_custom(i as usize),
            _ => Err(FruError::invalid_arg("invalid array field index/value combination")),
        };
    }

    let value = value.ok_or_else(|| FruError::invalid_arg("fixed fields cannot be deleted"))?;
    area.set_fixed_string(fixed_field_index(index), value)
}

fn fixed_field_index(index: usize) -> usize {
    match index {
        CHASSIS_PART_NUMBER => 0,
        CHASSIS_SERIAL_NUMBER => 1,
        BOARD_MANUFACTURER => 0,
        BOARD_PRODUCT_NAME => 1,
        BOARD_SERIAL_NUMBER => 2,
        BOARD_PART_NUMBER => 3,
        BOARD_FRU_FILE_ID => 4,
        PRODUCT_MANUFACTURER => 0,
        PRODUCT_NAME => 1,
        PRODUCT_PART_NUMBER => 2,
        PRODUCT_VERSION => 3,
        PRODUCT_SERIAL_NUMBER => 4,
        PRODUCT_ASSET_TAG => 5,
        PRODUCT_FRU_FILE_ID => 6,
        _ => unreachable!("not a fixed string field"),
    }
}

fn area_for(index: usize) -> AreaKind {
    match index {
        CHASSIS_TYPE..=CHASSIS_CUSTOM => AreaKind::Chassis,
        BOARD_LANG_CODE..=BOARD_CUSTOM => AreaKind::Board,
        PRODUCT_LANG_CODE..=PRODUCT_CUSTOM => AreaKind::Product,
        _ => AreaKind::InternalUse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fru::NormalFru;

    #[test]
    fn field_table_indices_match_their_constants() {
        assert_eq!(FIELD_TABLE[CHASSIS_PART_NUMBER].name, "chassis.part_number");
        assert_eq!(FIELD_TABLE[BOARD_MFG_TIME].name, "board.mfg_time");
        assert_eq!(FIELD_TABLE[INTERNAL_USE_PAYLOAD].name, "internal_use.payload");
    }

    #[test]
    fn get_set_round_trips_a_fixed_string_field() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::Chassis, 8, 16).unwrap();
        set_data(&mut fru, CHASSIS_PART_NUMBER, -1, Some(FieldValue::Ascii("X1".into()))).unwrap();
        let (name, data, _) = get(&fru, CHASSIS_PART_NUMBER, -1).unwrap();
        assert_eq!(name, "chassis.part_number");
        assert_eq!(data, FieldData::Text("X1".into()));
    }

    #[test]
    fn custom_array_field_appends_and_iterates() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::Chassis, 8, 32).unwrap();
        set_data(&mut fru, CHASSIS_CUSTOM, -1, Some(FieldValue::Ascii("one".into()))).unwrap();
        set_data(&mut fru, CHASSIS_CUSTOM, -1, Some(FieldValue::Ascii("two".into()))).unwrap();
        let (_, first, next) = get(&fru, CHASSIS_CUSTOM, 0).unwrap();
        assert_eq!(first, FieldData::Text("one".into()));
        assert_eq!(next, 1);
        let (_, second, next2) = get(&fru, CHASSIS_CUSTOM, 1).unwrap();
        assert_eq!(second, FieldData::Text("two".into()));
        assert_eq!(next2, -1);
    }

    #[test]
    fn replacing_a_custom_field_keeps_the_others_in_place() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::Chassis, 8, 32).unwrap();
        set_data(&mut fru, CHASSIS_CUSTOM, -1, Some(FieldValue::Ascii("AA".into()))).unwrap();
        set_data(&mut fru, CHASSIS_CUSTOM, -1, Some(FieldValue::Ascii("BB".into()))).unwrap();
        set_data(&mut fru, CHASSIS_CUSTOM, -1, Some(FieldValue::Ascii("CC".into()))).unwrap();

        set_data(&mut fru, CHASSIS_CUSTOM, 1, Some(FieldValue::Ascii("DDDD".into()))).unwrap();

        let (_, v0, _) = get(&fru, CHASSIS_CUSTOM, 0).unwrap();
        let (_, v1, _) = get(&fru, CHASSIS_CUSTOM, 1).unwrap();
        let (_, v2, next2) = get(&fru, CHASSIS_CUSTOM, 2).unwrap();
        assert_eq!(v0, FieldData::Text("AA".into()));
        assert_eq!(v1, FieldData::Text("DDDD".into()));
        assert_eq!(v2, FieldData::Text("CC".into()));
        assert_eq!(next2, -1);
    }

    #[test]
    fn internal_use_version_is_read_only() {
        let mut fru = NormalFru::new(64);
        fru.add_area(AreaKind::InternalUse, 8, 8).unwrap();
        assert!(set_int(&mut fru, INTERNAL_USE_VERSION, 2).is_err());
    }
}
