//! Whole-blob integration tests, covering the concrete scenarios from the format's testable
//! properties: a minimal fixture decode, string-growth delta, area move/resize, and the
//! byte-for-byte round trip invariant `encode(decode(B)) == B`.

use fru::{AreaKind, FetchMask, FieldValue, NormalFru};

fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b)).wrapping_neg()
}

/// `01 00 02 00 00 00 00 FD` header (chassis offset word = 2, i.e. byte 16), followed by a
/// 16-byte Chassis area with no custom fields.
fn minimal_fixture() -> Vec<u8> {
    let mut blob = vec![0u8; 32];
    blob[0] = 0x01;
    blob[2] = 0x02; // chassis offset = 2 * 8 = 16
    blob[7] = checksum(&blob[..7]);

    let chassis = &mut blob[16..32];
    chassis[0] = 0x01; // version
    chassis[1] = 0x02; // length / 8
    chassis[2] = 0x17; // chassis_type
    chassis[3] = 0xC0; // part_number: empty ASCII
    chassis[4] = 0xC0; // serial_number: empty ASCII
    chassis[5] = 0xC1; // end of fields
    let sum = checksum(&chassis[..15]);
    chassis[15] = sum;

    blob
}

#[test]
fn minimal_decode_reads_chassis_type_and_empty_fields() {
    let blob = minimal_fixture();
    let fru = NormalFru::decode(&blob, FetchMask::ALL).unwrap();
    let chassis = fru.area(AreaKind::Chassis).unwrap();
    match &chassis.body {
        fru::area::AreaBody::Chassis(c) => {
            assert_eq!(c.chassis_type, 0x17);
            assert_eq!(c.fields.fixed[0].raw_len, 1);
            assert_eq!(c.fields.fixed[0].value.as_text(), Some(""));
        }
        _ => panic!("expected chassis area"),
    }
}

#[test]
fn well_formed_blob_round_trips_byte_for_byte() {
    let blob = minimal_fixture();
    let mut fru = NormalFru::decode(&blob, FetchMask::ALL).unwrap();
    let mut out = blob.clone();
    fru.encode(&mut out).unwrap();
    assert_eq!(out, blob);
}

#[test]
fn string_growth_emits_targeted_delta_and_decodes_back() {
    let blob = minimal_fixture();
    let mut fru = NormalFru::decode(&blob, FetchMask::ALL).unwrap();

    let chassis = fru.area_mut(AreaKind::Chassis).unwrap();
    chassis.set_fixed_string(0, FieldValue::Ascii("ABC".into())).unwrap();

    let mut out = blob.clone();
    let deltas = fru.encode(&mut out).unwrap();

    // The part-number bytes grew from 1 to 4 (C3 41 42 43) at offset 19; everything after it
    // (serial_number, the end marker, the checksum) shifts down by the same 3 bytes.
    assert!(deltas.iter().any(|&(off, len)| off == 19 && len == 4));
    assert!(!deltas.is_empty());

    let decoded = NormalFru::decode(&out, FetchMask::ALL).unwrap();
    let chassis = decoded.area(AreaKind::Chassis).unwrap();
    match &chassis.body {
        fru::area::AreaBody::Chassis(c) => {
            assert_eq!(c.fields.fixed[0].value.as_text(), Some("ABC"));
            assert_eq!(c.fields.fixed[1].value.as_text(), Some(""));
        }
        _ => panic!("expected chassis area"),
    }
}

#[test]
fn moving_an_area_rewrites_the_header_delta() {
    let mut fru = NormalFru::new(64);
    fru.add_area(AreaKind::Board, 8, 16).unwrap();
    let mut blob = vec![0u8; 64];
    fru.encode(&mut blob).unwrap();
    fru.write_complete();

    fru.area_set_offset(AreaKind::Board, 24).unwrap();
    let deltas = fru.encode(&mut blob).unwrap();
    assert!(deltas.contains(&(0, 8)), "header must be in the delta after a move");
    assert!(deltas.iter().any(|&(off, len)| off == 24 && len == 16));

    let decoded = NormalFru::decode(&blob, FetchMask::ALL).unwrap();
    assert_eq!(decoded.area_get_offset(AreaKind::Board).unwrap(), 24);
}

#[test]
fn write_complete_clears_every_dirty_flag() {
    let mut fru = NormalFru::new(64);
    fru.add_area(AreaKind::Chassis, 8, 16).unwrap();
    let mut blob = vec![0u8; 64];
    fru.encode(&mut blob).unwrap();
    fru.write_complete();

    let chassis = fru.area(AreaKind::Chassis).unwrap();
    assert!(!chassis.changed);
    assert!(!chassis.rewrite);
    assert_eq!(chassis.used_length, chassis.orig_used_length);

    // write_complete is idempotent.
    fru.write_complete();
    let chassis = fru.area(AreaKind::Chassis).unwrap();
    assert!(!chassis.changed);
}
