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

//! The process-wide OEM multi-record registry (§4.5): a `(manufacturer_id, type_id)` keyed
//! table of decoders, plus the built-in Power Supply / DC Output / DC Load decoders and the
//! [`FruNode`] tree they produce.

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::error::{FruError, Result};

/// A record type below this value is standards-defined; the manufacturer id is ignored when
/// looking up its decoder.
const OEM_TYPE_THRESHOLD: u8 = 0xC0;

pub type OemDecoderFn = fn(&[u8]) -> Result<FruNode>;

/// One leaf or sub-tree value in a decoded multi-record.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    Node(FruNode),
}

/// The uniform tree interface a decoder produces, walked by external tooling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FruNode {
    fields: Vec<(&'static str, NodeValue)>,
}

impl FruNode {
    pub fn new() -> Self {
        FruNode::default()
    }

    pub fn push(&mut self, name: &'static str, value: NodeValue) {
        self.fields.push((name, value));
    }

    pub fn get_field(&self, index: usize) -> Option<(&'static str, &NodeValue)> {
        self.fields.get(index).map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn registry() -> &'static RwLock<HashMap<(u32, u8), OemDecoderFn>> {
    static REGISTRY: OnceLock<RwLock<HashMap<(u32, u8), OemDecoderFn>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(builtin_decoders()))
}

fn builtin_decoders() -> HashMap<(u32, u8), OemDecoderFn> {
    let mut map: HashMap<(u32, u8), OemDecoderFn> = HashMap::new();
    map.insert((0, 0x00), decode_power_supply as OemDecoderFn);
    map.insert((0, 0x01), decode_dc_output as OemDecoderFn);
    map.insert((0, 0x02), decode_dc_load as OemDecoderFn);
    map
}

/// Registers (or replaces) the decoder for `(manufacturer_id, type_id)`. `manufacturer_id` is
/// ignored for standards-defined types (`type_id < 0xC0`) — register those with `manufacturer_id
/// = 0`.
pub fn register_oem_mr(manufacturer_id: u32, type_id: u8, decoder: OemDecoderFn) {
    let key = if type_id < OEM_TYPE_THRESHOLD { (0, type_id) } else { (manufacturer_id, type_id) };
    registry().write().insert(key, decoder);
}

/// Removes a previously registered decoder.
pub fn deregister_oem_mr(manufacturer_id: u32, type_id: u8) {
    let key = if type_id < OEM_TYPE_THRESHOLD { (0, type_id) } else { (manufacturer_id, type_id) };
    registry().write().remove(&key);
}

/// Looks up and runs the decoder for `(manufacturer_id, type_id)`, honoring the lookup-precedence
/// rule from §4.5.
pub fn decode(manufacturer_id: u32, type_id: u8, payload: &[u8]) -> Result<FruNode> {
    let key = if type_id < OEM_TYPE_THRESHOLD { (0, type_id) } else { (manufacturer_id, type_id) };
    let decoder = *registry()
        .read()
        .get(&key)
        .ok_or_else(|| FruError::not_present(format!("no OEM decoder for type {type_id:#04x}")))?;
    decoder(payload)
}

fn require_len(payload: &[u8], len: usize, what: &str) -> Result<()> {
    if payload.len() < len {
        return Err(FruError::bad_format(payload.len(), format!("{what} payload shorter than {len} bytes")));
    }
    Ok(())
}

fn u16_le(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn i16_le(b: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([b[at], b[at + 1]])
}

/// Power Supply Information, type 0x00, 24-byte payload (IPMI Platform Management FRU
/// Information, §18.1).
fn decode_power_supply(payload: &[u8]) -> Result<FruNode> {
    require_len(payload, 24, "power supply information")?;
    let capacity = u16_le(payload, 0) & 0x0FFF;
    let peak_va = u16_le(payload, 2);
    let inrush_current = payload[4];
    let inrush_interval_ms = payload[5];
    let low_end_in_v = i16_le(payload, 6);
    let high_end_in_v = i16_le(payload, 8);
    let low_end_in_v2 = i16_le(payload, 10);
    let high_end_in_v2 = i16_le(payload, 12);
    let low_freq_hz = payload[14];
    let high_freq_hz = payload[15];
    let dropout_tolerance_ms = payload[16];
    let status = payload[17];
    let peak_capacity = u16_le(payload, 18) & 0x0FFF;
    let peak_hold_up_secs = payload[19] >> 4;
    let combined_voltage_map = payload[20] & 0x0F;
    let combined_wattage = u16_le(payload, 21);
    let low_threshold_tach = payload[23] & 0x0F;

    let mut node = FruNode::new();
    node.push("overall_capacity_watts", NodeValue::UInt(capacity as u64));
    node.push("peak_va", NodeValue::UInt(if peak_va == 0xFFFF { 0 } else { peak_va as u64 }));
    node.push(
        "inrush_current_amps",
        NodeValue::UInt(if inrush_current == 0xFF { 0 } else { inrush_current as u64 }),
    );
    node.push("inrush_interval_ms", NodeValue::UInt(inrush_interval_ms as u64));
    node.push("input_voltage_range_1", NodeValue::Text(format!("{low_end_in_v}-{high_end_in_v} (x0.01V)")));
    node.push("input_voltage_range_2", NodeValue::Text(format!("{low_end_in_v2}-{high_end_in_v2} (x0.01V)")));
    node.push("low_end_input_frequency_hz", NodeValue::UInt(low_freq_hz as u64));
    node.push("high_end_input_frequency_hz", NodeValue::UInt(high_freq_hz as u64));
    node.push("ac_dropout_tolerance_ms", NodeValue::UInt(dropout_tolerance_ms as u64));
    node.push("predictive_fail_support", NodeValue::Bool(status & 0x01 != 0));
    node.push("power_factor_correction", NodeValue::Bool(status & 0x02 != 0));
    node.push("autoswitch", NodeValue::Bool(status & 0x04 != 0));
    node.push("hot_swap", NodeValue::Bool(status & 0x08 != 0));
    node.push("tachometer_pulses_per_rotation", NodeValue::UInt(((status >> 4) & 0x01) as u64));
    node.push("peak_capacity_watts", NodeValue::UInt(peak_capacity as u64));
    node.push("peak_hold_up_seconds", NodeValue::UInt(peak_hold_up_secs as u64));
    node.push("combined_voltage_map", NodeValue::UInt(combined_voltage_map as u64));
    node.push("combined_wattage", NodeValue::UInt(combined_wattage as u64));
    node.push("low_threshold_tach_rps", NodeValue::UInt(low_threshold_tach as u64));
    Ok(node)
}

/// DC Output, type 0x01, 13-byte payload.
fn decode_dc_output(payload: &[u8]) -> Result<FruNode> {
    require_len(payload, 13, "DC output")?;
    let output_number = payload[0] & 0x0F;
    let standby = payload[0] & 0x80 != 0;
    let nominal_voltage = i16_le(payload, 1);
    let max_neg_deviation = i16_le(payload, 3);
    let max_pos_deviation = i16_le(payload, 5);
    let ripple_mv = u16_le(payload, 7);
    let min_current_ma = u16_le(payload, 9);
    let max_current_ma = u16_le(payload, 11);

    let mut node = FruNode::new();
    node.push("output_number", NodeValue::UInt(output_number as u64));
    node.push("is_standby", NodeValue::Bool(standby));
    node.push("nominal_voltage_centivolts", NodeValue::Int(nominal_voltage as i64));
    node.push("max_negative_deviation_centivolts", NodeValue::Int(max_neg_deviation as i64));
    node.push("max_positive_deviation_centivolts", NodeValue::Int(max_pos_deviation as i64));
    node.push("ripple_and_noise_mv", NodeValue::UInt(ripple_mv as u64));
    node.push("min_current_ma", NodeValue::UInt(min_current_ma as u64));
    node.push("max_current_ma", NodeValue::UInt(max_current_ma as u64));
    Ok(node)
}

/// DC Load, type 0x02, 13-byte payload.
fn decode_dc_load(payload: &[u8]) -> Result<FruNode> {
    require_len(payload, 13, "DC load")?;
    let output_number = payload[0] & 0x0F;
    let nominal_voltage = i16_le(payload, 1);
    let min_voltage = i16_le(payload, 3);
    let max_voltage = i16_le(payload, 5);
    let ripple_mv = u16_le(payload, 7);
    let min_current_ma = u16_le(payload, 9);
    let max_current_ma = u16_le(payload, 11);

    let mut node = FruNode::new();
    node.push("output_number", NodeValue::UInt(output_number as u64));
    node.push("nominal_voltage_centivolts", NodeValue::Int(nominal_voltage as i64));
    node.push("min_voltage_centivolts", NodeValue::Int(min_voltage as i64));
    node.push("max_voltage_centivolts", NodeValue::Int(max_voltage as i64));
    node.push("ripple_and_noise_mv", NodeValue::UInt(ripple_mv as u64));
    node.push("min_current_ma", NodeValue::UInt(min_current_ma as u64));
    node.push("max_current_ma", NodeValue::UInt(max_current_ma as u64));
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_type_lookup_ignores_manufacturer_id() {
        let payload = [0u8; 24];
        let a = decode(0x1122, 0x00, &payload).unwrap();
        let b = decode(0xAABB, 0x00, &payload).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oem_type_requires_matching_manufacturer_id() {
        fn custom(_: &[u8]) -> Result<FruNode> {
            Ok(FruNode::new())
        }
        register_oem_mr(0xDEAD, 0xC5, custom);
        assert!(decode(0xDEAD, 0xC5, &[]).is_ok());
        assert!(decode(0xBEEF, 0xC5, &[]).is_err());
        deregister_oem_mr(0xDEAD, 0xC5);
    }

    #[test]
    fn dc_output_decodes_output_number_and_standby_bit() {
        let mut payload = [0u8; 13];
        payload[0] = 0x82;
        let node = decode_dc_output(&payload).unwrap();
        assert_eq!(node.get_field(0), Some(("output_number", &NodeValue::UInt(2))));
        assert_eq!(node.get_field(1), Some(("is_standby", &NodeValue::Bool(true))));
    }
}
