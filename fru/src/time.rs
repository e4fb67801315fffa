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

//! Board manufacture-time encoding: minutes since 1996-01-01 00:00 UTC, packed 24-bit LE.

/// Seconds from the Unix epoch (1970-01-01) to the FRU epoch (1996-01-01 UTC).
const FRU_EPOCH_OFFSET_SECS: i64 = 820_476_000;

/// Encodes a Unix timestamp (seconds) as the 24-bit little-endian FRU minute count.
pub fn unix_to_fru_minutes(unix_seconds: i64) -> [u8; 3] {
    let minutes = ((unix_seconds - FRU_EPOCH_OFFSET_SECS + 30) / 60).max(0) as u32;
    [(minutes & 0xFF) as u8, ((minutes >> 8) & 0xFF) as u8, ((minutes >> 16) & 0xFF) as u8]
}

/// Decodes a 24-bit little-endian FRU minute count back into a Unix timestamp (seconds).
pub fn fru_minutes_to_unix(bytes: [u8; 3]) -> i64 {
    let minutes = bytes[0] as i64 | ((bytes[1] as i64) << 8) | ((bytes[2] as i64) << 16);
    minutes * 60 + FRU_EPOCH_OFFSET_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fru_epoch_round_trips() {
        let encoded = unix_to_fru_minutes(FRU_EPOCH_OFFSET_SECS);
        assert_eq!(encoded, [0, 0, 0]);
        assert_eq!(fru_minutes_to_unix(encoded), FRU_EPOCH_OFFSET_SECS);
    }

    #[test]
    fn arbitrary_time_round_trips_within_a_minute() {
        let ts = FRU_EPOCH_OFFSET_SECS + 3600 * 24 * 30;
        let encoded = unix_to_fru_minutes(ts);
        let decoded = fru_minutes_to_unix(encoded);
        assert!((decoded - ts).abs() < 60);
    }
}
