//! BPC (China, 68.5 kHz) encoder.

use crate::calendar::Datetime;
use crate::station::UserParams;
use crate::xmit::{self, SYNC_MARKER, XmitPattern};

/// Encode one minute of BPC transmission starting at `datetime`.
///
/// The 20-symbol frame repeats 3 times per minute. On the second repeat
/// (only), the AM/PM parity-guard bit at symbol 10 is XORed with 1 -- an
/// observed quirk of the real signal, reproduced here as-is.
pub fn encode(datetime: Datetime, _params: &UserParams) -> XmitPattern {
    let mut bits = [0u8; 20];
    bits[0] = SYNC_MARKER;

    let hour_12h = datetime.hour % 12;
    bits[3] = (hour_12h >> 2) & 0x3;
    bits[4] = hour_12h & 0x3;

    let min = datetime.min;
    bits[5] = (min >> 4) & 0x3;
    bits[6] = (min >> 2) & 0x3;
    bits[7] = min & 0x3;

    let dow = if datetime.dow != 0 { datetime.dow } else { 7 };
    bits[8] = (dow >> 2) & 0x1;
    bits[9] = dow & 0x3;

    let is_pm = u8::from(datetime.hour >= 12);
    bits[10] = (is_pm << 1) | xmit::even_parity(&bits, 1, 10);

    let day = datetime.day;
    bits[11] = (day >> 4) & 0x1;
    bits[12] = (day >> 2) & 0x3;
    bits[13] = day & 0x3;

    let mon = datetime.mon;
    bits[14] = (mon >> 2) & 0x3;
    bits[15] = mon & 0x3;

    let year = (datetime.year % 100) as u8;
    bits[16] = (year >> 4) & 0x3;
    bits[17] = (year >> 2) & 0x3;
    bits[18] = year & 0x3;
    bits[19] = ((year >> 5) & 0x2) | xmit::even_parity(&bits, 11, 19);

    let mut pattern = XmitPattern::new();
    let mut j = 0usize;
    for p in 0u8..3 {
        if p != 0 {
            bits[1] = 1 << p;
        }
        if p == 1 {
            bits[10] ^= 1;
        }

        // Marker: low for 0 ms; 00/01/10/11: 100/200/300/400 ms.
        for &b in bits.iter() {
            let lo_dsec = if b == SYNC_MARKER { 0 } else { u32::from(b) + 1 };
            let lo = 100 * lo_dsec / xmit::TICK_MS;
            let hi = xmit::TICKS_PER_SEC - lo;
            pattern.paint(&mut j, lo, hi);
        }
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar;
    use crate::station::{JjyKhz, Station};

    fn params() -> UserParams {
        UserParams { offset_ms: 0.0, station: Station::Bpc, jjy_khz: JjyKhz::Khz40, dut1_ms: 0, noclip: true }
    }

    #[test]
    fn sync_marker_symbol_is_always_high() {
        let dt = calendar::parse(1_704_067_200_000);
        let pattern = encode(dt, &params());
        // First symbol of each 20-symbol repeat is the SYNC_MARKER: lo_dsec
        // is 0, so it carries high for the entire second.
        for repeat in 0..3u32 {
            let base = repeat * 20 * xmit::TICKS_PER_SEC;
            for tick in base..base + xmit::TICKS_PER_SEC {
                assert!(pattern.is_high(tick as u16));
            }
        }
    }
}
