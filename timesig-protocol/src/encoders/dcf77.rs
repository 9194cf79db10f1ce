//! DCF77 (Germany, 77.5 kHz) encoder.

use crate::calendar::{self, Datetime, NOT_SOON};
use crate::station::UserParams;
use crate::xmit::{self, SYNC_MARKER, XmitPattern};

/// Encode one minute of DCF77 transmission starting at `datetime`.
///
/// `datetime` must be CET/CEST local time (DCF77's usual UTC offset is
/// +1h). The transmitted minute is always the *next* CET/CEST minute, so
/// near a DST changeover the emitted DST flags can differ from the flags
/// at `datetime` itself.
pub fn encode(datetime: Datetime, _params: &UserParams) -> XmitPattern {
    let mut bits = [0u8; 60];
    bits[20] = 1;
    bits[59] = SYNC_MARKER;

    // is_eu_dst() expects UTC. We have CET (UTC+0100).
    let utc_datetime = calendar::parse(datetime.timestamp_ms - calendar::MSECS_HOUR);
    let eu = calendar::is_eu_dst(utc_datetime);
    let in_mins = eu.in_mins.unwrap_or(NOT_SOON);
    let is_cest = eu.in_effect;

    bits[16] = u8::from(in_mins <= 60);
    bits[17] = u8::from(is_cest);
    bits[18] = u8::from(!is_cest);

    // Transmitted time is the CET/CEST time at the next UTC minute.
    let is_xmit_cest = (is_cest && in_mins > 1) || (!is_cest && in_mins == 1);
    let cest_offset = if is_xmit_cest { calendar::MSECS_HOUR } else { 0 };
    let xd = calendar::parse(datetime.timestamp_ms + cest_offset + calendar::MSECS_MIN);

    bits[20] = 1;

    let min = xd.min % 10;
    bits[21] = xmit::bitflag(min, 1);
    bits[22] = xmit::bitflag(min, 2);
    bits[23] = xmit::bitflag(min, 4);
    bits[24] = xmit::bitflag(min, 8);

    let min_10 = xd.min / 10;
    bits[25] = xmit::bitflag(min_10, 1);
    bits[26] = xmit::bitflag(min_10, 2);
    bits[27] = xmit::bitflag(min_10, 4);

    bits[28] = xmit::even_parity(&bits, 21, 28);

    let hour = xd.hour % 10;
    bits[29] = xmit::bitflag(hour, 1);
    bits[30] = xmit::bitflag(hour, 2);
    bits[31] = xmit::bitflag(hour, 4);
    bits[32] = xmit::bitflag(hour, 8);

    let hour_10 = xd.hour / 10;
    bits[33] = xmit::bitflag(hour_10, 1);
    bits[34] = xmit::bitflag(hour_10, 2);

    bits[35] = xmit::even_parity(&bits, 29, 35);

    let day = xd.day % 10;
    bits[36] = xmit::bitflag(day, 1);
    bits[37] = xmit::bitflag(day, 2);
    bits[38] = xmit::bitflag(day, 4);
    bits[39] = xmit::bitflag(day, 8);

    let day_10 = xd.day / 10;
    bits[40] = xmit::bitflag(day_10, 1);
    bits[41] = xmit::bitflag(day_10, 2);

    let dow = if xd.dow != 0 { xd.dow } else { 7 };
    bits[42] = xmit::bitflag(dow, 1);
    bits[43] = xmit::bitflag(dow, 2);
    bits[44] = xmit::bitflag(dow, 4);

    let mon = xd.mon % 10;
    bits[45] = xmit::bitflag(mon, 1);
    bits[46] = xmit::bitflag(mon, 2);
    bits[47] = xmit::bitflag(mon, 4);
    bits[48] = xmit::bitflag(mon, 8);

    let mon_10 = xd.mon / 10;
    bits[49] = xmit::bitflag(mon_10, 1);

    let year = (xd.year % 10) as u8;
    bits[50] = xmit::bitflag(year, 1);
    bits[51] = xmit::bitflag(year, 2);
    bits[52] = xmit::bitflag(year, 4);
    bits[53] = xmit::bitflag(year, 8);

    let year_10 = ((xd.year % 100) / 10) as u8;
    bits[54] = xmit::bitflag(year_10, 1);
    bits[55] = xmit::bitflag(year_10, 2);
    bits[56] = xmit::bitflag(year_10, 4);
    bits[57] = xmit::bitflag(year_10, 8);

    bits[58] = xmit::even_parity(&bits, 36, 58);

    let mut pattern = XmitPattern::new();
    let mut j = 0usize;
    // Marker: low for 0 ms; 0: 100 ms; 1: 200 ms.
    for &b in bits.iter() {
        let lo_dsec = if b == SYNC_MARKER { 0 } else { u32::from(b != 0) + 1 };
        let lo = 100 * lo_dsec / xmit::TICK_MS;
        let hi = xmit::TICKS_PER_SEC - lo;
        pattern.paint(&mut j, lo, hi);
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::{JjyKhz, Station};

    fn params() -> UserParams {
        UserParams { offset_ms: 0.0, station: Station::Dcf77, jjy_khz: JjyKhz::Khz40, dut1_ms: 0, noclip: true }
    }

    #[test]
    fn bit_20_is_high_after_its_low_prefix() {
        // 2024-01-01T00:00:00 CET local, expressed as the shifted
        // "pretend-UTC" timestamp the waveform layer hands encoders.
        let dt = calendar::parse(1_704_067_200_000);
        let pattern = encode(dt, &params());
        // bits[20] == 1 -> lo_dsec == 2 -> 4 low ticks, then high for the
        // rest of the second.
        let base = 20 * xmit::TICKS_PER_SEC;
        for tick in (base + 4)..(base + xmit::TICKS_PER_SEC) {
            assert!(pattern.is_high(tick as u16));
        }
    }

    #[test]
    fn minute_59_marker_is_always_high() {
        let dt = calendar::parse(1_704_067_200_000);
        let pattern = encode(dt, &params());
        // Second 59 is SYNC_MARKER: lo_dsec is 0, so it carries high for
        // the entire second (full carrier, no reduction).
        let base = 59 * xmit::TICKS_PER_SEC;
        for tick in base..base + xmit::TICKS_PER_SEC {
            assert!(pattern.is_high(tick as u16));
        }
    }
}
