//! MSF (UK, 60 kHz) encoder.

use crate::calendar::{self, Datetime, NOT_SOON};
use crate::station::UserParams;
use crate::xmit::{self, SYNC_MARKER, XmitPattern};

/// Encode one minute of MSF transmission starting at `datetime` (UTC).
pub fn encode(datetime: Datetime, params: &UserParams) -> XmitPattern {
    let mut bits = [0u8; 60];
    bits[0] = SYNC_MARKER;

    let mut dut1 = (params.dut1_ms / 100) as i8;
    let lt0: usize = if dut1 < 0 { 8 } else { 0 };
    if lt0 != 0 {
        dut1 = -dut1;
    }
    bits[1 + lt0] = u8::from(dut1 >= 1);
    bits[2 + lt0] = u8::from(dut1 >= 2);
    bits[3 + lt0] = u8::from(dut1 >= 3);
    bits[4 + lt0] = u8::from(dut1 >= 4);
    bits[5 + lt0] = u8::from(dut1 >= 5);
    bits[6 + lt0] = u8::from(dut1 >= 6);
    bits[7 + lt0] = u8::from(dut1 >= 7);
    bits[8 + lt0] = u8::from(dut1 >= 8);

    let eu = calendar::is_eu_dst(datetime);
    let in_mins = eu.in_mins.unwrap_or(NOT_SOON);
    let is_bst = eu.in_effect;

    // Transmitted time is the UTC/BST time at the next UTC minute.
    let is_xmit_bst = (is_bst && in_mins > 1) || (!is_bst && in_mins == 1);
    let bst_offset = if is_xmit_bst { calendar::MSECS_HOUR } else { 0 };
    let xd = calendar::parse(datetime.timestamp_ms + bst_offset + calendar::MSECS_MIN);

    let year_10 = ((xd.year % 100) / 10) as u8;
    bits[17] = xmit::bitflag(year_10, 8);
    bits[18] = xmit::bitflag(year_10, 4);
    bits[19] = xmit::bitflag(year_10, 2);
    bits[20] = xmit::bitflag(year_10, 1);

    let year = (xd.year % 10) as u8;
    bits[21] = xmit::bitflag(year, 8);
    bits[22] = xmit::bitflag(year, 4);
    bits[23] = xmit::bitflag(year, 2);
    bits[24] = xmit::bitflag(year, 1);

    let mon_10 = xd.mon / 10;
    bits[25] = xmit::bitflag(mon_10, 1);

    let mon = xd.mon % 10;
    bits[26] = xmit::bitflag(mon, 8);
    bits[27] = xmit::bitflag(mon, 4);
    bits[28] = xmit::bitflag(mon, 2);
    bits[29] = xmit::bitflag(mon, 1);

    let day_10 = xd.day / 10;
    bits[30] = xmit::bitflag(day_10, 2);
    bits[31] = xmit::bitflag(day_10, 1);

    let day = xd.day % 10;
    bits[32] = xmit::bitflag(day, 8);
    bits[33] = xmit::bitflag(day, 4);
    bits[34] = xmit::bitflag(day, 2);
    bits[35] = xmit::bitflag(day, 1);

    let dow = xd.dow;
    bits[36] = xmit::bitflag(dow, 4);
    bits[37] = xmit::bitflag(dow, 2);
    bits[38] = xmit::bitflag(dow, 1);

    let hour_10 = xd.hour / 10;
    bits[39] = xmit::bitflag(hour_10, 2);
    bits[40] = xmit::bitflag(hour_10, 1);

    let hour = xd.hour % 10;
    bits[41] = xmit::bitflag(hour, 8);
    bits[42] = xmit::bitflag(hour, 4);
    bits[43] = xmit::bitflag(hour, 2);
    bits[44] = xmit::bitflag(hour, 1);

    let min_10 = xd.min / 10;
    bits[45] = xmit::bitflag(min_10, 4);
    bits[46] = xmit::bitflag(min_10, 2);
    bits[47] = xmit::bitflag(min_10, 1);

    let min = xd.min % 10;
    bits[48] = xmit::bitflag(min, 8);
    bits[49] = xmit::bitflag(min, 4);
    bits[50] = xmit::bitflag(min, 2);
    bits[51] = xmit::bitflag(min, 1);

    bits[53] = u8::from(in_mins <= 61);
    bits[54] = xmit::odd_parity(&bits, 17, 25);
    bits[55] = xmit::odd_parity(&bits, 25, 36);
    bits[56] = xmit::odd_parity(&bits, 36, 39);
    bits[57] = xmit::odd_parity(&bits, 39, 52);
    bits[58] = u8::from(is_xmit_bst);

    let mut pattern = XmitPattern::new();
    let mut j = 0usize;
    // Marker: low for 500 ms; 00: 100 ms; 01: 200 ms; 11: 300 ms (secondary
    // minute marker only).
    for (i, &b) in bits.iter().enumerate() {
        let mut dsec_lo: u32 = if b == SYNC_MARKER { 5 } else { u32::from(b != 0) + 1 };
        if (53..=58).contains(&i) {
            dsec_lo += 1; // secondary 01111110 minute marker
        }
        let lo = 100 * dsec_lo / xmit::TICK_MS;
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
        UserParams { offset_ms: 0.0, station: Station::Msf, jjy_khz: JjyKhz::Khz40, dut1_ms: 0, noclip: true }
    }

    #[test]
    fn minute_marker_starts_low() {
        let dt = calendar::parse(1_704_067_200_000);
        let pattern = encode(dt, &params());
        // Second 0's marker is dsec_lo == 5 -> low for ticks 0..10, then
        // high for the rest of the second.
        for tick in 0..10 {
            assert!(!pattern.is_high(tick as u16));
        }
    }
}
