//! WWVB (USA, 60 kHz) encoder.

use crate::calendar::{self, Datetime};
use crate::station::UserParams;
use crate::xmit::{self, SYNC_MARKER, XmitPattern};

/// Encode one minute of WWVB transmission starting at `datetime` (UTC).
pub fn encode(datetime: Datetime, params: &UserParams) -> XmitPattern {
    let mut bits = [0u8; 60];
    for i in [0, 9, 19, 29, 39, 49, 59] {
        bits[i] = SYNC_MARKER;
    }

    let min_10 = datetime.min / 10;
    bits[1] = xmit::bitflag(min_10, 4);
    bits[2] = xmit::bitflag(min_10, 2);
    bits[3] = xmit::bitflag(min_10, 1);

    let min = datetime.min % 10;
    bits[5] = xmit::bitflag(min, 8);
    bits[6] = xmit::bitflag(min, 4);
    bits[7] = xmit::bitflag(min, 2);
    bits[8] = xmit::bitflag(min, 1);

    let hour_10 = datetime.hour / 10;
    bits[12] = xmit::bitflag(hour_10, 2);
    bits[13] = xmit::bitflag(hour_10, 1);

    let hour = datetime.hour % 10;
    bits[15] = xmit::bitflag(hour, 8);
    bits[16] = xmit::bitflag(hour, 4);
    bits[17] = xmit::bitflag(hour, 2);
    bits[18] = xmit::bitflag(hour, 1);

    let doy_100 = (datetime.doy / 100) as u8;
    bits[22] = xmit::bitflag(doy_100, 2);
    bits[23] = xmit::bitflag(doy_100, 1);

    let doy_10 = ((datetime.doy % 100) / 10) as u8;
    bits[25] = xmit::bitflag(doy_10, 8);
    bits[26] = xmit::bitflag(doy_10, 4);
    bits[27] = xmit::bitflag(doy_10, 2);
    bits[28] = xmit::bitflag(doy_10, 1);

    let doy = (datetime.doy % 10) as u8;
    bits[30] = xmit::bitflag(doy, 8);
    bits[31] = xmit::bitflag(doy, 4);
    bits[32] = xmit::bitflag(doy, 2);
    bits[33] = xmit::bitflag(doy, 1);

    let mut dut1 = (params.dut1_ms / 100) as i8;
    bits[36] = u8::from(dut1 >= 0);
    bits[37] = u8::from(dut1 < 0);
    bits[38] = u8::from(dut1 >= 0);
    if dut1 < 0 {
        dut1 = -dut1;
    }
    let dut1 = dut1 as u8;
    bits[40] = xmit::bitflag(dut1, 8);
    bits[41] = xmit::bitflag(dut1, 4);
    bits[42] = xmit::bitflag(dut1, 2);
    bits[43] = xmit::bitflag(dut1, 1);

    let year_10 = ((datetime.year % 100) / 10) as u8;
    bits[45] = xmit::bitflag(year_10, 8);
    bits[46] = xmit::bitflag(year_10, 4);
    bits[47] = xmit::bitflag(year_10, 2);
    bits[48] = xmit::bitflag(year_10, 1);

    let year = (datetime.year % 10) as u8;
    bits[50] = xmit::bitflag(year, 8);
    bits[51] = xmit::bitflag(year, 4);
    bits[52] = xmit::bitflag(year, 2);
    bits[53] = xmit::bitflag(year, 1);

    bits[55] = u8::from(calendar::is_leap(datetime.year));

    let us = calendar::is_us_dst(datetime);
    bits[57] = u8::from(us.end_of_day);
    bits[58] = u8::from(us.start_of_day);

    let mut pattern = XmitPattern::new();
    let mut j = 0usize;
    // Marker: low for 800 ms; 0: 200 ms; 1: 500 ms.
    for &b in bits.iter() {
        let dsec_lo: u32 = if b == SYNC_MARKER {
            8
        } else if b != 0 {
            5
        } else {
            2
        };
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
        UserParams { offset_ms: 0.0, station: Station::Wwvb, jjy_khz: JjyKhz::Khz40, dut1_ms: 0, noclip: true }
    }

    #[test]
    fn sync_marker_seconds_have_the_widest_low_run() {
        let dt = calendar::parse(1_704_067_200_000);
        let pattern = encode(dt, &params());
        // Sync marker seconds (0, 9, 19, ...) hold low for 800 ms = 16 ticks.
        let base = 0usize * xmit::TICKS_PER_SEC as usize;
        for tick in base..base + 16 {
            assert!(!pattern.is_high(tick as u16));
        }
    }
}
