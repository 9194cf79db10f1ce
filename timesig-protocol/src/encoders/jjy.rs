//! JJY (Japan, 40/60 kHz) encoder, including the Morse-code station
//! identification broadcast during the 15- and 45-minute announcements.

use crate::calendar::Datetime;
use crate::station::UserParams;
use crate::xmit::{self, SYNC_MARKER, XmitPattern};

pub const ANNOUNCE_MIN: u8 = 15;
pub const ANNOUNCE_MIN2: u8 = 45;
pub const MORSE_SEC: u8 = 40;
pub const MORSE_MS: u16 = 550;
pub const MORSE_END_SEC: u8 = 49;

const TICKS_PER_DIT: u32 = 2;
const TICKS_PER_DAH: u32 = 5;
const TICKS_PER_IEG: usize = 1; // inter-element gap
const TICKS_PER_ICG: usize = 6; // inter-character gap
const TICKS_PER_IWG: usize = 10; // inter-word gap

/// Tick at which the "JJY JJY" callsign begins (40.550s into the minute).
pub const MORSE_TICK: usize =
    MORSE_SEC as usize * xmit::TICKS_PER_SEC as usize + MORSE_MS as usize / xmit::TICK_MS as usize;
/// Tick at which the announcement's Morse segment ends (49.000s).
pub const MORSE_END_TICK: usize = MORSE_END_SEC as usize * xmit::TICKS_PER_SEC as usize;

fn morse_pulse(pattern: &mut XmitPattern, k: &mut usize, ticks: u32) {
    pattern.set_high_run(*k, ticks);
    *k += ticks as usize;
}

fn morse_callsign(pattern: &mut XmitPattern) {
    pattern.clear_range(MORSE_SEC as usize * xmit::TICKS_PER_SEC as usize, MORSE_END_TICK);

    let mut k = MORSE_TICK;
    for _ in 0..2 {
        // "JJ", i.e. .--- .---
        for _ in 0..2 {
            morse_pulse(pattern, &mut k, TICKS_PER_DIT);
            k += TICKS_PER_IEG;
            morse_pulse(pattern, &mut k, TICKS_PER_DAH);
            k += TICKS_PER_IEG;
            morse_pulse(pattern, &mut k, TICKS_PER_DAH);
            k += TICKS_PER_IEG;
            morse_pulse(pattern, &mut k, TICKS_PER_DAH);
            k += TICKS_PER_ICG;
        }
        // "Y", i.e. -.--
        morse_pulse(pattern, &mut k, TICKS_PER_DAH);
        k += TICKS_PER_IEG;
        morse_pulse(pattern, &mut k, TICKS_PER_DIT);
        k += TICKS_PER_IEG;
        morse_pulse(pattern, &mut k, TICKS_PER_DAH);
        k += TICKS_PER_IEG;
        morse_pulse(pattern, &mut k, TICKS_PER_DAH);
        k += TICKS_PER_IWG;
    }
}

/// Encode one minute of JJY transmission starting at `datetime`.
pub fn encode(datetime: Datetime, _params: &UserParams) -> XmitPattern {
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

    bits[36] = xmit::even_parity(&bits, 12, 19);
    bits[37] = xmit::even_parity(&bits, 1, 9);

    let is_announce = datetime.min == ANNOUNCE_MIN || datetime.min == ANNOUNCE_MIN2;
    if !is_announce {
        let year_10 = ((datetime.year % 100) / 10) as u8;
        bits[41] = xmit::bitflag(year_10, 8);
        bits[42] = xmit::bitflag(year_10, 4);
        bits[43] = xmit::bitflag(year_10, 2);
        bits[44] = xmit::bitflag(year_10, 1);

        let year = (datetime.year % 10) as u8;
        bits[45] = xmit::bitflag(year, 8);
        bits[46] = xmit::bitflag(year, 4);
        bits[47] = xmit::bitflag(year, 2);
        bits[48] = xmit::bitflag(year, 1);

        let dow = datetime.dow;
        bits[50] = xmit::bitflag(dow, 4);
        bits[51] = xmit::bitflag(dow, 2);
        bits[52] = xmit::bitflag(dow, 1);
    }

    let mut pattern = XmitPattern::new();
    let mut j = 0usize;
    let mut i = 0usize;
    // Marker: low for 200 ms; 0: 800 ms; 1: 500 ms.
    while i < bits.len() {
        if is_announce && i == MORSE_SEC as usize {
            morse_callsign(&mut pattern);
            // The Morse segment replaces seconds 40 through 48; second 49's
            // sync marker is still painted normally below.
            i = MORSE_END_SEC as usize;
            j = MORSE_END_TICK;
        }

        let b = bits[i];
        let hi_dsec: u32 = if b == SYNC_MARKER {
            2
        } else if b != 0 {
            5
        } else {
            8
        };
        let hi = 100 * hi_dsec / xmit::TICK_MS;
        let lo = xmit::TICKS_PER_SEC - hi;
        pattern.paint_hi_lo(&mut j, hi, lo);
        i += 1;
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar;
    use crate::station::{JjyKhz, Station};

    fn params() -> UserParams {
        UserParams { offset_ms: 0.0, station: Station::Jjy, jjy_khz: JjyKhz::Khz40, dut1_ms: 0, noclip: true }
    }

    #[test]
    fn morse_tick_window_matches_observed_range() {
        assert_eq!(MORSE_TICK, 811);
        assert_eq!(MORSE_END_TICK, 980);
    }

    #[test]
    fn announcement_minute_paints_morse_callsign() {
        // 2024-03-15 is a Friday; any day works since only min matters here.
        // Construct a Datetime directly at minute 15.
        let mut dt = calendar::parse(1_710_461_700_000); // arbitrary anchor
        dt.min = ANNOUNCE_MIN;
        let pattern = encode(dt, &params());

        // Within 811..980 there should be at least one high tick (a dit/dah)
        // and at least one low tick (an inter-element gap).
        let mut saw_high = false;
        let mut saw_low = false;
        for tick in MORSE_TICK..MORSE_END_TICK {
            if pattern.is_high(tick as u16) {
                saw_high = true;
            } else {
                saw_low = true;
            }
        }
        assert!(saw_high);
        assert!(saw_low);
    }

    #[test]
    fn non_announcement_minute_has_no_morse() {
        let mut dt = calendar::parse(1_710_461_700_000);
        dt.min = 20;
        let pattern = encode(dt, &params());
        // Second 40 should follow the ordinary data-bit marker shape, not
        // the fixed on/off Morse pulses: its high run always starts the
        // second (no cleared run mid-second at a dit/dah boundary).
        let base = 40 * xmit::TICKS_PER_SEC as u16;
        assert!(pattern.is_high(base));
    }
}
