//! Per-station bit-encoders.
//!
//! Each submodule exposes `encode(datetime, params) -> XmitPattern`, the
//! per-tick carrier on/off pattern for one minute of that station's
//! broadcast. Encoding is pure and infallible: callers are responsible for
//! supplying a `datetime` already adjusted to the station's local time
//! where the protocol calls for it (DCF77/MSF/WWVB/JJY math below notes
//! which).

pub mod bpc;
pub mod dcf77;
pub mod jjy;
pub mod msf;
pub mod wwvb;

use crate::calendar::Datetime;
use crate::station::{Station, UserParams};
use crate::xmit::XmitPattern;

/// Dispatch to the encoder for `params.station`.
pub fn encode(datetime: Datetime, params: &UserParams) -> XmitPattern {
    match params.station {
        Station::Bpc => bpc::encode(datetime, params),
        Station::Dcf77 => dcf77::encode(datetime, params),
        Station::Jjy => jjy::encode(datetime, params),
        Station::Msf => msf::encode(datetime, params),
        Station::Wwvb => wwvb::encode(datetime, params),
    }
}
