//! # timesig-protocol
//!
//! Calendar math and time-station bit encoders for the time signal emulator.
//!
//! ## What This Library Provides
//!
//! - **Calendar math** (`calendar`): timestamp parsing, leap years, EU/US
//!   DST changeovers.
//! - **Station identity and profiles** (`station`): `Station`, `JjyKhz`,
//!   `UserParams`, and each station's nominal carrier frequency and gain.
//! - **Bit encoders** (`encoders`): BPC, DCF77, JJY, MSF, and WWVB, each
//!   turning a datetime and user params into a per-tick `XmitPattern`.
//!
//! ## What This Library Does NOT Provide
//!
//! - Audio sample generation (see `timesig-waveform`).
//! - Lifecycle/state coordination (see `timesig-lifecycle`).
//!
//! This is a pure logic library with zero I/O dependencies.
//!
//! ## Example Usage
//!
//! ```rust
//! use timesig_protocol::calendar;
//! use timesig_protocol::station::{JjyKhz, Station, UserParams};
//! use timesig_protocol::encoders;
//!
//! let params = UserParams {
//!     offset_ms: 0.0,
//!     station: Station::Dcf77,
//!     jjy_khz: JjyKhz::Khz40,
//!     dut1_ms: 0,
//!     noclip: true,
//! };
//!
//! let dt = calendar::parse(1_704_067_200_000);
//! let pattern = encoders::encode(dt, &params);
//! // Second 20 carries bit 20 (set for this minute): low for its first 4
//! // ticks, then high for the rest of the second.
//! assert!(pattern.is_high(20 * timesig_protocol::xmit::TICKS_PER_SEC as u16 + 4));
//! ```

pub mod calendar;
pub mod encoders;
pub mod error;
pub mod station;
pub mod xmit;

pub use error::{InvalidJjyKhz, InvalidStation};
pub use station::{JjyKhz, Station, StationProfile, UserParams};
pub use xmit::XmitPattern;
