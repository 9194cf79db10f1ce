//! # timesig-waveform
//!
//! Real-time audio synthesis for the time signal emulator.
//!
//! A real time station transmits by keying a carrier on and off (WWVB,
//! DCF77, MSF) or shifting its amplitude between two levels (BPC, JJY).
//! Those carriers sit far above what consumer audio hardware or human
//! hearing can reproduce, so this crate does not synthesize the true
//! carrier. Instead it picks a subharmonic (carrier / 5 or carrier / 7,
//! whichever lands at or under 10 kHz) and quantizes samples the way a
//! cheap integer DAC would, which happens to reproduce enough harmonic
//! content above the subharmonic for a real receiver tuned to the true
//! carrier frequency to lock onto it.
//!
//! ## What This Library Provides
//!
//! - [`context::WaveformCtx`]: per-generator state, advanced one render
//!   quantum (128 samples) at a time via [`context::WaveformCtx::generate`].
//! - Exact-rational phase accumulation so long-running generation never
//!   drifts from the subharmonic's true frequency.
//! - Fade in/out envelopes and constant-power gain smoothing.
//!
//! ## What This Library Does NOT Provide
//!
//! - The coordinator that decides *when* to transition between states (see
//!   `timesig-lifecycle`); this crate only defines the state enum itself,
//!   since [`context::WaveformCtx::generate`] needs to know which fade
//!   direction it's rendering.
//! - Station bit encoding (see `timesig_protocol::encoders`).
//!
//! This crate never reads a wall clock; the host supplies "now" so that
//! generation stays deterministic and testable.

pub mod context;
pub mod state;

pub use context::{generate_silence, WaveformCtx, FADE_MS, RENDER_QUANTUM};
pub use state::{InvalidLifecycleState, LifecycleState};
