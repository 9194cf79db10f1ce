//! # timesig-lifecycle
//!
//! The state machine that coordinates a time station emulator's startup,
//! waveform generation, and shutdown.
//!
//! A generator cycles through 8 states: `Idle -> Startup -> ReqParams ->
//! LoadParams -> FadeIn -> Running -> FadeOut -> Suspend -> Idle`. The
//! controller (UI, CLI, whatever decides what the user wants) calls
//! [`Generator::start`], [`Generator::load_params`], and [`Generator::stop`];
//! whatever produces audio quanta calls [`Generator::render`] on a fixed
//! schedule and gets `RENDER_QUANTUM` samples back each time.
//!
//! State changes are announced to the controller via a notify callback
//! supplied at construction, so the render side never blocks waiting for
//! the controller to react. The state enum itself (`LifecycleState`) lives
//! in `timesig-waveform` since its render loop needs to know which fade
//! direction to run; this crate re-exports it so callers only need one name.
//!
//! This crate logs state transitions with `tracing` but otherwise has no
//! ambient I/O: callers own the audio backend and the controller.

pub mod generator;

pub use generator::{Generator, DELAY_MS};
pub use timesig_waveform::{InvalidLifecycleState, LifecycleState};
