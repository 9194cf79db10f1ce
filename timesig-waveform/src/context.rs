//! Waveform context: the per-generator state advanced one render quantum at
//! a time to produce an emulated time station audio signal.

use timesig_protocol::calendar;
use timesig_protocol::encoders;
use timesig_protocol::station::{JjyKhz, Station, UserParams};
use timesig_protocol::xmit::{self, XmitPattern};

use timesig_protocol::encoders::jjy;

use crate::state::LifecycleState;

/// Samples processed per `generate()` call. Audio backends that support the
/// Web Audio Worklet render quantum (all of them, as of this writing) use
/// 128 regardless of sample rate.
pub const RENDER_QUANTUM: usize = 128;

/// Duration of the fade in/fade out ramp, in milliseconds.
pub const FADE_MS: u32 = 35;

const TWO_PI: f64 = std::f64::consts::TAU;
const LERP_RATE: f32 = 0.015;
const LERP_MIN_DELTA: f32 = 0.005;
const SUBHARMONIC_THRESHOLD: u32 = 10_000;
const SUBHARMONIC_FIFTH: u8 = 5;
const SUBHARMONIC_SEVENTH: u8 = 7;

/// Real-time-safe carrier frequency used for phase/subharmonic math.
///
/// JJY's station profile carries its 40 kHz nominal; if the user selected
/// the 60 kHz carrier, that overrides the table value here.
pub fn effective_target_hz(params: &UserParams) -> u32 {
    if params.station != Station::Jjy || params.jjy_khz != JjyKhz::Khz60 {
        params.station.profile().target_hz
    } else {
        60_000
    }
}

fn calculate_subharmonic(target_hz: u32) -> u8 {
    if target_hz / u32::from(SUBHARMONIC_FIFTH) <= SUBHARMONIC_THRESHOLD {
        SUBHARMONIC_FIFTH
    } else {
        SUBHARMONIC_SEVENTH
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let c = a % b;
        a = b;
        b = c;
    }
    a
}

fn lerp(target_gain: f32, gain: f32) -> f32 {
    if (target_gain - gain).abs() > LERP_MIN_DELTA {
        (1.0 - LERP_RATE) * gain + LERP_RATE * target_gain
    } else {
        target_gain
    }
}

/// Waveform context for one generator. Produces a waveform similar to that
/// emitted by a real time station, tick by tick.
pub struct WaveformCtx {
    sample_rate: u32,

    /// Per-tick transmit level flags for the current station minute.
    xmit_level: XmitPattern,

    /// Base timestamp of this context, already shifted to the station's
    /// local time and to the start of the first render quantum.
    timestamp_ms: f64,
    samples: u32,
    next_tick: u32,
    morse_end: u32,
    tick: u16,

    phase_delta: u32,
    phase_base: u32,
    phase: u32,

    max_fade_gain: u32,
    fade_gain: u32,
    gain: f32,

    /// Scale factor for emulated integer-quantized LPCM.
    scale: i32,
}

impl WaveformCtx {
    /// Initialize a waveform context.
    ///
    /// `now_ms` is the host's notion of "now" (e.g. `AudioContext.currentTime`
    /// translated to epoch milliseconds); this crate never reads a clock
    /// itself so that it stays deterministic and testable.
    pub fn init(sample_rate: u32, now_ms: f64, params: &UserParams) -> Self {
        let utc_offset = params.station.profile().utc_offset_ms as f64;
        let render_quantum_ms = 1000.0 * RENDER_QUANTUM as f64 / sample_rate as f64;

        let target_hz = effective_target_hz(params);
        let subharmonic = calculate_subharmonic(target_hz);
        let g = gcd(target_hz, sample_rate * u32::from(subharmonic));

        WaveformCtx {
            sample_rate,
            xmit_level: XmitPattern::new(),
            timestamp_ms: now_ms + utc_offset + render_quantum_ms,
            samples: 0,
            next_tick: 0,
            morse_end: 0,
            tick: 0,
            phase_delta: target_hz / g,
            phase_base: sample_rate * u32::from(subharmonic) / g,
            phase: 0,
            max_fade_gain: sample_rate * FADE_MS / 1000,
            fade_gain: 0,
            gain: 0.0,
            scale: (sample_rate / u32::from(subharmonic)) as i32,
        }
    }

    fn next_sample(&self) -> f32 {
        let angle = TWO_PI * f64::from(self.phase) / f64::from(self.phase_base);
        let lpcm_sample = (angle.sin() * f64::from(self.gain) * f64::from(self.scale)) as i32;
        lpcm_sample as f32 / self.scale as f32
    }

    /// Generate `RENDER_QUANTUM` samples, replicated into every buffer in
    /// `outputs`, and advance internal state by one render quantum.
    ///
    /// `state` should be `FadeIn`, `Running`, or `FadeOut` — the only
    /// states in which a coordinator should be calling this at all. Returns
    /// `Some(next_state)` only when a fade completed: `FadeIn` -> `Running`
    /// or `FadeOut` -> `Suspend`.
    pub fn generate(
        &mut self,
        params: &UserParams,
        state: LifecycleState,
        outputs: &mut [&mut [f32]],
    ) -> Option<LifecycleState> {
        let profile = params.station.profile();
        let mut xmit_low = profile.xmit_low;
        let mut completed = None;

        for i in 0..RENDER_QUANTUM {
            if self.samples == self.next_tick {
                let adj_timestamp_ms = 1000.0 * f64::from(self.samples) / f64::from(self.sample_rate)
                    + self.timestamp_ms
                    + params.offset_ms;
                let adj_datetime = calendar::parse(adj_timestamp_ms as i64);

                let msec_since_min = 1000 * u32::from(adj_datetime.sec) + u32::from(adj_datetime.msec);
                self.tick = (msec_since_min / xmit::TICK_MS) as u16;

                if self.samples == 0 || self.tick == 0 {
                    self.xmit_level = encoders::encode(adj_datetime, params);
                }

                let msec_since_tick = u32::from(adj_datetime.msec) % xmit::TICK_MS;
                let msec_to_tick = xmit::TICK_MS - msec_since_tick;
                self.next_tick += msec_to_tick * self.sample_rate / 1000;

                // Anchor the waveform's phase so the next minute's boundary
                // lands on a rising zero crossing.
                if self.samples == 0 {
                    let msec_to_min = calendar::MSECS_MIN as u32 - msec_since_min;
                    let to_min = msec_to_min * self.sample_rate / 1000;
                    let phase_to_min = (to_min * self.phase_delta) % self.phase_base;
                    if phase_to_min != 0 {
                        self.phase = self.phase_base - phase_to_min;
                    }
                }

                if params.station == Station::Jjy && self.morse_end == 0 {
                    let min = adj_datetime.min;
                    let is_announce = min == jjy::ANNOUNCE_MIN || min == jjy::ANNOUNCE_MIN2;
                    if is_announce {
                        let sec = adj_datetime.sec;
                        let msec = adj_datetime.msec;
                        let is_morse = ((sec == jjy::MORSE_SEC && msec >= jjy::MORSE_MS)
                            || jjy::MORSE_SEC < sec)
                            && sec < jjy::MORSE_END_SEC;
                        if is_morse {
                            let msec_to_morse_end = 1000 * u32::from(jjy::MORSE_END_SEC) - msec_since_min;
                            self.morse_end = self.samples + msec_to_morse_end * self.sample_rate / 1000;
                        }
                    }
                }
            }

            if self.morse_end != 0 {
                if self.samples < self.morse_end {
                    xmit_low = 0.0;
                } else {
                    self.morse_end = 0;
                }
            }

            let is_xmit_high = self.xmit_level.is_high(self.tick);
            let mut target_gain = if is_xmit_high { 1.0 } else { xmit_low };
            let gain = self.gain;

            if self.fade_gain != self.max_fade_gain {
                target_gain *= (self.fade_gain * self.fade_gain) as f32
                    / (self.max_fade_gain * self.max_fade_gain) as f32;
            }

            self.gain = if params.noclip { lerp(target_gain, gain) } else { target_gain };

            let sample = self.next_sample();
            for output in outputs.iter_mut() {
                output[i] = sample;
            }

            self.phase += self.phase_delta;
            if self.phase >= self.phase_base {
                self.phase -= self.phase_base;
            }

            self.samples += 1;

            match state {
                LifecycleState::FadeIn => {
                    if self.fade_gain < self.max_fade_gain {
                        self.fade_gain += 1;
                    } else if target_gain == self.gain {
                        completed = Some(LifecycleState::Running);
                    }
                }
                LifecycleState::FadeOut => {
                    if self.fade_gain != 0 {
                        self.fade_gain -= 1;
                    } else if target_gain == self.gain {
                        completed = Some(LifecycleState::Suspend);
                    }
                }
                _ => {}
            }
        }

        completed
    }
}

/// Fill every output buffer with `RENDER_QUANTUM` samples of silence.
pub fn generate_silence(outputs: &mut [&mut [f32]]) {
    for output in outputs.iter_mut() {
        for sample in output.iter_mut().take(RENDER_QUANTUM) {
            *sample = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timesig_protocol::station::{JjyKhz, Station, UserParams};

    fn params(station: Station) -> UserParams {
        UserParams { offset_ms: 0.0, station, jjy_khz: JjyKhz::Khz40, dut1_ms: 0, noclip: true }
    }

    #[test]
    fn jjy_carrier_override_changes_subharmonic_math() {
        let mut p40 = params(Station::Jjy);
        p40.jjy_khz = JjyKhz::Khz40;
        let mut p60 = params(Station::Jjy);
        p60.jjy_khz = JjyKhz::Khz60;

        assert_eq!(effective_target_hz(&p40), 40_000);
        assert_eq!(effective_target_hz(&p60), 60_000);
    }

    #[test]
    fn subharmonic_picks_fifth_under_threshold() {
        // 68500 / 5 = 13700 > 10000 -> seventh; 40000 / 5 = 8000 <= 10000 -> fifth.
        assert_eq!(calculate_subharmonic(40_000), 5);
        assert_eq!(calculate_subharmonic(68_500), 7);
    }

    #[test]
    fn generate_fills_every_output_buffer() {
        let mut ctx = WaveformCtx::init(48_000, 1_704_067_200_000.0, &params(Station::Wwvb));
        let mut left = [0.0f32; RENDER_QUANTUM];
        let mut right = [0.0f32; RENDER_QUANTUM];
        {
            let mut outputs: Vec<&mut [f32]> = vec![&mut left, &mut right];
            ctx.generate(&params(Station::Wwvb), LifecycleState::Running, &mut outputs);
        }
        assert_eq!(left, right);
    }

    #[test]
    fn fade_in_completes_eventually() {
        let p = params(Station::Wwvb);
        let mut ctx = WaveformCtx::init(8_000, 1_704_067_200_000.0, &p);
        let mut buf = [0.0f32; RENDER_QUANTUM];
        let mut completed = None;
        for _ in 0..64 {
            let mut outputs: Vec<&mut [f32]> = vec![&mut buf];
            if let Some(c) = ctx.generate(&p, LifecycleState::FadeIn, &mut outputs) {
                completed = Some(c);
                break;
            }
        }
        assert_eq!(completed, Some(LifecycleState::Running));
    }
}
