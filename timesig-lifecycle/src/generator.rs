//! The generator: ties the lifecycle state machine to waveform synthesis.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};

use timesig_protocol::station::UserParams;
use timesig_waveform::{LifecycleState, WaveformCtx, RENDER_QUANTUM};

/// Delay, in milliseconds, held at `Startup` and `Suspend` before continuing
/// the transition. On the real hardware this exists so the controller has
/// time to pick up `AudioContext.outputLatency`, and so a shutdown doesn't
/// clip the fade-out tail; kept here for behavioral fidelity even though
/// nothing in this crate actually depends on audio context latency.
pub const DELAY_MS: u32 = 465;

struct RenderCtx {
    params: Option<UserParams>,
    waveform: Option<WaveformCtx>,
    delay_quantums: u32,
}

/// Coordinates the lifecycle state machine and drives [`WaveformCtx`]
/// generation one render quantum at a time.
///
/// `start()`/`load_params()`/`stop()` are meant to be called from a
/// controller (whatever decides when the user wants sound); `render()` is
/// meant to be called from whatever produces audio quanta. Both sides only
/// touch an `AtomicU8` and a couple of mutexes, so neither blocks the other
/// for long, mirroring the non-blocking handoff the original real-time
/// audio thread design calls for.
pub struct Generator {
    state: AtomicU8,
    sample_rate: u32,
    staged_params: Mutex<Option<UserParams>>,
    render: Mutex<RenderCtx>,
    notify: Box<dyn Fn(LifecycleState) + Send + Sync>,
}

impl Generator {
    pub fn new(sample_rate: u32, notify: impl Fn(LifecycleState) + Send + Sync + 'static) -> Self {
        Generator {
            state: AtomicU8::new(LifecycleState::Idle as u8),
            sample_rate,
            staged_params: Mutex::new(None),
            render: Mutex::new(RenderCtx {
                params: None,
                waveform: None,
                delay_quantums: Self::delay_quantums_for(sample_rate),
            }),
            notify: Box::new(notify),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        LifecycleState::try_from(self.state.load(Ordering::SeqCst))
            .expect("generator state is only ever written by this crate")
    }

    fn set_state(&self, next: LifecycleState) {
        self.state.store(next as u8, Ordering::SeqCst);
        (self.notify)(next);
    }

    fn delay_quantums_for(sample_rate: u32) -> u32 {
        sample_rate * DELAY_MS / (1000 * RENDER_QUANTUM as u32)
    }

    fn delay_finished(delay_quantums: &mut u32, sample_rate: u32) -> bool {
        if *delay_quantums == 0 {
            return false;
        }
        *delay_quantums -= 1;
        if *delay_quantums == 0 {
            *delay_quantums = Self::delay_quantums_for(sample_rate);
            true
        } else {
            false
        }
    }

    /// Request a start. Transitions to `Startup`; the caller should supply
    /// params via [`Generator::load_params`] once it observes `ReqParams`.
    pub fn start(&self) {
        self.set_state(LifecycleState::Startup);
    }

    /// Stage params and transition to `LoadParams`. The render loop picks
    /// these up on its next quantum and begins fading in.
    pub fn load_params(&self, params: UserParams) {
        *self.staged_params.lock().unwrap() = Some(params);
        self.set_state(LifecycleState::LoadParams);
    }

    /// Request a stop. If playback never actually started (state is still
    /// below `FadeIn`), short-circuits straight to `Idle` instead of fading
    /// out a signal that was never audible.
    pub fn stop(&self) {
        let state = self.state();
        let next = if state < LifecycleState::FadeIn {
            self.render.lock().unwrap().delay_quantums = Self::delay_quantums_for(self.sample_rate);
            LifecycleState::Idle
        } else {
            LifecycleState::FadeOut
        };
        self.set_state(next);
    }

    /// Process one render quantum of audio, writing `RENDER_QUANTUM`
    /// samples into every buffer in `outputs`.
    ///
    /// `now_ms` is the host's notion of "now"; only consulted at the
    /// `LoadParams` transition, when a fresh [`WaveformCtx`] is built.
    pub fn render(&self, now_ms: f64, outputs: &mut [&mut [f32]]) {
        let state = self.state();
        let mut next_state = state;
        let mut silent = true;

        let mut render = self.render.lock().unwrap();

        match state {
            LifecycleState::Idle => {}

            LifecycleState::Startup => {
                if Self::delay_finished(&mut render.delay_quantums, self.sample_rate) {
                    next_state = LifecycleState::ReqParams;
                }
            }

            LifecycleState::ReqParams => {}

            LifecycleState::LoadParams => {
                let params = self
                    .staged_params
                    .lock()
                    .unwrap()
                    .take()
                    .expect("LoadParams state entered without staged params");
                let waveform = WaveformCtx::init(self.sample_rate, now_ms, &params);
                tracing::debug!(?params, "loaded params, entering fade in");
                render.params = Some(params);
                render.waveform = Some(waveform);
                next_state = LifecycleState::FadeIn;
            }

            LifecycleState::FadeIn | LifecycleState::Running | LifecycleState::FadeOut => {
                let params = render.params.expect("render state without loaded params");
                let waveform = render
                    .waveform
                    .as_mut()
                    .expect("render state without a waveform context");

                if let Some(requested) = waveform.generate(&params, state, outputs) {
                    next_state = requested;
                    tracing::debug!(?next_state, "fade complete");
                }
                silent = false;
            }

            LifecycleState::Suspend => {
                if Self::delay_finished(&mut render.delay_quantums, self.sample_rate) {
                    render.params = None;
                    render.waveform = None;
                    next_state = LifecycleState::Idle;
                }
            }
        }

        drop(render);

        if silent {
            timesig_waveform::generate_silence(outputs);
        }

        if next_state != state {
            self.set_state(next_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use timesig_protocol::station::{JjyKhz, Station};

    fn params() -> UserParams {
        UserParams { offset_ms: 0.0, station: Station::Wwvb, jjy_khz: JjyKhz::Khz40, dut1_ms: 0, noclip: true }
    }

    fn new_generator(sample_rate: u32) -> (Generator, Arc<StdMutex<Vec<LifecycleState>>>) {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let recorder = seen.clone();
        let generator = Generator::new(sample_rate, move |s| recorder.lock().unwrap().push(s));
        (generator, seen)
    }

    #[test]
    fn starts_idle() {
        let (generator, _) = new_generator(8_000);
        assert_eq!(generator.state(), LifecycleState::Idle);
    }

    #[test]
    fn stop_before_fade_in_short_circuits_to_idle() {
        let (generator, seen) = new_generator(8_000);
        generator.start();
        generator.stop();
        assert_eq!(generator.state(), LifecycleState::Idle);
        assert_eq!(*seen.lock().unwrap(), vec![LifecycleState::Startup, LifecycleState::Idle]);
    }

    #[test]
    fn startup_eventually_reaches_req_params() {
        let (generator, _) = new_generator(8_000);
        generator.start();
        let mut buf = [0.0f32; RENDER_QUANTUM];
        let quantums = Generator::delay_quantums_for(8_000);
        for _ in 0..=quantums {
            let mut outputs: Vec<&mut [f32]> = vec![&mut buf];
            generator.render(0.0, &mut outputs);
            if generator.state() == LifecycleState::ReqParams {
                break;
            }
        }
        assert_eq!(generator.state(), LifecycleState::ReqParams);
    }

    #[test]
    fn load_params_then_render_drives_fade_in_to_running() {
        let (generator, _) = new_generator(8_000);
        generator.load_params(params());
        assert_eq!(generator.state(), LifecycleState::LoadParams);

        let mut buf = [0.0f32; RENDER_QUANTUM];
        let mut outputs: Vec<&mut [f32]> = vec![&mut buf];
        generator.render(1_704_067_200_000.0, &mut outputs);
        assert_eq!(generator.state(), LifecycleState::FadeIn);

        let mut reached_running = false;
        for _ in 0..64 {
            let mut outputs: Vec<&mut [f32]> = vec![&mut buf];
            generator.render(1_704_067_200_000.0, &mut outputs);
            if generator.state() == LifecycleState::Running {
                reached_running = true;
                break;
            }
        }
        assert!(reached_running);
    }

    #[test]
    fn idle_render_produces_silence() {
        let (generator, _) = new_generator(8_000);
        let mut buf = [1.0f32; RENDER_QUANTUM];
        let mut outputs: Vec<&mut [f32]> = vec![&mut buf];
        generator.render(0.0, &mut outputs);
        assert!(buf.iter().all(|&s| s == 0.0));
    }
}
