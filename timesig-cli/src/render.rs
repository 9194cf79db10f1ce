//! `render` subcommand: drive a [`Generator`] in a loop and write the
//! result to a WAV file.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use timesig_lifecycle::Generator;
use timesig_protocol::station::{JjyKhz, Station, UserParams};
use timesig_waveform::RENDER_QUANTUM;
use tracing::info;

#[derive(Clone, Copy, ValueEnum)]
enum StationArg {
    Bpc,
    Dcf77,
    Jjy,
    Msf,
    Wwvb,
}

impl From<StationArg> for Station {
    fn from(arg: StationArg) -> Self {
        match arg {
            StationArg::Bpc => Station::Bpc,
            StationArg::Dcf77 => Station::Dcf77,
            StationArg::Jjy => Station::Jjy,
            StationArg::Msf => Station::Msf,
            StationArg::Wwvb => Station::Wwvb,
        }
    }
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Which station to render.
    #[arg(long, value_enum, default_value = "wwvb")]
    station: StationArg,

    /// Output sample rate in Hz.
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// How many seconds of signal to render, not counting fade in/out.
    #[arg(long, default_value = "10.0")]
    duration_secs: f64,

    /// JJY carrier: 40 or 60 (kHz). Ignored for other stations.
    #[arg(long, default_value = "40")]
    jjy_khz: u8,

    /// DUT1 correction, in milliseconds.
    #[arg(long, default_value = "0")]
    dut1_ms: i16,

    /// Clock offset applied before encoding, in milliseconds.
    #[arg(long, default_value = "0.0")]
    offset_ms: f64,

    /// Smooth gain changes to avoid audible clicks.
    #[arg(long)]
    noclip: bool,

    /// WAV file to write.
    #[arg(short, long, default_value = "timesig.wav")]
    output: PathBuf,
}

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs_f64()
        * 1000.0
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let jjy_khz = JjyKhz::try_from(if args.jjy_khz == 60 { 1 } else { 0 })?;
    let params = UserParams {
        offset_ms: args.offset_ms,
        station: args.station.into(),
        jjy_khz,
        dut1_ms: args.dut1_ms,
        noclip: args.noclip,
    };

    let generator = Generator::new(args.sample_rate, |state| {
        info!(?state, "lifecycle transition");
    });

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: args.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&args.output, spec)?;

    let base_now = now_ms();
    let mut buf = [0.0f32; RENDER_QUANTUM];
    let mut rendered_samples: u64 = 0;
    let target_samples = (args.duration_secs * f64::from(args.sample_rate)) as u64;

    generator.start();
    loop {
        let mut outputs: Vec<&mut [f32]> = vec![&mut buf];
        generator.render(base_now, &mut outputs);
        if generator.state() == timesig_lifecycle::LifecycleState::ReqParams {
            break;
        }
    }
    generator.load_params(params);

    let mut stopped = false;
    loop {
        let elapsed_ms = rendered_samples as f64 / f64::from(args.sample_rate) * 1000.0;
        let mut outputs: Vec<&mut [f32]> = vec![&mut buf];
        generator.render(base_now + elapsed_ms, &mut outputs);

        for &sample in buf.iter() {
            writer.write_sample((sample * f32::from(i16::MAX)) as i16)?;
        }
        rendered_samples += RENDER_QUANTUM as u64;

        if !stopped && rendered_samples >= target_samples {
            generator.stop();
            stopped = true;
        }
        if stopped && generator.state() == timesig_lifecycle::LifecycleState::Idle {
            break;
        }
    }

    writer.finalize()?;
    info!(path = %args.output.display(), samples = rendered_samples, "wrote WAV file");
    Ok(())
}
