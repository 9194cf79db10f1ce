//! Demo binary for the time signal emulator.
//!
//! `render` drives a [`timesig_lifecycle::Generator`] in a loop and writes
//! the result to a WAV file, standing in for the real-time audio host that
//! the library crates assume but don't provide. `locales` exercises
//! `timesig-editdistance`'s harness against a JSON fixture file.
//!
//! Neither subcommand is part of the emulator itself; both exist to give
//! the library crates somewhere to run.

mod locales;
mod render;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "timesig-cli")]
#[command(about = "Demo driver for the time station signal emulator")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a station's waveform to a WAV file.
    Render(render::RenderArgs),
    /// Rank locale tags/display names from a JSON fixture against a query.
    Locales(locales::LocalesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    match args.command {
        Command::Render(render_args) => render::run(render_args),
        Command::Locales(locales_args) => locales::run(locales_args),
    }
}
