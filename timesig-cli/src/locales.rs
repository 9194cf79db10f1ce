//! `locales` subcommand: rank a JSON fixture of locale tags/display names
//! against a query string using [`timesig_editdistance::Harness`].

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use timesig_editdistance::Harness;
use tracing::info;

#[derive(Deserialize)]
struct LocaleFixture {
    tag: String,
    name: String,
}

#[derive(Parser)]
pub struct LocalesArgs {
    /// JSON file holding an array of `{"tag": ..., "name": ...}` objects.
    #[arg(long)]
    fixtures: PathBuf,

    /// Query string to rank locales against.
    query: String,

    /// How many top matches to print.
    #[arg(long, default_value = "5")]
    top: usize,
}

fn pack(buf: &mut [u8; timesig_editdistance::MAX_BUF_SIZE], offset: usize, s: &str) -> u8 {
    let mut len = 0u8;
    for (i, unit) in s.encode_utf16().enumerate() {
        let bytes = unit.to_le_bytes();
        buf[offset + 2 * i] = bytes[0];
        buf[offset + 2 * i + 1] = bytes[1];
        len += 1;
    }
    len
}

pub fn run(args: LocalesArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.fixtures)?;
    let fixtures: Vec<LocaleFixture> = serde_json::from_str(&raw)?;
    info!(count = fixtures.len(), path = %args.fixtures.display(), "loaded locale fixtures");

    let mut harness = Harness::new();
    for fixture in &fixtures {
        let tag_units = fixture.tag.encode_utf16().count();
        let tag_len = pack(harness.buf_mut(), 0, &fixture.tag);
        let name_len = pack(harness.buf_mut(), tag_units * 2, &fixture.name);
        harness.load_locale(tag_len, name_len)?;
    }

    let query_len = pack(harness.buf_mut(), 0, &args.query);
    let scores = harness.run_query(query_len)?;

    let mut ranked: Vec<(&LocaleFixture, u8)> =
        fixtures.iter().zip(scores.iter().copied()).collect();
    ranked.sort_by_key(|(_, score)| *score);

    for (fixture, score) in ranked.into_iter().take(args.top) {
        println!("{score}\t{}\t{}", fixture.tag, fixture.name);
    }

    Ok(())
}
