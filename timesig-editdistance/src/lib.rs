//! # timesig-editdistance
//!
//! UTF-16 Damerau-Levenshtein edit distance (adjacent transpositions only),
//! plus a fixed-size harness for ranking locale tags and display names
//! against a user's typed query.
//!
//! This has no real dependency on the rest of the time station emulator; it
//! backs `timesig-cli`'s locale picker the same way the original used it to
//! rank browser locale fixtures against a search box, and is kept as a
//! separate crate so that use doesn't drag waveform or protocol code along.
//!
//! ## What This Library Does NOT Provide
//! - Locale data itself. Callers load their own tags and display names.
//! - General Unicode normalization: the distance is over UTF-16 code units
//!   grouped into code points, not normalization forms or grapheme clusters.

pub mod algorithm;
pub mod harness;

pub use algorithm::edist;
pub use harness::{
    Harness, HarnessError, MAX_BUF_SIZE, MAX_CODE_UNITS, MAX_LOCALES, MAX_NAME_CODE_UNITS,
    MAX_TAG_CODE_UNITS,
};
