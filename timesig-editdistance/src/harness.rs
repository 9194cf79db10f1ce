//! Fixed-size harness for ranking locale tags/display names against a
//! query string by edit distance, without allocating per query.

use thiserror::Error;

use crate::algorithm::{calc, make_idxs};

/// Size of the bidirectional packing buffer, in bytes.
pub const MAX_BUF_SIZE: usize = 256;
/// Maximum count of locales a single harness can hold at once.
pub const MAX_LOCALES: usize = 200;
/// Maximum locale tag length, in UTF-16 code units, before the synthetic
/// script subtag (if any) is injected.
pub const MAX_TAG_CODE_UNITS: usize = 12;
/// Maximum locale display name length, in UTF-16 code units.
pub const MAX_NAME_CODE_UNITS: usize = 40;
/// Maximum query string length, in UTF-16 code units.
pub const MAX_CODE_UNITS: usize = MAX_NAME_CODE_UNITS;

/// A length or count passed to [`Harness`] would overrun one of its
/// fixed-size buffers.
///
/// The original C harness documents these as caller contract and leaves
/// violating them undefined behavior; the one thing this port does
/// differently is refuse instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HarnessError {
    #[error("harness already holds the maximum of {MAX_LOCALES} locales")]
    TooManyLocales,
    #[error("locale tag length {len} exceeds the {max}-code-unit limit")]
    TagTooLong { len: u8, max: u8 },
    #[error("locale display name length {len} exceeds the {max}-code-unit limit")]
    NameTooLong { len: u8, max: u8 },
    #[error("query length {len} exceeds the {max}-code-unit limit")]
    QueryTooLong { len: u8, max: u8 },
    #[error("packed locale data ({needed} bytes) exceeds the {capacity}-byte buffer")]
    BufferOverrun { needed: usize, capacity: usize },
}

struct UserLocale {
    tag: [u16; MAX_TAG_CODE_UNITS],
    tag_len: u8,
    name: [u16; MAX_NAME_CODE_UNITS],
    name_len: u8,
}

/// Ranks locale tags and display names against a query string.
///
/// Callers pack a UTF-16LE string (tag, then display name, then query, one
/// at a time) into [`Harness::buf_mut`] and call [`Harness::load_locale`]
/// or [`Harness::run_query`]. This mirrors a JS-to-Wasm marshaling
/// convention from the original (pack into a shared buffer, call a
/// function with the packed lengths) that has no real purpose in a
/// same-process Rust library, but is kept since `timesig-cli`'s locale
/// ranking demo packs fixtures the same way for parity with that contract.
pub struct Harness {
    buf: [u8; MAX_BUF_SIZE],
    locales: Vec<UserLocale>,
    /// Cached identity index map, reused for every locale tag/name: none of
    /// them contain surrogate pairs, so code unit index == code point index.
    idxs: [u8; MAX_CODE_UNITS],
}

impl Harness {
    pub fn new() -> Self {
        let mut idxs = [0u8; MAX_CODE_UNITS];
        for (i, slot) in idxs.iter_mut().enumerate() {
            *slot = (i + 1) as u8;
        }
        Harness { buf: [0; MAX_BUF_SIZE], locales: Vec::new(), idxs }
    }

    /// The bidirectional packing buffer. Write a UTF-16LE string into it
    /// before calling [`Harness::load_locale`] or [`Harness::run_query`].
    pub fn buf_mut(&mut self) -> &mut [u8; MAX_BUF_SIZE] {
        &mut self.buf
    }

    /// Drop every loaded locale.
    pub fn reset(&mut self) {
        self.locales.clear();
    }

    fn has_script_subtag(buf: &[u8], tag_len: u8) -> bool {
        let mut hyphens = 0u8;
        for i in 0..tag_len as usize {
            if buf[2 * i] == b'-' && buf[2 * i + 1] == 0 {
                hyphens += 1;
            }
        }
        hyphens > 1
    }

    /// Load a locale from the packed buffer: `tag_len` code units of tag,
    /// immediately followed by `name_len` code units of display name.
    ///
    /// Locale tags without a script subtag (e.g. `az-AZ`, one hyphen) get a
    /// synthetic one spliced in (`az-\0\0\0\0-AZ`) so they don't score an
    /// artificially low distance against queries for related locales that
    /// do carry a script subtag (e.g. `az-Cyrl-AZ`).
    pub fn load_locale(&mut self, tag_len: u8, name_len: u8) -> Result<(), HarnessError> {
        if self.locales.len() >= MAX_LOCALES {
            return Err(HarnessError::TooManyLocales);
        }

        let needed = (tag_len as usize + name_len as usize) * 2;
        if needed > MAX_BUF_SIZE {
            return Err(HarnessError::BufferOverrun { needed, capacity: MAX_BUF_SIZE });
        }

        let mut tag = [0u16; MAX_TAG_CODE_UNITS];
        let out_tag_len;

        if Self::has_script_subtag(&self.buf, tag_len) {
            if tag_len as usize > MAX_TAG_CODE_UNITS {
                return Err(HarnessError::TagTooLong { len: tag_len, max: MAX_TAG_CODE_UNITS as u8 });
            }
            for i in 0..tag_len as usize {
                tag[i] = u16::from_le_bytes([self.buf[2 * i], self.buf[2 * i + 1]]);
            }
            out_tag_len = tag_len;
        } else {
            let mut out_i = 0usize;
            for i in 0..tag_len as usize {
                let lo = self.buf[2 * i];
                let hi = self.buf[2 * i + 1];
                if out_i >= MAX_TAG_CODE_UNITS {
                    return Err(HarnessError::TagTooLong { len: tag_len + 5, max: MAX_TAG_CODE_UNITS as u8 });
                }
                tag[out_i] = u16::from_le_bytes([lo, hi]);
                out_i += 1;

                if lo == b'-' && hi == 0 {
                    if out_i + 5 > MAX_TAG_CODE_UNITS {
                        return Err(HarnessError::TagTooLong {
                            len: tag_len + 5,
                            max: MAX_TAG_CODE_UNITS as u8,
                        });
                    }
                    for _ in 0..4 {
                        tag[out_i] = 0;
                        out_i += 1;
                    }
                    tag[out_i] = u16::from(b'-');
                    out_i += 1;
                }
            }
            out_tag_len = tag_len + 5;
        }

        if name_len as usize > MAX_NAME_CODE_UNITS {
            return Err(HarnessError::NameTooLong { len: name_len, max: MAX_NAME_CODE_UNITS as u8 });
        }
        let mut name = [0u16; MAX_NAME_CODE_UNITS];
        let offset = tag_len as usize * 2;
        for i in 0..name_len as usize {
            name[i] = u16::from_le_bytes([self.buf[offset + 2 * i], self.buf[offset + 2 * i + 1]]);
        }

        self.locales.push(UserLocale { tag, tag_len: out_tag_len, name, name_len });
        Ok(())
    }

    /// Run a query against every loaded locale. The packed buffer should
    /// hold `len` code units of query string.
    ///
    /// Returns, for each locale in load order, the lesser of
    /// `edist(query, tag)` and `edist(query, name)`.
    pub fn run_query(&mut self, len: u8) -> Result<&[u8], HarnessError> {
        if len as usize > MAX_CODE_UNITS {
            return Err(HarnessError::QueryTooLong { len, max: MAX_CODE_UNITS as u8 });
        }

        let mut query = [0u16; MAX_CODE_UNITS];
        for i in 0..len as usize {
            query[i] = u16::from_le_bytes([self.buf[2 * i], self.buf[2 * i + 1]]);
        }
        let (query_idxs, query_len) = make_idxs(&query[..len as usize]);

        for i in 0..self.locales.len() {
            let (tag_len, name_len) = {
                let locale = &self.locales[i];
                (locale.tag_len, locale.name_len)
            };

            let mut q = query[..len as usize].to_vec();
            let mut qi = query_idxs.clone();
            let mut tag = self.locales[i].tag[..tag_len as usize].to_vec();
            let mut tag_idxs = self.idxs[..tag_len as usize].to_vec();
            let tag_score = calc(&mut q, &mut qi, query_len, &mut tag, &mut tag_idxs, tag_len);

            let mut q = query[..len as usize].to_vec();
            let mut qi = query_idxs.clone();
            let mut name = self.locales[i].name[..name_len as usize].to_vec();
            let mut name_idxs = self.idxs[..name_len as usize].to_vec();
            let name_score = calc(&mut q, &mut qi, query_len, &mut name, &mut name_idxs, name_len);

            self.buf[i] = tag_score.min(name_score);
        }

        Ok(&self.buf[..self.locales.len()])
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(harness: &mut Harness, offset: usize, s: &str) -> u8 {
        let units: Vec<u16> = s.encode_utf16().collect();
        let buf = harness.buf_mut();
        for (i, unit) in units.iter().enumerate() {
            let bytes = unit.to_le_bytes();
            buf[offset + 2 * i] = bytes[0];
            buf[offset + 2 * i + 1] = bytes[1];
        }
        units.len() as u8
    }

    fn load(harness: &mut Harness, tag: &str, name: &str) {
        let tag_len = pack(harness, 0, tag);
        let name_len = pack(harness, tag.encode_utf16().count() * 2, name);
        harness.load_locale(tag_len, name_len).unwrap();
    }

    fn query(harness: &mut Harness, q: &str) -> Vec<u8> {
        let len = pack(harness, 0, q);
        harness.run_query(len).unwrap().to_vec()
    }

    #[test]
    fn reset_clears_loaded_locales() {
        let mut h = Harness::new();
        load(&mut h, "en-US", "English (United States)");
        h.reset();
        let scores = query(&mut h, "en-US");
        assert!(scores.is_empty());
    }

    #[test]
    fn exact_tag_match_scores_zero() {
        let mut h = Harness::new();
        load(&mut h, "en-US", "English (United States)");
        let scores = query(&mut h, "en-US");
        assert_eq!(scores, vec![0]);
    }

    #[test]
    fn script_subtag_injection_separates_related_locales() {
        let mut h = Harness::new();
        load(&mut h, "az-AZ", "Azerbaijani (Azerbaijan)");
        load(&mut h, "az-Cyrl-AZ", "Azerbaijani (Cyrillic, Azerbaijan)");

        let scores = query(&mut h, "az-Cyrl-AZ");
        // The locale that actually carries a script subtag should score a
        // strictly lower (closer) distance than the one that had a
        // synthetic subtag spliced in.
        assert!(scores[1] < scores[0]);
    }

    #[test]
    fn too_many_locales_is_rejected() {
        let mut h = Harness::new();
        for _ in 0..MAX_LOCALES {
            load(&mut h, "en", "English");
        }
        let tag_len = pack(&mut h, 0, "en");
        let name_len = pack(&mut h, 4, "English");
        assert_eq!(h.load_locale(tag_len, name_len), Err(HarnessError::TooManyLocales));
    }

    #[test]
    fn oversized_query_is_rejected() {
        let mut h = Harness::new();
        assert_eq!(
            h.run_query((MAX_CODE_UNITS + 1) as u8),
            Err(HarnessError::QueryTooLong { len: (MAX_CODE_UNITS + 1) as u8, max: MAX_CODE_UNITS as u8 })
        );
    }
}
