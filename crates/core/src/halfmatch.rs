//! Half-match speedup
//!
//! If the two texts share a substring at least half the length of the
//! longer one, the diff problem can be split around it and the halves
//! solved independently. The search is heuristic and can produce
//! non-minimal diffs, so it only runs under time pressure.

use crate::affix::{common_prefix, common_suffix};
use crate::chars::{char_count, CountedStr};

/// A common middle with the four surrounding pieces. Concatenating
/// `prefix1 · common · suffix1` reproduces the first input and
/// `prefix2 · common · suffix2` the second; `common` spans at least half
/// the longer input in code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfMatch<'a> {
    pub prefix1: &'a str,
    pub suffix1: &'a str,
    pub prefix2: &'a str,
    pub suffix2: &'a str,
    pub common: &'a str,
}

/// Do the two texts share a substring at least half the length of the
/// longer text?
///
/// Returns `None` when no such substring exists, when the inputs are too
/// small for the heuristic to pay off, or when `unlimited_time` is set
/// (with no deadline there is no reason to risk a non-optimal diff).
pub fn find_half_match<'a>(
    text1: CountedStr<'a>,
    text2: CountedStr<'a>,
    unlimited_time: bool,
) -> Option<HalfMatch<'a>> {
    if unlimited_time {
        return None;
    }

    let (long, short) = if text1.count() > text2.count() {
        (text1, text2)
    } else {
        (text2, text1)
    };
    if long.count() < 4 || short.count() * 2 < long.count() {
        // Pointless.
        return None;
    }

    // First check if the second quarter is the seed for a half-match,
    // then check again based on the third quarter.
    let hm1 = half_match_around(long, short.as_str(), (long.count() + 3) / 4);
    let hm2 = half_match_around(long, short.as_str(), (long.count() + 1) / 2);
    let hm = match (hm1, hm2) {
        (None, None) => return None,
        (Some(hm), None) => hm,
        (None, Some(hm)) => hm,
        // Both matched: select the longest.
        (Some(a), Some(b)) => {
            if char_count(a.common) > char_count(b.common) {
                a
            } else {
                b
            }
        }
    };

    // The record fields always match the original argument order.
    if text1.count() <= text2.count() {
        Some(HalfMatch {
            prefix1: hm.prefix2,
            suffix1: hm.suffix2,
            prefix2: hm.prefix1,
            suffix2: hm.suffix1,
            common: hm.common,
        })
    } else {
        Some(hm)
    }
}

/// Does a substring of `short` exist within `long` such that the substring
/// is at least half the length of `long`? The search is seeded with the
/// quarter-length substring of `long` anchored at code point `i`.
fn half_match_around<'a>(
    long: CountedStr<'a>,
    short: &'a str,
    i: usize,
) -> Option<HalfMatch<'a>> {
    let (i0, i_end) = long.byte_indices(i, i + long.count() / 4);
    let long_s = long.as_str();
    let seed = &long_s[i0..i_end];

    let mut best: Option<HalfMatch<'a>> = None;
    let mut best_count = 0;
    let mut j = 0;
    while let Some(pos) = short[j..].find(seed) {
        let at = j + pos;
        let prefix_len = common_prefix(&long_s[i0..], &short[at..]);
        let suffix_len = common_suffix(&long_s[..i0], &short[..at]);
        // The extended suffix and prefix are adjacent in `long`, so the
        // common middle is one contiguous slice of it.
        let common = &long_s[i0 - suffix_len..i0 + prefix_len];
        let count = char_count(common);
        if best_count < count {
            best_count = count;
            best = Some(HalfMatch {
                prefix1: &long_s[..i0 - suffix_len],
                suffix1: &long_s[i0 + prefix_len..],
                prefix2: &short[..at - suffix_len],
                suffix2: &short[at + prefix_len..],
                common,
            });
        }
        // Step one code point past this occurrence so overlapping matches
        // are still found.
        j = at + short[at..].chars().next().map_or(1, char::len_utf8);
    }

    if best_count * 2 >= long.count() {
        best
    } else {
        None
    }
}
