//! Main diff engine that orchestrates the diff process

use std::time::Instant;

use crate::affix::{common_prefix, common_suffix};
use crate::chars::{exceeds_char_count, CountedStr, IndexedStr};
use crate::config::{DiffConfig, DEFAULT_TIMEOUT};
use crate::halfmatch::find_half_match;
use crate::lines::{chars_to_lines, lines_to_chars};
use crate::ops::{Edit, EditScript, Op};

/// The main diff engine.
///
/// Owns the deadline and the scratch buffer shared by every recursive
/// bisection of a single `diff` call. Reusable across calls; each call
/// starts a fresh script and deadline.
pub struct DiffEngine {
    config: DiffConfig,
    pub(crate) deadline: Option<Instant>,
    pub(crate) script: EditScript,
    pub(crate) bisect_v: Vec<isize>,
}

impl DiffEngine {
    /// Create a new diff engine with the given configuration.
    pub fn new(config: DiffConfig) -> Self {
        Self {
            config,
            deadline: None,
            script: EditScript::new(),
            bisect_v: Vec::new(),
        }
    }

    /// Find the differences between two texts.
    ///
    /// The resulting script is canonical (`cleanup_merge` has run): apply
    /// its equalities and deletions to reproduce `text1`, its equalities
    /// and insertions to reproduce `text2`.
    pub fn diff(&mut self, text1: &str, text2: &str) -> EditScript {
        self.deadline = self.config.timeout.map(|t| {
            let t = if t.is_zero() { DEFAULT_TIMEOUT } else { t };
            Instant::now() + t
        });
        self.script = EditScript::new();
        self.diff_inner(text1, text2, self.config.check_lines);
        let mut script = std::mem::take(&mut self.script);
        script.cleanup_merge();
        script
    }

    /// Find the differences between two texts. Simplifies the problem by
    /// stripping any common prefix or suffix off the texts before diffing.
    pub(crate) fn diff_inner(&mut self, text1: &str, text2: &str, check_lines: bool) {
        if text1 == text2 {
            if !text1.is_empty() {
                self.script.push(Edit::equal(text1));
            }
            return;
        }

        // Trim off common prefix (speedup).
        let prefix_len = common_prefix(text1, text2);
        let (prefix, text1) = text1.split_at(prefix_len);
        let text2 = &text2[prefix_len..];

        // Trim off common suffix (speedup).
        let suffix_len = common_suffix(text1, text2);
        let (text1, suffix) = text1.split_at(text1.len() - suffix_len);
        let text2 = &text2[..text2.len() - suffix_len];

        // Restore the prefix, compute the middle block, restore the suffix.
        if !prefix.is_empty() {
            self.script.push(Edit::equal(prefix));
        }
        self.compute(CountedStr::new(text1), CountedStr::new(text2), check_lines);
        if !suffix.is_empty() {
            self.script.push(Edit::equal(suffix));
        }
    }

    /// Find the differences between two texts. Assumes the texts share no
    /// common prefix or suffix.
    fn compute(&mut self, text1: CountedStr<'_>, text2: CountedStr<'_>, check_lines: bool) {
        if text1.is_empty() {
            // Just add some text (speedup).
            self.script.push(Edit::insert(text2.as_str()));
            return;
        }
        if text2.is_empty() {
            // Just delete some text (speedup).
            self.script.push(Edit::delete(text1.as_str()));
            return;
        }

        let (long, short, op) = if text1.count() > text2.count() {
            (text1.as_str(), text2.as_str(), Op::Delete)
        } else {
            (text2.as_str(), text1.as_str(), Op::Insert)
        };
        if let Some(i) = long.find(short) {
            // Shorter text is inside the longer text (speedup).
            self.script.push(Edit::new(op, &long[..i]));
            self.script.push(Edit::equal(short));
            self.script.push(Edit::new(op, &long[i + short.len()..]));
            return;
        }

        if !exceeds_char_count(short, 1) {
            // After the previous speedup, the character can't be an equality.
            self.script.push(Edit::delete(text1.as_str()));
            self.script.push(Edit::insert(text2.as_str()));
            return;
        }

        // Check to see if the problem can be split in two.
        if let Some(hm) = find_half_match(text1, text2, self.deadline.is_none()) {
            // Send both pairs off for separate processing and merge the
            // results around the common middle.
            self.diff_inner(hm.prefix1, hm.prefix2, check_lines);
            self.script.push(Edit::equal(hm.common));
            self.diff_inner(hm.suffix1, hm.suffix2, check_lines);
            return;
        }

        if check_lines && text1.count() > 100 && text2.count() > 100 {
            self.diff_line_mode(text1.as_str(), text2.as_str());
        } else {
            self.bisect(
                &IndexedStr::new(text1.as_str()),
                &IndexedStr::new(text2.as_str()),
            );
        }
    }

    fn diff_line_mode(&mut self, text1: &str, text2: &str) {
        // Scan the text on a line-by-line basis first.
        let scan = lines_to_chars(text1, text2);

        let outer = std::mem::take(&mut self.script);
        self.diff_inner(&scan.chars1, &scan.chars2, false);
        let mut line_script = std::mem::replace(&mut self.script, outer);

        // Convert the diff back to original text.
        chars_to_lines(&mut line_script, &scan.lines);
        // Eliminate freak matches (e.g. blank lines).
        line_script.cleanup_semantic();

        // Rediff any replacement blocks, this time character-by-character.
        line_script.push(Edit::equal(""));
        let mut text_del = String::new();
        let mut text_ins = String::new();
        let n = line_script.len();
        for (i, edit) in line_script.into_iter().enumerate() {
            match edit.op {
                Op::Insert => text_ins.push_str(&edit.text),
                Op::Delete => text_del.push_str(&edit.text),
                Op::Equal => {
                    // Upon reaching an equality, check for prior redundancies.
                    if !text_del.is_empty() && !text_ins.is_empty() {
                        self.diff_inner(&text_del, &text_ins, false);
                    } else if !text_del.is_empty() {
                        self.script.push(Edit::delete(text_del.as_str()));
                    } else if !text_ins.is_empty() {
                        self.script.push(Edit::insert(text_ins.as_str()));
                    }
                    if i + 1 != n {
                        self.script.push(Edit::new(Op::Equal, edit.text));
                    }
                    text_del.clear();
                    text_ins.clear();
                }
                Op::DeleteInsert => {}
            }
        }
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(DiffConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_main;
    use crate::ops::tests::script;
    use std::time::Duration;

    fn run_cases(timeout: Option<Duration>, cases: &[(&str, &str, &str, &str)]) {
        for &(name, text1, text2, want) in cases {
            assert_eq!(
                diff_main(text1, text2, false, timeout),
                script(want),
                "{name}"
            );
        }
    }

    #[test]
    fn test_trivial_diffs() {
        run_cases(
            Some(Duration::from_secs(1)),
            &[
                ("Null case", "", "", ""),
                ("Equality", "abc", "abc", "=<abc>"),
                ("Simple insertion", "abc", "ab123c", "=<ab> +<123> =<c>"),
                ("Simple deletion", "a123bc", "abc", "=<a> -<123> =<bc>"),
                ("Two insertions", "abc", "a123b456c", "=<a> +<123> =<b> +<456> =<c>"),
                ("Two deletions", "a123b456c", "abc", "=<a> -<123> =<b> -<456> =<c>"),
            ],
        );
    }

    #[test]
    fn test_real_diffs() {
        // The default deadline never expires on inputs this small, but its
        // presence keeps the half-match heuristic in play.
        run_cases(
            Some(Duration::ZERO),
            &[
                ("Simple case #1", "a", "b", "-<a> +<b>"),
                (
                    "Simple case #2",
                    "Apples are ä fruit.",
                    "Bananas are älso fruit.",
                    "-<Apple> +<Banana> =<s are ä> +<lso> =< fruit.>",
                ),
                (
                    "Simple case #3",
                    "ax\t",
                    "\u{0680}x\u{0000}",
                    "-<a> +<\u{0680}> =<x> -<\t> +<\u{0000}>",
                ),
                ("Overlap #1", "1ayb2", "abxab", "-<1> =<a> -<y> =<b> -<2> +<xab>"),
                ("Overlap #2", "abcy", "xaxcxabc", "+<xaxcx> =<abc> -<y>"),
                (
                    "Overlap #3",
                    "ABCDa=bcd=efghijklmnopqrsEFGHIJKLMNOefg",
                    "a-bcd-efghijklmnopqrs",
                    "-<ABCD> =<a> -<=> +<-> =<bcd> -<=> +<-> =<efghijklmnopqrs> -<EFGHIJKLMNOefg>",
                ),
                (
                    "Large equality",
                    "a [[Pennsylvania]] and [[New",
                    " and [[Pennsylvania]]",
                    "+< > =<a> +<nd> =< [[Pennsylvania]]> -< and [[New>",
                ),
            ],
        );
    }

    #[test]
    fn test_timeout_window() {
        let mut a = String::from(
            "`Twas brillig, and the slithy toves\nDid gyre and gimble in the wabe:\n\
             All mimsy were the borogoves,\nAnd the mome raths outgrabe.\n",
        );
        let mut b = String::from(
            "I am the very model of a modern major general,\n\
             I've information vegetable, animal, and mineral,\n\
             I know the kings of England, and I quote the fights historical,\n\
             From Marathon to Waterloo, in order categorical.\n",
        );
        // Double the text lengths until a timeout is guaranteed.
        for _ in 0..10 {
            a = format!("{a}{a}");
            b = format!("{b}{b}");
        }

        let timeout = Duration::from_millis(100);
        let start = Instant::now();
        diff_main(&a, &b, false, Some(timeout));
        let elapsed = start.elapsed();

        // At least the whole timeout period must have been used.
        assert!(elapsed >= timeout, "returned early: {elapsed:?}");
        // And not substantially more (be forgiving: the OS may schedule
        // away at the wrong moment).
        assert!(elapsed < timeout * 2, "overshot the deadline: {elapsed:?}");
    }

    #[test]
    fn test_simple_line_mode() {
        let a = "1234567890\n".repeat(13);
        let b = "abcdefghij\n".repeat(13);
        assert_eq!(
            diff_main(&a, &b, true, Some(Duration::ZERO)),
            diff_main(&a, &b, false, Some(Duration::ZERO))
        );
    }

    #[test]
    fn test_single_line_mode() {
        let a = "1234567890".repeat(13);
        let b = "abcdefghij".repeat(13);
        assert_eq!(
            diff_main(&a, &b, true, Some(Duration::ZERO)),
            diff_main(&a, &b, false, Some(Duration::ZERO))
        );
    }

    #[test]
    fn test_engine_is_reusable() {
        let mut engine = DiffEngine::new(DiffConfig::thorough());
        assert_eq!(engine.diff("abc", "ab123c"), script("=<ab> +<123> =<c>"));
        assert_eq!(engine.diff("a123bc", "abc"), script("=<a> -<123> =<bc>"));
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use crate::ops::Op;

        proptest! {
            /// Equalities plus deletions reproduce text1; equalities plus
            /// insertions reproduce text2.
            #[test]
            fn reconstruction(text1 in "\\PC{0,40}", text2 in "\\PC{0,40}") {
                let script = diff_main(&text1, &text2, false, None);
                prop_assert_eq!(script.text1(), text1);
                prop_assert_eq!(script.text2(), text2);
            }

            /// The canonical form holds after the driver's final merge.
            #[test]
            fn canonical_form(text1 in "\\PC{0,40}", text2 in "\\PC{0,40}") {
                let script = diff_main(&text1, &text2, false, None);
                for e in script.iter() {
                    prop_assert!(!e.text.is_empty());
                    prop_assert!(e.op != Op::DeleteInsert);
                }
                for pair in script.as_slice().windows(2) {
                    prop_assert!(pair[0].op != pair[1].op);
                }
            }

            /// Identical inputs collapse to a single equality.
            #[test]
            fn self_diff_is_one_equality(text in "\\PC{0,40}") {
                let script = diff_main(&text, &text, false, None);
                if text.is_empty() {
                    prop_assert!(script.is_empty());
                } else {
                    prop_assert_eq!(script.len(), 1);
                    prop_assert_eq!(&script.as_slice()[0].op, &Op::Equal);
                }
            }

            /// Multi-byte inputs survive the whole pipeline.
            #[test]
            fn reconstruction_multibyte(
                text1 in "[aäö𐍈\\n]{0,24}",
                text2 in "[aäö𐍈\\n]{0,24}",
            ) {
                let script = diff_main(&text1, &text2, false, None);
                prop_assert_eq!(script.text1(), text1);
                prop_assert_eq!(script.text2(), text2);
            }
        }
    }
}
