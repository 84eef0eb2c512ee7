//! Efficiency cleanup: trade small equalities for fewer edit operations.

use crate::chars::exceeds_char_count;
use crate::config::DEFAULT_EDIT_COST;
use crate::ops::{Edit, EditScript, Op};

/// Does `text` hold fewer than `limit` code points?
fn shorter_than(text: &str, limit: usize) -> bool {
    limit > 0 && !exceeds_char_count(text, limit - 1)
}

impl EditScript {
    /// Reduce the number of edits by eliminating operationally trivial
    /// equalities.
    ///
    /// An equality shorter than `edit_cost` code points is sacrificed when
    /// enough distinct edit operations surround it; an `edit_cost` of 0
    /// selects [`DEFAULT_EDIT_COST`].
    pub fn cleanup_efficiency(&mut self, edit_cost: usize) {
        fn prev_equality(diffs: &[Edit], mut i: isize, i_safe: isize) -> isize {
            loop {
                i -= 1;
                if i == i_safe || diffs[i as usize].op == Op::Equal {
                    break;
                }
            }
            i
        }

        if self.0.is_empty() {
            return;
        }
        let edit_cost = if edit_cost == 0 {
            DEFAULT_EDIT_COST
        } else {
            edit_cost
        };

        let diffs = &mut self.0;
        let mut changes = false;
        // Which operations appear before and after the candidate equality?
        let (mut pre_ins, mut pre_del) = (false, false);
        let (mut post_ins, mut post_del) = (false, false);
        // Index of the candidate equality.
        let mut i_last: isize = -1;
        // Index of the last edit known to be unsplittable.
        let mut i_safe: isize = -1;

        let mut i: isize = 0;
        while i < diffs.len() as isize {
            let d = &diffs[i as usize];
            if d.op == Op::Equal {
                if shorter_than(&d.text, edit_cost) && (post_ins || post_del) {
                    // Candidate found.
                    pre_ins = post_ins;
                    pre_del = post_del;
                    i_last = i;
                } else {
                    // Not a candidate, and can never become one.
                    i_last = -1;
                    i_safe = i;
                }
                post_ins = false;
                post_del = false;
            } else {
                match d.op {
                    Op::Delete => post_del = true,
                    Op::Insert => post_ins = true,
                    Op::DeleteInsert => {
                        post_del = true;
                        post_ins = true;
                    }
                    Op::Equal => unreachable!(),
                }

                // Five types to be split:
                // <ins>A</ins><del>B</del>XY<ins>C</ins><del>D</del>
                // <ins>A</ins>X<ins>C</ins><del>D</del>
                // <ins>A</ins><del>B</del>X<ins>C</ins>
                // <del>A</del>X<ins>C</ins><del>D</del>
                // <ins>A</ins><del>B</del>X<del>C</del>
                let surrounded = pre_ins && pre_del && post_ins && post_del;
                let three_of_four = pre_ins as usize
                    + pre_del as usize
                    + post_ins as usize
                    + post_del as usize
                    == 3;
                if i_last != -1
                    && (surrounded
                        || (shorter_than(&diffs[i_last as usize].text, edit_cost / 2)
                            && three_of_four))
                {
                    // Walk back to the offending equality and replace it
                    // with a temporary DeleteInsert that cleanup_merge will
                    // resolve.
                    i = prev_equality(diffs, i, i_safe);
                    diffs[i as usize].op = Op::DeleteInsert;
                    i_last = -1;
                    if pre_ins && pre_del {
                        // No changes were made that could affect previous
                        // entries; keep going.
                        post_ins = true;
                        post_del = true;
                        i_safe = i - 1;
                    } else {
                        i = prev_equality(diffs, i, i_safe);
                        if i != -1 && diffs[i as usize].op == Op::Equal {
                            // Needs to be reevaluated.
                            if i != i_safe {
                                i = prev_equality(diffs, i, i_safe);
                            }
                        }
                        post_ins = false;
                        post_del = false;
                    }
                    changes = true;
                }
            }
            i += 1;
        }

        if changes {
            self.cleanup_merge();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::tests::script;
    use crate::ops::EditScript;

    fn efficient(edit_cost: usize, desc: &str) -> EditScript {
        let mut s = script(desc);
        s.cleanup_efficiency(edit_cost);
        s
    }

    #[test]
    fn test_cleanup_efficiency() {
        for (name, edit_cost, input, result) in [
            ("Null case", 4, "", ""),
            (
                "No elimination",
                4,
                "-<ab> +<12> =<wxyz> -<cd> +<34>",
                "-<ab> +<12> =<wxyz> -<cd> +<34>",
            ),
            (
                "Four-edit elimination",
                4,
                "-<ab> +<12> =<xyz> -<cd> +<34>",
                "-<abxyzcd> +<12xyz34>",
            ),
            (
                "Three-edit elimination",
                4,
                "+<12> =<x> -<cd> +<34>",
                "-<xcd> +<12x34>",
            ),
            (
                "Backpass elimination",
                4,
                "-<ab> +<12> =<xy> +<34> =<z> -<cd> +<56>",
                "-<abxyzcd> +<12xy34z56>",
            ),
            (
                "Double backpass elimination",
                4,
                "+<ab> -<cd> =<12> -<ef> =<3> -<gh> =<4> -<xy> +<zz>",
                "-<cd12ef3gh4xy> +<ab1234zz>",
            ),
            (
                "Safe backpass elimination",
                4,
                "+<a> -<b> =<1> +<c> =<22> -<d> =<3> -<e> +<f>",
                "-<b122d3e> +<a1c223f>",
            ),
            (
                "High cost elimination",
                5,
                "-<ab> +<12> =<wxyz> -<cd> +<34>",
                "-<abwxyzcd> +<12wxyz34>",
            ),
        ] {
            assert_eq!(efficient(edit_cost, input), script(result), "{name}");
        }
    }

    #[test]
    fn test_cleanup_efficiency_zero_selects_default() {
        assert_eq!(
            efficient(0, "-<ab> +<12> =<xyz> -<cd> +<34>"),
            script("-<abxyzcd> +<12xyz34>")
        );
        assert_eq!(
            efficient(0, "-<ab> +<12> =<wxyz> -<cd> +<34>"),
            script("-<ab> +<12> =<wxyz> -<cd> +<34>")
        );
    }

    #[test]
    fn test_cleanup_efficiency_is_idempotent() {
        for desc in [
            "-<ab> +<12> =<xyz> -<cd> +<34>",
            "+<12> =<x> -<cd> +<34>",
            "-<ab> +<12> =<wxyz> -<cd> +<34>",
        ] {
            let once = efficient(4, desc);
            let mut twice = once.clone();
            twice.cleanup_efficiency(4);
            assert_eq!(once, twice, "{desc}");
        }
    }
}
