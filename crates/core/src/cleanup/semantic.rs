//! Semantic cleanup: favor human-meaningful edit boundaries.

use std::sync::LazyLock;

use regex::Regex;

use crate::affix::{common_overlap, common_suffix};
use crate::chars::char_count;
use crate::ops::{Edit, EditScript, Op};

static BLANK_LINE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\n\r?\n(\z|\r?\n\z)").unwrap());
static BLANK_LINE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A\r?\n\r?\n").unwrap());

impl EditScript {
    /// Reduce the number of edits by eliminating semantically trivial
    /// equalities.
    pub fn cleanup_semantic(&mut self) {
        if self.0.is_empty() {
            return;
        }
        if self.shrink_small_equalities() {
            // Normalize the DeleteInsert marks into real pairs.
            self.cleanup_merge();
        }
        self.cleanup_semantic_lossless();
        self.extract_overlaps();
    }

    /// Eliminate equalities that are smaller than or equal to the edits on
    /// both sides of them, reclassifying each as `DeleteInsert`. Returns
    /// whether anything changed.
    fn shrink_small_equalities(&mut self) -> bool {
        fn prev_equality(diffs: &[Edit], mut i: isize) -> isize {
            loop {
                i -= 1;
                if i < 0 || diffs[i as usize].op == Op::Equal {
                    break;
                }
            }
            i
        }

        let diffs = &mut self.0;
        let mut changes = false;
        let mut len_last_equality = 0usize;
        let mut i_last: isize = -1;
        // Bytes that changed prior to the candidate equality.
        let (mut len_ins1, mut len_del1) = (0usize, 0usize);
        // Bytes that changed after it.
        let (mut len_ins2, mut len_del2) = (0usize, 0usize);

        let mut i: isize = 0;
        while i < diffs.len() as isize {
            let d = &diffs[i as usize];
            if d.op == Op::Equal {
                len_ins1 = len_ins2;
                len_del1 = len_del2;
                len_ins2 = 0;
                len_del2 = 0;
                len_last_equality = d.text.len();
                i_last = i;
            } else {
                match d.op {
                    Op::Insert => len_ins2 += d.text.len(),
                    Op::Delete => len_del2 += d.text.len(),
                    Op::DeleteInsert => {
                        len_ins2 += d.text.len();
                        len_del2 += d.text.len();
                    }
                    Op::Equal => unreachable!(),
                }

                if i_last != -1
                    && len_last_equality <= len_ins1.max(len_del1)
                    && len_last_equality <= len_ins2.max(len_del2)
                {
                    // Walk back to the offending equality and replace it
                    // with a delete plus a corresponding insert.
                    i = prev_equality(diffs, i);
                    diffs[i as usize].op = Op::DeleteInsert;

                    i_last = -1;
                    i = prev_equality(diffs, i);
                    if i != -1 && diffs[i as usize].op == Op::Equal {
                        // That one needs to be reevaluated as well.
                        i = prev_equality(diffs, i);
                    }

                    // Reset the counters.
                    len_ins1 = 0;
                    len_ins2 = 0;
                    len_del1 = 0;
                    len_del2 = 0;
                    changes = true;
                }
            }
            i += 1;
        }
        changes
    }

    /// Look for single edits surrounded on both sides by equalities which
    /// can be shifted sideways to align the edit to a word boundary.
    ///
    /// e.g.: `The c<ins>at c</ins>ame.` -> `The <ins>cat </ins>came.`
    pub fn cleanup_semantic_lossless(&mut self) {
        let mut old = std::mem::take(&mut self.0);
        let n = old.len();
        if n == 0 {
            return;
        }

        let mut out: Vec<Edit> = Vec::with_capacity(n);
        out.push(old[0].clone());
        let mut i = 1;
        while i < n {
            if i + 1 >= n {
                out.push(old[i].clone());
                break;
            }
            let prev_is_eq = out.last().is_some_and(|p| p.op == Op::Equal);
            if !prev_is_eq || old[i + 1].op != Op::Equal {
                out.push(old[i].clone());
                i += 1;
                continue;
            }

            // This is a single edit surrounded by equalities.
            let mut fit = Fit {
                equality1: out.last().map(|p| p.text.clone()).unwrap_or_default(),
                edit: old[i].text.clone(),
                equality2: old[i + 1].text.clone(),
                score: 0,
            };
            fit.shift_left();
            let best = fit.shift_right();

            let mut d = old[i].clone();
            let mut skip_next = false;
            if out.last().map(|p| p.text.as_str()) != Some(best.equality1.as_str()) {
                // An improvement: save it back to the script.
                if best.equality1.is_empty() {
                    out.pop();
                } else if let Some(prev) = out.last_mut() {
                    prev.text = best.equality1;
                }
                d.text = best.edit;
                if best.equality2.is_empty() {
                    skip_next = true;
                } else {
                    old[i + 1].text = best.equality2;
                }
            }
            out.push(d);
            i += if skip_next { 2 } else { 1 };
        }
        self.0 = out;
    }

    /// Find overlaps between deletions and insertions, e.g.
    /// `<del>abcxxx</del><ins>xxxdef</ins>` -> `<del>abc</del>xxx<ins>def</ins>`
    /// and `<del>xxxabc</del><ins>defxxx</ins>` -> `<ins>def</ins>xxx<del>abc</del>`.
    /// An overlap is only extracted when it is as big as the edit ahead of
    /// or behind it.
    fn extract_overlaps(&mut self) {
        let old = std::mem::take(&mut self.0);
        let mut out: Vec<Edit> = Vec::with_capacity(old.len());
        for edit in old {
            if edit.op == Op::Insert && out.last().is_some_and(|p| p.op == Op::Delete) {
                let deletion = out.last().map(|p| p.text.clone()).unwrap_or_default();
                let insertion = edit.text;
                let overlap1 = common_overlap(&deletion, &insertion);
                let overlap2 = common_overlap(&insertion, &deletion);

                // Byte-length overlaps measured against code-point counts;
                // both measures matter and stay separate.
                if overlap1 >= overlap2 {
                    if 2 * overlap1 >= char_count(&deletion)
                        || 2 * overlap1 >= char_count(&insertion)
                    {
                        // Insert an equality and trim the surrounding edits.
                        out.pop();
                        out.push(Edit::delete(&deletion[..deletion.len() - overlap1]));
                        out.push(Edit::equal(&insertion[..overlap1]));
                        out.push(Edit::insert(&insertion[overlap1..]));
                        continue;
                    }
                } else if 2 * overlap2 >= char_count(&deletion)
                    || 2 * overlap2 >= char_count(&insertion)
                {
                    // Reverse overlap: insert an equality and swap and trim
                    // the surrounding edits.
                    out.pop();
                    out.push(Edit::insert(&insertion[..insertion.len() - overlap2]));
                    out.push(Edit::equal(&deletion[..overlap2]));
                    out.push(Edit::delete(&deletion[overlap2..]));
                    continue;
                }
                out.push(Edit::insert(insertion));
            } else {
                out.push(edit);
            }
        }
        self.0 = out;
    }
}

/// An `equality1 · edit · equality2` window being slid across candidate
/// boundaries.
#[derive(Clone)]
struct Fit {
    equality1: String,
    edit: String,
    equality2: String,
    score: i32,
}

impl Fit {
    fn calc_score(&mut self) -> i32 {
        self.score = semantic_score(&self.equality1, &self.edit)
            + semantic_score(&self.edit, &self.equality2);
        self.score
    }

    /// Shift the edit as far left as possible.
    fn shift_left(&mut self) {
        let cs = common_suffix(&self.equality1, &self.edit);
        if cs > 0 {
            let common = self.equality1[self.equality1.len() - cs..].to_string();
            self.equality1.truncate(self.equality1.len() - cs);
            self.edit.truncate(self.edit.len() - cs);
            self.edit.insert_str(0, &common);
            self.equality2.insert_str(0, &common);
        }
    }

    /// Step code point by code point to the right, looking for the best fit.
    fn shift_right(mut self) -> Fit {
        let mut best = self.clone();
        best.calc_score();
        self.score = best.score;
        loop {
            let (next_edit, next_eq) = match (self.edit.chars().next(), self.equality2.chars().next())
            {
                (Some(e), Some(q)) if e == q => (e, q),
                _ => break,
            };
            self.equality1.push(next_edit);
            self.edit.drain(..next_edit.len_utf8());
            self.edit.push(next_eq);
            self.equality2.drain(..next_eq.len_utf8());
            self.calc_score();

            // The >= encourages trailing rather than leading whitespace on
            // edits.
            if self.score >= best.score {
                best = self.clone();
            }
        }
        best
    }
}

/// Score how well the boundary between `one` and `two` falls on logical
/// boundaries, from 6 (best) down to 0 (worst).
fn semantic_score(one: &str, two: &str) -> i32 {
    if one.is_empty() || two.is_empty() {
        // Edges are the best.
        return 6;
    }

    // Ports of this scorer differ slightly in what counts as 'whitespace'
    // and friends; its purpose is largely cosmetic, so native character
    // classes win over strict conformity.
    let r1 = one.chars().next_back().unwrap();
    let r2 = two.chars().next().unwrap();
    let non_alpha_num1 = !r1.is_alphanumeric();
    let non_alpha_num2 = !r2.is_alphanumeric();
    let space1 = non_alpha_num1 && r1.is_whitespace();
    let space2 = non_alpha_num2 && r2.is_whitespace();
    let line_break1 = space1 && r1.is_control();
    let line_break2 = space2 && r2.is_control();
    let blank_line1 = line_break1 && BLANK_LINE_END.is_match(one);
    let blank_line2 = line_break2 && BLANK_LINE_START.is_match(two);

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alpha_num1 && !space1 && space2 {
        // End of sentences.
        3
    } else if space1 || space2 {
        2
    } else if non_alpha_num1 || non_alpha_num2 {
        1
    } else {
        0
    }
}
