//! Myers bisection
//!
//! Bidirectional O(ND) search for the 'middle snake' of a diff. The forward
//! and reverse frontiers advance one depth step at a time; where they meet,
//! the problem splits in two and each half recurses through the driver.
//! See Myers 1986: An O(ND) Difference Algorithm and Its Variations.

use std::time::Instant;

use crate::chars::IndexedStr;
use crate::engine::DiffEngine;
use crate::ops::Edit;

impl DiffEngine {
    /// Find the middle snake of a diff, split the problem in two and
    /// recurse. Appends the constructed diff to the engine's script.
    ///
    /// Falls back to a plain `Delete(text1) · Insert(text2)` pair when the
    /// deadline expires or the texts share no characters at all.
    pub(crate) fn bisect(&mut self, text1: &IndexedStr<'_>, text2: &IndexedStr<'_>) {
        // Cache the text lengths to prevent multiple calls.
        let text1_len = text1.count() as isize;
        let text2_len = text2.count() as isize;
        let max_d = (text1_len + text2_len + 1) / 2;
        let v_off = max_d;
        let v_len = (2 * max_d) as usize;

        // One scratch allocation serves every bisect under a driver call;
        // it only ever grows.
        if self.bisect_v.len() < v_len * 2 {
            self.bisect_v.resize(v_len * 2, 0);
        }
        let deadline = self.deadline;
        let (v1, rest) = self.bisect_v.split_at_mut(v_len);
        let v2 = &mut rest[..v_len];
        // -1 marks a diagonal not reached yet.
        v1.fill(-1);
        v2.fill(-1);
        v1[(v_off + 1) as usize] = 0;
        v2[(v_off + 1) as usize] = 0;

        let delta = text1_len - text2_len;
        // If the total number of characters is odd, the front path will
        // collide with the reverse path.
        let front = delta % 2 != 0;

        // Offsets for the start and end of the k loops; widened whenever a
        // diagonal runs off the edge of the grid.
        let mut k1_start = 0isize;
        let mut k1_end = 0isize;
        let mut k2_start = 0isize;
        let mut k2_end = 0isize;

        let mut split = None;

        'search: for d in 0..max_d {
            if let Some(deadline) = deadline {
                if Instant::now() > deadline {
                    break;
                }
            }

            // Walk the front path one step.
            let mut k1 = -d + k1_start;
            while k1 <= d - k1_end {
                let k1_off = v_off + k1;
                let mut x1 = if k1 == -d
                    || (k1 != d && v1[(k1_off - 1) as usize] < v1[(k1_off + 1) as usize])
                {
                    v1[(k1_off + 1) as usize]
                } else {
                    v1[(k1_off - 1) as usize] + 1
                };
                let mut y1 = x1 - k1;
                while x1 < text1_len
                    && y1 < text2_len
                    && text1.at(x1 as usize) == text2.at(y1 as usize)
                {
                    x1 += 1;
                    y1 += 1;
                }
                v1[k1_off as usize] = x1;

                if x1 > text1_len {
                    // Ran off the right of the graph.
                    k1_end += 2;
                } else if y1 > text2_len {
                    // Ran off the bottom of the graph.
                    k1_start += 2;
                } else if front {
                    let k2_off = v_off + delta - k1;
                    if k2_off >= 0 && k2_off < v_len as isize && v2[k2_off as usize] != -1 {
                        // Mirror x2 onto the top-left coordinate system.
                        let x2 = text1_len - v2[k2_off as usize];
                        if x1 >= x2 {
                            // Overlap detected.
                            split = Some((x1 as usize, y1 as usize));
                            break 'search;
                        }
                    }
                }
                k1 += 2;
            }

            // Walk the reverse path one step.
            let mut k2 = -d + k2_start;
            while k2 <= d - k2_end {
                let k2_off = v_off + k2;
                let mut x2 = if k2 == -d
                    || (k2 != d && v2[(k2_off - 1) as usize] < v2[(k2_off + 1) as usize])
                {
                    v2[(k2_off + 1) as usize]
                } else {
                    v2[(k2_off - 1) as usize] + 1
                };
                let mut y2 = x2 - k2;
                while x2 < text1_len
                    && y2 < text2_len
                    && text1.at((text1_len - x2 - 1) as usize)
                        == text2.at((text2_len - y2 - 1) as usize)
                {
                    x2 += 1;
                    y2 += 1;
                }
                v2[k2_off as usize] = x2;

                if x2 > text1_len {
                    // Ran off the left of the graph.
                    k2_end += 2;
                } else if y2 > text2_len {
                    // Ran off the top of the graph.
                    k2_start += 2;
                } else if !front {
                    let k1_off = v_off + delta - k2;
                    if k1_off >= 0 && k1_off < v_len as isize && v1[k1_off as usize] != -1 {
                        let x1 = v1[k1_off as usize];
                        let y1 = v_off + x1 - k1_off;
                        // Mirror x2 onto the top-left coordinate system.
                        let x2 = text1_len - x2;
                        if x1 >= x2 {
                            // Overlap detected.
                            split = Some((x1 as usize, y1 as usize));
                            break 'search;
                        }
                    }
                }
                k2 += 2;
            }
        }

        match split {
            Some((x, y)) => self.bisect_split(text1, text2, x, y),
            None => {
                // The diff hit the deadline, or the number of edits equals
                // the number of characters: no commonality at all.
                self.script.push(Edit::delete(text1.as_str()));
                self.script.push(Edit::insert(text2.as_str()));
            }
        }
    }

    /// Given the location of the middle snake, split the diff in two parts
    /// and recurse. `x` and `y` are code-point indices of the split point
    /// in `text1` and `text2`.
    fn bisect_split(&mut self, text1: &IndexedStr<'_>, text2: &IndexedStr<'_>, x: usize, y: usize) {
        let s1 = text1.as_str();
        let s2 = text2.as_str();
        let i1 = text1.byte_pos(x);
        let i2 = text2.byte_pos(y);

        // Compute both diffs serially.
        self.diff_inner(&s1[..i1], &s2[..i2], false);
        self.diff_inner(&s1[i1..], &s2[i2..], false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiffConfig;
    use crate::ops::tests::script;
    use std::time::Duration;

    #[test]
    fn test_bisect_normal() {
        let a = IndexedStr::new("cat");
        let b = IndexedStr::new("map");
        // Since the resulting diff hasn't been normalized, it would be ok
        // if the insertion and deletion pairs were swapped. If the order
        // changes, tweak this test as required.
        let mut engine = DiffEngine::new(DiffConfig::thorough());
        engine.bisect(&a, &b);
        assert_eq!(engine.script, script("-<c> +<m> =<a> -<t> +<p>"));
    }

    #[test]
    fn test_bisect_timeout() {
        let a = IndexedStr::new("cat");
        let b = IndexedStr::new("map");
        let mut engine = DiffEngine::new(DiffConfig::default());
        // A deadline already in the past degrades to a single replacement.
        engine.deadline = Some(
            Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        );
        engine.bisect(&a, &b);
        assert_eq!(engine.script, script("-<cat> +<map>"));
    }

    #[test]
    fn test_bisect_multibyte() {
        let a = IndexedStr::new("ävß");
        let b = IndexedStr::new("ävπ");
        let mut engine = DiffEngine::new(DiffConfig::thorough());
        engine.bisect(&a, &b);
        assert_eq!(engine.script.text1(), "ävß");
        assert_eq!(engine.script.text2(), "ävπ");
    }
}
