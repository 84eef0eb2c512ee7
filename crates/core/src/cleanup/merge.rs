//! Merge cleanup: coalesce, factor, slide.

use crate::affix::{common_prefix, common_suffix};
use crate::ops::{Edit, EditScript, Op};

impl EditScript {
    /// Reorder and merge like edit sections; merge equalities. Any edit
    /// section can move as long as it doesn't cross an equality.
    ///
    /// Leaves the script in canonical form: no adjacent operations share a
    /// tag, no operation has empty text, and every `DeleteInsert` sentinel
    /// has been materialized into a real delete/insert pair.
    pub fn cleanup_merge(&mut self) {
        let mut edits = std::mem::take(&mut self.0);
        // Sentinel equality, so the trailing run of edits is flushed too.
        edits.push(Edit::equal(""));

        let mut out: Vec<Edit> = Vec::with_capacity(edits.len());
        let mut ins_buf = String::new();
        let mut del_buf = String::new();

        for edit in edits {
            match edit.op {
                Op::Insert => ins_buf.push_str(&edit.text),
                Op::Delete => del_buf.push_str(&edit.text),
                Op::DeleteInsert => {
                    ins_buf.push_str(&edit.text);
                    del_buf.push_str(&edit.text);
                }
                Op::Equal => {
                    let mut text = edit.text;
                    if !del_buf.is_empty() && !ins_buf.is_empty() {
                        // Factor out any common prefix.
                        let pfx = common_prefix(&ins_buf, &del_buf);
                        if pfx > 0 {
                            match out.last_mut() {
                                Some(prev) if prev.op == Op::Equal => {
                                    prev.text.push_str(&ins_buf[..pfx]);
                                }
                                Some(_) => panic!("previous edit should have been an equality"),
                                None => out.push(Edit::equal(&ins_buf[..pfx])),
                            }
                            ins_buf.drain(..pfx);
                            del_buf.drain(..pfx);
                        }
                        // Factor out any common suffix.
                        let sfx = common_suffix(&ins_buf, &del_buf);
                        if sfx > 0 {
                            text.insert_str(0, &ins_buf[ins_buf.len() - sfx..]);
                            ins_buf.truncate(ins_buf.len() - sfx);
                            del_buf.truncate(del_buf.len() - sfx);
                        }
                    }
                    // Insert the merged records.
                    if !del_buf.is_empty() {
                        out.push(Edit::delete(std::mem::take(&mut del_buf)));
                    }
                    if !ins_buf.is_empty() {
                        out.push(Edit::insert(std::mem::take(&mut ins_buf)));
                    }
                    match out.last_mut() {
                        Some(prev) if prev.op == Op::Equal => prev.text.push_str(&text),
                        _ => out.push(Edit::equal(text)),
                    }
                }
            }
        }
        // Drop the sentinel if it survived as a trailing empty equality.
        if out.last().is_some_and(|e| e.text.is_empty()) {
            out.pop();
        }

        // Second pass: look for single edits surrounded on both sides by
        // equalities which can be shifted sideways to eliminate an equality,
        // e.g.: A<ins>BA</ins>C -> <ins>AB</ins>AC
        let mut changes = false;
        if out.len() >= 3 {
            let mut removed = vec![false; out.len()];
            for i in 1..out.len() - 1 {
                let prev_is_eq = !removed[i - 1] && out[i - 1].op == Op::Equal;
                let next_is_eq = !removed[i + 1] && out[i + 1].op == Op::Equal;
                if !prev_is_eq || !next_is_eq {
                    continue;
                }
                // This is a single edit surrounded by equalities.
                if out[i].text.ends_with(&out[i - 1].text) {
                    // Shift the edit over the previous equality.
                    let prev_text = out[i - 1].text.clone();
                    let keep = out[i].text.len() - prev_text.len();
                    let shifted = format!("{}{}", prev_text, &out[i].text[..keep]);
                    out[i].text = shifted;
                    out[i + 1].text.insert_str(0, &prev_text);
                    removed[i - 1] = true;
                    changes = true;
                } else if out[i].text.starts_with(&out[i + 1].text) {
                    // Shift the edit over the next equality.
                    let next_text = out[i + 1].text.clone();
                    out[i - 1].text.push_str(&next_text);
                    let shifted = format!("{}{}", &out[i].text[next_text.len()..], next_text);
                    out[i].text = shifted;
                    removed[i + 1] = true;
                    changes = true;
                }
            }
            if changes {
                let mut idx = 0;
                out.retain(|_| {
                    let keep = !removed[idx];
                    idx += 1;
                    keep
                });
            }
        }
        self.0 = out;

        // If shifts were made, the script needs reordering and another
        // sweep, until a fixed point is reached.
        if changes {
            self.cleanup_merge();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::tests::script;

    fn merged(desc: &str) -> crate::ops::EditScript {
        let mut s = script(desc);
        s.cleanup_merge();
        s
    }

    #[test]
    fn test_cleanup_merge_null_case() {
        assert_eq!(merged(""), script(""));
    }

    #[test]
    fn test_cleanup_merge() {
        for (name, input, result) in [
            ("No change case", "=<a> -<b> +<c>", "=<a> -<b> +<c>"),
            ("Merge equalities", "=<a> =<b> =<c>", "=<abc>"),
            ("Merge deletions", "-<a> -<b> -<c>", "-<abc>"),
            ("Merge insertions", "+<a> +<b> +<c>", "+<abc>"),
            (
                "Merge interweave",
                "-<a> +<b> -<c> +<d> =<e> =<f>",
                "-<ac> +<bd> =<ef>",
            ),
            (
                "Prefix and suffix detection",
                "-<a> +<abc> -<dc>",
                "=<a> -<d> +<b> =<c>",
            ),
            (
                "Prefix and suffix detection with equalities",
                "=<x> -<a> +<abc> -<dc> =<y>",
                "=<xa> -<d> +<b> =<cy>",
            ),
            ("Slide edit left", "=<a> +<ba> =<c>", "+<ab> =<ac>"),
            ("Slide edit right", "=<c> +<ab> =<a>", "=<ca> +<ba>"),
            (
                "Slide edit left recursive",
                "=<a> -<b> =<c> -<ac> =<x>",
                "-<abc> =<acx>",
            ),
            (
                "Slide edit right recursive",
                "=<x> -<ca> =<c> -<b> =<a>",
                "=<xca> -<cba>",
            ),
        ] {
            assert_eq!(merged(input), script(result), "{name}");
        }
    }

    #[test]
    fn test_cleanup_merge_materializes_delete_insert() {
        use crate::ops::{Edit, EditScript, Op};
        // A reclassified equality merges into the surrounding edits; the
        // identical delete/insert halves factor straight back out.
        let mut s = EditScript::from(vec![
            Edit::delete("a"),
            Edit::new(Op::DeleteInsert, "b"),
            Edit::insert("c"),
        ]);
        s.cleanup_merge();
        assert_eq!(s, script("-<ab> +<bc>"));
    }

    #[test]
    fn test_cleanup_merge_is_idempotent() {
        for desc in [
            "=<a> -<b> +<c>",
            "-<a> +<abc> -<dc>",
            "=<a> +<ba> =<c>",
            "=<x> -<ca> =<c> -<b> =<a>",
        ] {
            let once = merged(desc);
            let mut twice = once.clone();
            twice.cleanup_merge();
            assert_eq!(once, twice, "{desc}");
        }
    }

    #[test]
    fn test_cleanup_merge_multibyte_affixes() {
        // "ä" factors out of both the deletion and the insertion.
        assert_eq!(merged("-<äb> +<äc>"), script("=<ä> -<b> +<c>"));
    }
}
