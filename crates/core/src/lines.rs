//! Line tokenization for large-input diffs
//!
//! Very large texts are first diffed line-by-line: each unique line is
//! assigned an index and re-emitted as the single code point with that
//! scalar value. The char-level machinery then runs over the short token
//! strings, and the resulting script is rehydrated back into real lines.

use std::collections::HashMap;

use crate::ops::EditScript;

/// Output of [`lines_to_chars`]: both texts re-encoded as token strings,
/// plus the line table shared between them.
///
/// `lines[0]` is intentionally blank so that no token is emitted as U+0000
/// (a valid character, but one various debuggers dislike). Identical lines
/// in either text share an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineScan {
    /// `text1` encoded as one code point per line.
    pub chars1: String,
    /// `text2` encoded as one code point per line.
    pub chars2: String,
    /// Unique lines in first-appearance order, trailing newline retained.
    pub lines: Vec<String>,
}

/// Split two texts into lines and reduce them to token strings where each
/// code point stands for one line.
pub fn lines_to_chars(text1: &str, text2: &str) -> LineScan {
    let mut munger = LineMunger::new();
    let chars1 = munger.encode(text1);
    let chars2 = munger.encode(text2);
    LineScan {
        chars1,
        chars2,
        lines: munger.line_array,
    }
}

/// Rehydrate the text of every edit in `script` from line tokens back to
/// the lines they stand for.
pub fn chars_to_lines(script: &mut EditScript, lines: &[String]) {
    for edit in &mut script.0 {
        let mut text = String::with_capacity(edit.text.len());
        for token in edit.text.chars() {
            text.push_str(&lines[token as usize]);
        }
        edit.text = text;
    }
}

struct LineMunger {
    // e.g. line_array[4] == "Hello\n"
    line_array: Vec<String>,
    // e.g. line_hash["Hello\n"] == 4
    line_hash: HashMap<String, usize>,
}

impl LineMunger {
    fn new() -> Self {
        Self {
            line_array: vec![String::new()],
            line_hash: HashMap::new(),
        }
    }

    fn encode(&mut self, text: &str) -> String {
        let mut chars = String::new();
        for line in text.split_inclusive('\n') {
            let id = match self.line_hash.get(line) {
                Some(&id) => id,
                None => {
                    // The surrogate block is not assignable; pad the table so
                    // indices resume at U+E000.
                    if self.line_array.len() == 0xD800 {
                        self.line_array.resize(0xE000, String::new());
                    }
                    let id = self.line_array.len();
                    self.line_array.push(line.to_string());
                    self.line_hash.insert(line.to_string(), id);
                    id
                }
            };
            chars.push(char::from_u32(id as u32).expect("line index exceeds the code-point space"));
        }
        chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::script;
    use crate::ops::{Edit, EditScript};

    #[test]
    fn test_shared_lines() {
        let scan = lines_to_chars("alpha\nbeta\nalpha\n", "beta\nalpha\nbeta\n");
        assert_eq!(scan.chars1, "\u{01}\u{02}\u{01}");
        assert_eq!(scan.chars2, "\u{02}\u{01}\u{02}");
        assert_eq!(scan.lines, vec!["", "alpha\n", "beta\n"]);
    }

    #[test]
    fn test_empty_string_and_blank_lines() {
        let scan = lines_to_chars("", "alpha\r\nbeta\r\n\r\n\r\n");
        assert_eq!(scan.chars1, "");
        assert_eq!(scan.chars2, "\u{01}\u{02}\u{03}\u{03}");
        assert_eq!(scan.lines, vec!["", "alpha\r\n", "beta\r\n", "\r\n"]);
    }

    #[test]
    fn test_no_linebreaks() {
        let scan = lines_to_chars("a", "b");
        assert_eq!(scan.chars1, "\u{01}");
        assert_eq!(scan.chars2, "\u{02}");
        assert_eq!(scan.lines, vec!["", "a", "b"]);
    }

    // More than 256 lines to reveal any 8-bit limitations.
    fn build_300_lines() -> (String, LineScan) {
        let mut text = String::new();
        let mut expected = LineScan {
            lines: vec![String::new()],
            ..Default::default()
        };
        for x in 1..=300u32 {
            let line = format!("{x}\n");
            text.push_str(&line);
            expected.lines.push(line);
            expected.chars1.push(char::from_u32(x).unwrap());
        }
        (text, expected)
    }

    #[test]
    fn test_more_than_256_lines() {
        let (text, expected) = build_300_lines();
        let scan = lines_to_chars(&text, "");
        assert_eq!(scan, expected);
    }

    #[test]
    fn test_chars_to_lines() {
        let mut diffs = script("=<\u{01}\u{02}\u{01}> +<\u{02}\u{01}\u{02}>");
        let lines: Vec<String> = vec!["".into(), "alpha\n".into(), "beta\n".into()];
        chars_to_lines(&mut diffs, &lines);
        assert_eq!(
            diffs,
            script("=<alpha\nbeta\nalpha\n> +<beta\nalpha\nbeta\n>")
        );
    }

    #[test]
    fn test_chars_to_lines_more_than_256() {
        let (text, scan) = build_300_lines();
        let mut diffs = EditScript::from(vec![Edit::delete(scan.chars1.clone())]);
        chars_to_lines(&mut diffs, &scan.lines);
        assert_eq!(diffs, EditScript::from(vec![Edit::delete(text)]));
    }
}
