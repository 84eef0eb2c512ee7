//! Edit-script data model
//!
//! A diff is an [`EditScript`]: an ordered sequence of [`Edit`] operations.
//! Reading the script and keeping `Equal` + `Delete` text reproduces the
//! first input; keeping `Equal` + `Insert` text reproduces the second.
//!
//! ```text
//! [Delete("Hello"), Insert("Goodbye"), Equal(" world.")]
//! ```
//! means: delete "Hello", add "Goodbye", keep " world.".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chars::char_count;

/// Kind of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    /// Text present in both inputs.
    Equal,
    /// Text present only in the second input.
    Insert,
    /// Text present only in the first input.
    Delete,
    /// Internal sentinel: an equality reclassified during cleanup as
    /// simultaneously deleted and inserted. Materialized into a real
    /// delete/insert pair by `cleanup_merge`; never part of a final script.
    DeleteInsert,
}

impl Op {
    fn symbol(self) -> char {
        match self {
            Op::Equal => '=',
            Op::Insert => '+',
            Op::Delete => '-',
            Op::DeleteInsert => '±',
        }
    }
}

/// A single edit operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub op: Op,
    pub text: String,
}

impl Edit {
    pub fn new(op: Op, text: impl Into<String>) -> Self {
        Self {
            op,
            text: text.into(),
        }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(Op::Equal, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(Op::Insert, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(Op::Delete, text)
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.op.symbol(), self.text)
    }
}

/// An ordered sequence of edit operations.
///
/// Produced by the diff driver and consumed or rewritten by the cleanup
/// passes. After `cleanup_merge` the script is canonical: no two consecutive
/// operations share a tag, no operation has empty text, and no
/// [`Op::DeleteInsert`] remains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript(pub(crate) Vec<Edit>);

impl EditScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Edit] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Edit> {
        self.0
    }

    pub(crate) fn push(&mut self, edit: Edit) {
        self.0.push(edit);
    }

    /// Compute and return the source text (all equalities and deletions).
    pub fn text1(&self) -> String {
        let mut source = String::new();
        for e in &self.0 {
            if e.op != Op::Insert {
                source.push_str(&e.text);
            }
        }
        source
    }

    /// Compute and return the destination text (all equalities and
    /// insertions).
    pub fn text2(&self) -> String {
        let mut dest = String::new();
        for e in &self.0 {
            if e.op != Op::Delete {
                dest.push_str(&e.text);
            }
        }
        dest
    }

    /// The Levenshtein distance of the script: the number of inserted,
    /// deleted, or substituted code points.
    pub fn levenshtein(&self) -> usize {
        let mut distance = 0;
        let mut insertions = 0;
        let mut deletions = 0;
        for e in &self.0 {
            match e.op {
                Op::Insert => insertions += char_count(&e.text),
                Op::Delete => deletions += char_count(&e.text),
                Op::Equal => {
                    // A deletion paired with an insertion is one substitution.
                    distance += insertions.max(deletions);
                    insertions = 0;
                    deletions = 0;
                }
                Op::DeleteInsert => {}
            }
        }
        distance + insertions.max(deletions)
    }

    /// `loc1` is a byte location in text1; compute the equivalent location
    /// in text2.
    ///
    /// e.g. "The cat" vs "The big cat": 1 -> 1, 4 -> 8.
    pub fn x_index(&self, loc1: usize) -> usize {
        let mut chars1 = 0;
        let mut chars2 = 0;
        let mut last_chars1 = 0;
        let mut last_chars2 = 0;
        let mut last_op = None;
        for e in &self.0 {
            if e.op != Op::Insert {
                chars1 += e.text.len();
            }
            if e.op != Op::Delete {
                chars2 += e.text.len();
            }
            if chars1 > loc1 {
                last_op = Some(e.op);
                break;
            }
            last_chars1 = chars1;
            last_chars2 = chars2;
        }
        if last_op == Some(Op::Delete) {
            // The location was deleted.
            last_chars2
        } else {
            last_chars2 + (loc1 - last_chars1)
        }
    }

    /// Render the script as an HTML report.
    pub fn pretty_html(&self) -> String {
        let mut s = String::new();
        for e in &self.0 {
            let text = escape_html(&e.text).replace('\n', "&para;<br>");
            match e.op {
                Op::Insert => {
                    s.push_str("<ins style=\"background:#e6ffe6;\">");
                    s.push_str(&text);
                    s.push_str("</ins>");
                }
                Op::Delete => {
                    s.push_str("<del style=\"background:#ffe6e6;\">");
                    s.push_str(&text);
                    s.push_str("</del>");
                }
                Op::Equal => {
                    s.push_str("<span>");
                    s.push_str(&text);
                    s.push_str("</span>");
                }
                Op::DeleteInsert => {}
            }
        }
        s
    }
}

impl From<Vec<Edit>> for EditScript {
    fn from(edits: Vec<Edit>) -> Self {
        Self(edits)
    }
}

impl std::ops::Deref for EditScript {
    type Target = [Edit];

    fn deref(&self) -> &[Edit] {
        &self.0
    }
}

impl IntoIterator for EditScript {
    type Item = Edit;
    type IntoIter = std::vec::IntoIter<Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for EditScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
