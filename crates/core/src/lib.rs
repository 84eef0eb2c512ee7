//! # textdelta
//!
//! A textual difference engine: given two Unicode texts, produce a compact
//! edit script of `Equal`, `Insert`, and `Delete` operations whose
//! concatenation reconstructs either input.
//!
//! ## Core Concepts
//!
//! - **Driver**: recursively shrinks the problem via common-affix stripping,
//!   containment shortcuts, and a half-match split heuristic
//! - **Bisector**: Myers O(ND) bidirectional search for the middle snake,
//!   bounded by an optional deadline
//! - **Line mode**: hashes whole lines to single code points so very large
//!   inputs diff quickly, then refines character by character
//! - **Cleanup passes**: normalize a raw script for machines
//!   (`cleanup_merge`, `cleanup_efficiency`) or for human eyes
//!   (`cleanup_semantic`)
//!
//! ## Example
//!
//! ```rust
//! use textdelta::{diff_main, DiffConfig, DiffEngine};
//!
//! let script = diff_main("Hello World", "Hello Rust", false, None);
//! assert_eq!(script.text1(), "Hello World");
//! assert_eq!(script.text2(), "Hello Rust");
//!
//! // The same through a configured engine:
//! let mut engine = DiffEngine::new(DiffConfig::thorough());
//! assert_eq!(engine.diff("Hello World", "Hello Rust"), script);
//! ```

pub mod affix;
pub mod chars;
pub mod config;
pub mod engine;
pub mod halfmatch;
pub mod lines;
pub mod ops;

mod bisect;
mod cleanup;

// Re-export the main types.
pub use config::{DiffConfig, DEFAULT_EDIT_COST, DEFAULT_TIMEOUT};
pub use engine::DiffEngine;
pub use halfmatch::HalfMatch;
pub use lines::LineScan;
pub use ops::{Edit, EditScript, Op};

use std::time::Duration;

/// Find the differences between two texts.
///
/// If `check_lines` is true, run a faster, slightly less optimal diff that
/// scans line-by-line first on large inputs.
///
/// `timeout` of `None` disables the deadline; `Some(Duration::ZERO)`
/// selects [`DEFAULT_TIMEOUT`]; any other value bounds the search, after
/// which the result is still well formed but may not be minimal.
///
/// # Example
///
/// ```rust
/// use textdelta::diff_main;
///
/// let script = diff_main("abc", "ab123c", false, None);
/// assert_eq!(script.to_string(), "=<ab> +<123> =<c>");
/// ```
pub fn diff_main(
    text1: &str,
    text2: &str,
    check_lines: bool,
    timeout: Option<Duration>,
) -> EditScript {
    let config = DiffConfig::new()
        .with_check_lines(check_lines)
        .with_timeout(timeout);
    DiffEngine::new(config).diff(text1, text2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_diff() {
        let script = diff_main("abc", "ab123c", false, Some(Duration::ZERO));
        assert_eq!(script.to_string(), "=<ab> +<123> =<c>");
    }

    #[test]
    fn test_unicode_diff() {
        let script = diff_main(
            "Apples are ä fruit.",
            "Bananas are älso fruit.",
            false,
            None,
        );
        assert_eq!(
            script.to_string(),
            "-<Apple> +<Banana> =<s are ä> +<lso> =< fruit.>"
        );
    }
}
