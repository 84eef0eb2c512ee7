//! Line-mode diffing of large texts

use std::time::{Duration, Instant};

use textdelta::diff_main;

fn main() {
    println!("=== Line-mode speedup ===\n");

    // Build two large, mostly different texts.
    let old: String = (0..2_000).map(|i| format!("line number {i}\n")).collect();
    let new: String = (0..2_000)
        .map(|i| {
            if i % 7 == 0 {
                format!("LINE NUMBER {i}\n")
            } else {
                format!("line number {i}\n")
            }
        })
        .collect();

    for (name, check_lines) in [("char mode", false), ("line mode", true)] {
        let start = Instant::now();
        let script = diff_main(&old, &new, check_lines, Some(Duration::ZERO));
        println!(
            "{name}: {} operations, {} edited code points, {:?}",
            script.len(),
            script.levenshtein(),
            start.elapsed()
        );
    }
}
