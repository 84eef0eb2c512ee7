//! Basic usage example of the textdelta library

use textdelta::{diff_main, DiffConfig, DiffEngine};

const LINE: &str = "----------------------------------------";

fn main() {
    println!("=== textdelta Examples ===\n");

    // Example 1: Simple diff with default settings
    example_simple_diff();

    // Example 2: Semantic cleanup for human-readable output
    example_semantic_cleanup();

    // Example 3: Custom configuration
    example_custom_config();
}

fn example_simple_diff() {
    println!("Example 1: Simple Diff");
    println!("{}", LINE);

    let original = "Hello World! This is a test.";
    let modified = "Hello Rust! This is a test.";

    let script = diff_main(original, modified, false, None);

    println!("Original: {}", original);
    println!("Modified: {}", modified);
    println!("\nOperations:");
    for (i, edit) in script.iter().enumerate() {
        println!("  {}. {}", i + 1, edit);
    }
    println!("\nLevenshtein distance: {}", script.levenshtein());
    println!("\n");
}

fn example_semantic_cleanup() {
    println!("Example 2: Semantic Cleanup");
    println!("{}", LINE);

    let original = "The cat came.";
    let modified = "The cat cat came.";

    // The raw diff is minimal but ugly; semantic cleanup slides the edit
    // onto a word boundary.
    let mut script = diff_main(original, modified, false, None);
    println!("Raw:      {}", script);
    script.cleanup_semantic();
    println!("Semantic: {}", script);
    println!("\nAs HTML: {}", script.pretty_html());
    println!("\n");
}

fn example_custom_config() {
    println!("Example 3: Custom Configuration");
    println!("{}", LINE);

    let original = "The quick brown fox jumps over the lazy dog.";
    let modified = "The fast brown fox leaps over the sleepy dog.";

    // No deadline: always search for the optimal script.
    let config = DiffConfig::thorough();
    let mut engine = DiffEngine::new(config);
    let script = engine.diff(original, modified);

    println!("Original: {}", original);
    println!("Modified: {}", modified);
    println!("\nScript: {}", script);
    println!(
        "Reconstructed: {:?} / {:?}",
        script.text1(),
        script.text2()
    );
    println!();
}
