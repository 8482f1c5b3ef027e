//! Example: compiling a small word list and querying it.
//!
//! Shows the full life of a dictionary: build from sorted words, check
//! membership and prefixes, list the accepted language, and solve a rack.
//!
//! Run with: cargo run --example wordlist

use dawglex::{Builder, DEFAULT_BLANK};

fn main() {
    let words = ["bake", "baked", "baker", "cake", "caked", "fake", "lake"];
    let mut builder = Builder::new();
    for word in words {
        builder.insert(word).expect("word list is sorted");
    }
    let dawg = builder.build();

    println!("{} words, {} nodes", words.len(), dawg.node_count());

    // Word lookup
    println!("\nWord lookup:");
    for word in ["bake", "baker", "bakes", "cake", "lake", "make"] {
        println!("  {word}: {}", if dawg.contains(word) { "yes" } else { "no" });
    }

    // Prefix checking
    println!("\nPrefix checking:");
    for prefix in ["ba", "cak", "ma", "fak"] {
        println!(
            "  {prefix}*: {}",
            if dawg.contains_prefix(prefix) { "yes" } else { "no" }
        );
    }

    // Everything the dictionary accepts
    println!("\nAll words: {:?}", dawg.words());

    // Rack search: a blank tile stands in for any letter.
    let found = dawg
        .anagrams(b"bak?", 4, &[], DEFAULT_BLANK)
        .expect("arguments are valid");
    println!("\nWords for rack 'bak?': {found:?}");

    // Pin the first letter to 'c' without spending a tile on it.
    let found = dawg
        .anagrams(b"ake", 4, &[(0, b'c')], DEFAULT_BLANK)
        .expect("arguments are valid");
    println!("Words for rack 'ake' with c pinned at 0: {found:?}");
}
