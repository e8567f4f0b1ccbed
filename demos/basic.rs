//! Basic usage demo for kimi-tokenizer
//!
//! Run with: cargo run --example basic

use kimi_tokenizer::{Encoding, EncodingConfig, SpecialMatching};
use rustc_hash::FxHashMap;

fn toy_ranks() -> FxHashMap<Vec<u8>, u32> {
    let mut ranks = FxHashMap::default();
    for b in 0u16..256 {
        ranks.insert(vec![b as u8], b as u32);
    }
    ranks.insert(b"He".to_vec(), 300);
    ranks.insert(b"ll".to_vec(), 301);
    ranks.insert(b"llo".to_vec(), 302);
    ranks
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut specials = FxHashMap::default();
    specials.insert("<|endoftext|>".to_string(), 100_000);

    let encoding = Encoding::new(EncodingConfig {
        pattern_source: kimi_tokenizer::kimi_pattern(),
        ranks: toy_ranks(),
        specials,
        matching: SpecialMatching::Parity,
    })?;

    println!("Vocab size: {}", encoding.n_vocab());

    let text = "Hello, world! This is a test of kimi-tokenizer. 🦀";
    println!("Test text: {text:?}");

    let tokens = encoding.encode(text, true)?;
    println!("Tokens ({}): {tokens:?}", tokens.len());

    let ids: Vec<i64> = tokens.iter().map(|&id| id as i64).collect();
    let decoded = encoding.decode(&ids)?;
    println!("Decoded: {:?}", String::from_utf8_lossy(&decoded));

    Ok(())
}
