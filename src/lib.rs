//! # kimi-tokenizer
//!
//! Byte-level Byte-Pair Encoding tokenizer compatible with the TikToken
//! family, with specific support for MoonshotAI Kimi-K2-style tokenizer
//! artifacts (`tiktoken.model` + `tokenizer_config.json`).
//!
//! ## Example
//!
//! ```
//! use kimi_tokenizer::{Encoding, EncodingConfig};
//! use rustc_hash::FxHashMap;
//!
//! let mut ranks: FxHashMap<Vec<u8>, u32> = FxHashMap::default();
//! for b in 0u16..256 {
//!     ranks.insert(vec![b as u8], b as u32);
//! }
//! ranks.insert(b"He".to_vec(), 300);
//!
//! let enc = Encoding::new(EncodingConfig {
//!     pattern_source: ".+".to_string(),
//!     ranks,
//!     specials: FxHashMap::default(),
//!     matching: kimi_tokenizer::SpecialMatching::Parity,
//! }).unwrap();
//!
//! let ids = enc.encode("He", true).unwrap();
//! assert_eq!(enc.decode(&ids.iter().map(|&i| i as i64).collect::<Vec<_>>()).unwrap(), b"He");
//! ```

pub mod bpe;
pub mod byte_string;
pub mod cache;
pub mod encoding;
pub mod error;
pub mod loaders;
pub mod pattern;
pub mod pretokenize;
pub mod specials;

pub use byte_string::RankTable;
pub use cache::{CacheKey, EncodingCache, SpecialMatchingKey};
pub use encoding::{Encoding, EncodingConfig};
pub use error::Error;
pub use loaders::{
    build_special_tokens, load_tiktoken_model, load_tiktoken_model_complete,
    load_tokenizer_config, ArtifactSource, LocalPathSource,
};
pub use pattern::{kimi_pattern, translate, KIMI_PATTERN_RAW};
pub use specials::{Segment, SpecialMatching, SpecialScanner};

/// Token id type used throughout the library.
///
/// `u32` comfortably covers Kimi's vocabulary plus its 256-entry reserved
/// special-token band, while keeping ids cheap to copy through the BPE hot
/// loop.
pub type TokenId = u32;

/// Guard against pathological inputs in the pre-tokenizer/BPE path; this is
/// not a spec-mandated limit, just a sane ceiling so a caller's mistake
/// surfaces as an error rather than unbounded memory growth.
pub const MAX_INPUT_SIZE: usize = 64 * 1024 * 1024;

/// Build a [`Encoding`] from a `tiktoken.model` rank file and an
/// already-parsed `tokenizer_config.json` special-tokens section, using
/// Kimi's canonical pattern and `parity` matching.
///
/// Rejects an artifact missing one or more of the 256 single-byte ranks
/// ([`Error::InvalidModel`]) — required so BPE always has a token to fall
/// back to (spec §4.3 option (a)).
pub fn load_kimi_encoding(
    model_path: impl AsRef<std::path::Path>,
    tokenizer_config: &serde_json::Value,
) -> Result<Encoding, Error> {
    let ranks = load_tiktoken_model_complete(model_path)?;
    let base_count = ranks.len() as TokenId;
    let specials = build_special_tokens(tokenizer_config, base_count)?;
    Encoding::new(EncodingConfig::kimi(ranks, specials))
}

/// Same as [`load_kimi_encoding`], but reads `tokenizer_config.json` from
/// disk rather than taking an already-parsed value.
pub fn load_kimi_encoding_from_paths(
    model_path: impl AsRef<std::path::Path>,
    tokenizer_config_path: impl AsRef<std::path::Path>,
) -> Result<Encoding, Error> {
    let tokenizer_config = load_tokenizer_config(tokenizer_config_path)?;
    load_kimi_encoding(model_path, &tokenizer_config)
}
