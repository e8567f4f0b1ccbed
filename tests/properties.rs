//! Property-based coverage of round-trip and determinism guarantees.

use kimi_tokenizer::{Encoding, EncodingConfig, SpecialMatching};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

fn full_byte_range_encoding() -> Encoding {
    let mut ranks = FxHashMap::default();
    for b in 0u16..256 {
        ranks.insert(vec![b as u8], b as u32);
    }
    Encoding::new(EncodingConfig::kimi(ranks, FxHashMap::default())).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn round_trip_holds_for_arbitrary_unicode_text(text in ".{0,200}") {
        let enc = full_byte_range_encoding();
        let ids = enc.encode(&text, true).unwrap();
        let ids_i64: Vec<i64> = ids.iter().map(|&i| i as i64).collect();
        let decoded = enc.decode(&ids_i64).unwrap();
        prop_assert_eq!(decoded, text.as_bytes());
    }

    #[test]
    fn encoding_is_deterministic_for_special_free_text(text in "[a-zA-Z0-9 .,!?\n\r\t]{0,200}") {
        let enc = full_byte_range_encoding();
        let first = enc.encode(&text, true).unwrap();
        let second = enc.encode(&text, true).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn decode_of_single_byte_tokens_is_identity(bytes in proptest::collection::vec(0u8..=255, 0..64)) {
        let enc = full_byte_range_encoding();
        let ids: Vec<u32> = bytes.iter().map(|&b| b as u32).collect();
        let ids_i64: Vec<i64> = ids.iter().map(|&i| i as i64).collect();
        let decoded = enc.decode(&ids_i64).unwrap();
        prop_assert_eq!(decoded, bytes);
    }
}
