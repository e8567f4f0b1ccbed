//! Encoding façade: wires the pre-tokenizer, special-token scanner, and BPE
//! engine together behind `encode`/`decode`.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::bpe::{bpe_decode, bpe_encode};
use crate::byte_string::RankTable;
use crate::error::Error;
use crate::pattern::kimi_pattern;
use crate::pretokenize::CompiledPattern;
use crate::specials::{Segment, SpecialMatching, SpecialScanner};
use crate::TokenId;

/// Construction parameters for an [`Encoding`].
#[derive(Debug, Clone)]
pub struct EncodingConfig {
    /// Pre-tokenization regex source; defaults to the translated Kimi
    /// pattern via [`EncodingConfig::kimi`].
    pub pattern_source: String,
    pub ranks: FxHashMap<Vec<u8>, TokenId>,
    pub specials: FxHashMap<String, TokenId>,
    pub matching: SpecialMatching,
}

impl EncodingConfig {
    /// The canonical Kimi-K2 configuration: translated Kimi pattern,
    /// `parity` matching (the reference's default discipline).
    pub fn kimi(ranks: FxHashMap<Vec<u8>, TokenId>, specials: FxHashMap<String, TokenId>) -> Self {
        Self {
            pattern_source: kimi_pattern(),
            ranks,
            specials,
            matching: SpecialMatching::Parity,
        }
    }
}

/// An immutable, constructed tokenizer. Safe to share across threads and
/// call `encode`/`decode` on concurrently without synchronization — no
/// mutable scratch is held on the instance.
#[derive(Debug)]
pub struct Encoding {
    pattern: CompiledPattern,
    ranks: RankTable,
    specials_by_id: FxHashMap<TokenId, Vec<u8>>,
    scanner: SpecialScanner,
    matching: SpecialMatching,
}

impl Encoding {
    /// Construct and validate an encoding.
    ///
    /// Rejects an empty or non-compiling `pattern_source`
    /// ([`Error::InvalidPattern`]) and any id occurring in both `ranks` and
    /// `specials` ([`Error::OverlappingIds`]).
    #[tracing::instrument(skip_all, fields(n_ranks = config.ranks.len(), n_specials = config.specials.len()))]
    pub fn new(config: EncodingConfig) -> Result<Self, Error> {
        let pattern = CompiledPattern::compile(&config.pattern_source)?;

        let rank_ids: std::collections::HashSet<TokenId> =
            config.ranks.values().copied().collect();
        for &id in config.specials.values() {
            if rank_ids.contains(&id) {
                return Err(Error::OverlappingIds { id });
            }
        }

        let ranks = RankTable::from_encoder(config.ranks);
        let specials_by_id: FxHashMap<TokenId, Vec<u8>> = config
            .specials
            .iter()
            .map(|(s, &id)| (id, s.as_bytes().to_vec()))
            .collect();
        let scanner = SpecialScanner::new(&config.specials);

        tracing::debug!("encoding constructed");
        Ok(Self {
            pattern,
            ranks,
            specials_by_id,
            scanner,
            matching: config.matching,
        })
    }

    /// Encode `text` into a sequence of token ids.
    ///
    /// `allow_special` controls whether configured special-token literals
    /// are recognized (`true`, default per spec) or treated as ordinary
    /// text to be BPE-encoded (`false`).
    #[tracing::instrument(skip_all, fields(len = text.len()))]
    pub fn encode(&self, text: &str, allow_special: bool) -> Result<Vec<TokenId>, Error> {
        let segments = self.scanner.split(text, allow_special, self.matching);
        let text_base = text.as_ptr() as usize;

        let mut out = Vec::new();
        for segment in segments {
            match segment {
                Segment::Special(id) => out.push(id),
                Segment::Ordinary(piece) => {
                    for fragment in self.pattern.pretokenize(piece) {
                        let fragment_offset = fragment.as_ptr() as usize - text_base;
                        let ids = bpe_encode(fragment.as_bytes(), &self.ranks, fragment_offset)?;
                        out.extend(ids);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Encode many texts in parallel (rayon), preserving input order.
    pub fn encode_batch(
        &self,
        texts: &[&str],
        allow_special: bool,
    ) -> Result<Vec<Vec<TokenId>>, Error> {
        texts
            .par_iter()
            .map(|text| self.encode(text, allow_special))
            .collect()
    }

    /// Decode a sequence of ids back to the exact original bytes.
    ///
    /// `ids` are validated to be non-negative before lookup
    /// ([`Error::InvalidId`]); any id absent from both decoder tables is
    /// [`Error::UnknownId`].
    pub fn decode(&self, ids: &[i64]) -> Result<Vec<u8>, Error> {
        let mut converted = Vec::with_capacity(ids.len());
        for &raw in ids {
            if raw < 0 || raw > TokenId::MAX as i64 {
                return Err(Error::InvalidId { value: raw });
            }
            converted.push(raw as TokenId);
        }
        bpe_decode(&converted, &self.ranks, |id| {
            self.specials_by_id.get(&id).cloned()
        })
    }

    /// Decode many id sequences in parallel.
    pub fn decode_batch(&self, batches: &[&[i64]]) -> Result<Vec<Vec<u8>>, Error> {
        batches.par_iter().map(|ids| self.decode(ids)).collect()
    }

    /// Encode a single piece known to correspond to exactly one token
    /// (ordinary or special).
    pub fn encode_single_token(&self, piece: &[u8]) -> Result<TokenId, Error> {
        if let Some(rank) = self.ranks.rank(piece) {
            return Ok(rank);
        }
        if let Ok(s) = std::str::from_utf8(piece) {
            for (id, bytes) in &self.specials_by_id {
                if bytes.as_slice() == s.as_bytes() {
                    return Ok(*id);
                }
            }
        }
        Err(Error::UnencodableBytes {
            offset: 0,
            bytes: piece.to_vec(),
        })
    }

    /// The byte representation of a single token id (ordinary or special).
    pub fn decode_single_token_bytes(&self, id: TokenId) -> Result<Vec<u8>, Error> {
        if let Some(bytes) = self.ranks.bytes_for(id) {
            return Ok(bytes.to_vec());
        }
        self.specials_by_id
            .get(&id)
            .cloned()
            .ok_or(Error::UnknownId { id })
    }

    /// All ordinary token byte values (does not include specials).
    pub fn token_byte_values(&self) -> Vec<Vec<u8>> {
        self.ranks.iter().map(|(bytes, _)| bytes.to_vec()).collect()
    }

    /// One past the highest assigned id across ranks and specials.
    pub fn n_vocab(&self) -> TokenId {
        let max_rank = self.ranks.max_rank().unwrap_or(0);
        let max_special = self.specials_by_id.keys().copied().max().unwrap_or(0);
        max_rank.max(max_special) + 1
    }

    pub fn special_tokens_set(&self) -> std::collections::HashSet<&str> {
        // Kept for introspection parity with the tiktoken-rs-family
        // reference; rebuilt from raw bytes since specials are guaranteed
        // UTF-8 by construction (spec §3's special-token table).
        self.specials_by_id
            .values()
            .map(|bytes| std::str::from_utf8(bytes).expect("special tokens are UTF-8"))
            .collect()
    }
}

fn _assert_send_sync() {
    fn assert<T: Send + Sync>() {}
    assert::<Encoding>();
}
