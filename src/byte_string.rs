//! Rank/decoder table representation.
//!
//! Ranks are globally unique non-negative integers; the rank table is keyed
//! directly on raw byte strings, following the reference tiktoken
//! implementations rather than any intermediate string representation.

use rustc_hash::FxHashMap;

use crate::TokenId;

/// Mapping from byte-string to rank, plus its derived inverse.
///
/// Immutable once built; the inverse (`decoder`) is computed once at
/// construction so decode is a plain index lookup.
#[derive(Debug, Clone, Default)]
pub struct RankTable {
    encoder: FxHashMap<Vec<u8>, TokenId>,
    decoder: FxHashMap<TokenId, Vec<u8>>,
}

impl RankTable {
    pub fn from_encoder(encoder: FxHashMap<Vec<u8>, TokenId>) -> Self {
        let decoder = encoder.iter().map(|(k, &v)| (v, k.clone())).collect();
        Self { encoder, decoder }
    }

    #[inline]
    pub fn rank(&self, piece: &[u8]) -> Option<TokenId> {
        self.encoder.get(piece).copied()
    }

    #[inline]
    pub fn bytes_for(&self, id: TokenId) -> Option<&[u8]> {
        self.decoder.get(&id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.encoder.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoder.is_empty()
    }

    pub fn max_rank(&self) -> Option<TokenId> {
        self.encoder.values().copied().max()
    }

    /// All 256 single-byte strings are present as rank entries.
    ///
    /// Required for Kimi-compatible artifacts so that BPE merges always
    /// terminate on tokens present in the table (spec §4.3 option (a)).
    pub fn has_all_single_bytes(&self) -> bool {
        all_single_bytes_present(&self.encoder)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], TokenId)> {
        self.encoder.iter().map(|(k, &v)| (k.as_slice(), v))
    }
}

/// Same check as [`RankTable::has_all_single_bytes`], usable on a raw
/// encoder map before a [`RankTable`] is built (e.g. right after parsing a
/// `tiktoken.model` file).
pub fn all_single_bytes_present(encoder: &FxHashMap<Vec<u8>, TokenId>) -> bool {
    (0u16..256).all(|b| encoder.contains_key(&[b as u8][..]))
}
