//! BPE merge engine: converts a piece's bytes into the minimum-rank sequence
//! of known tokens, and the reverse.
//!
//! Port of the reference `_byte_pair_merge` scan (the classical tiktoken
//! algorithm), generalized from the teacher's string-pair merge rules to
//! raw byte-range rank lookups.

use crate::byte_string::RankTable;
use crate::error::Error;
use crate::TokenId;

/// Encode `piece`'s bytes into the minimum-rank sequence of ranks.
///
/// Every returned id is a value present in `ranks`. When a merge loop
/// terminates with a byte range not present in `ranks`, returns
/// [`Error::UnencodableBytes`] rather than panicking or dropping bytes —
/// this cannot happen for a rank table satisfying
/// [`RankTable::has_all_single_bytes`].
pub fn bpe_encode(piece: &[u8], ranks: &RankTable, offset: usize) -> Result<Vec<TokenId>, Error> {
    if piece.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(rank) = ranks.rank(piece) {
        return Ok(vec![rank]);
    }

    let parts = byte_pair_merge(piece, ranks);

    let mut out = Vec::with_capacity(parts.len() - 1);
    for window in parts.windows(2) {
        let (start, end) = (window[0], window[1]);
        match ranks.rank(&piece[start..end]) {
            Some(rank) => out.push(rank),
            None => {
                return Err(Error::UnencodableBytes {
                    offset: offset + start,
                    bytes: piece[start..end].to_vec(),
                })
            }
        }
    }
    Ok(out)
}

/// Runs the lowest-rank-first merge loop and returns the boundary offsets of
/// the resulting parts (length = number of parts + 1).
///
/// `parts[k]..parts[k+2]` is the byte range considered for a potential merge
/// at scan position `k`; ties in rank are broken by leftmost position, which
/// falls out naturally from a left-to-right `min_rank` scan that only
/// replaces the current best on a strictly lower rank.
fn byte_pair_merge(piece: &[u8], ranks: &RankTable) -> Vec<usize> {
    let mut parts: Vec<usize> = (0..=piece.len()).collect();

    loop {
        if parts.len() <= 2 {
            break;
        }
        let mut best: Option<(TokenId, usize)> = None;
        for i in 0..parts.len() - 2 {
            let Some(rank) = ranks.rank(&piece[parts[i]..parts[i + 2]]) else {
                continue;
            };
            let replace = match best {
                Some((best_rank, _)) => rank < best_rank,
                None => true,
            };
            if replace {
                best = Some((rank, i));
            }
        }
        match best {
            Some((_, i)) => {
                parts.remove(i + 1);
            }
            None => break,
        }
    }

    parts
}

/// Decode a sequence of ids to bytes via the rank or special-token decoder.
/// `special_lookup` resolves ids outside the rank table.
pub fn bpe_decode(
    ids: &[TokenId],
    ranks: &RankTable,
    special_lookup: impl Fn(TokenId) -> Option<Vec<u8>>,
) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    for &id in ids {
        if let Some(bytes) = ranks.bytes_for(id) {
            out.extend_from_slice(bytes);
        } else if let Some(bytes) = special_lookup(id) {
            out.extend_from_slice(&bytes);
        } else {
            return Err(Error::UnknownId { id });
        }
    }
    Ok(out)
}
