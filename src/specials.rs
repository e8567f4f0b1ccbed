//! Special-token scanner: partitions input into alternating ordinary and
//! special segments.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use rustc_hash::FxHashMap;

use crate::TokenId;

/// One piece of a partitioned input, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'t> {
    Ordinary(&'t str),
    Special(TokenId),
}

/// Which discipline governs overlapping special-token literals (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialMatching {
    /// Emulates the reference's unspecified-order `re.search` traversal.
    /// Callers must not depend on which of two overlapping specials wins.
    #[default]
    Parity,
    /// Always prefers the longest literal starting at a given position.
    Longest,
}

/// Specials table plus the machinery needed to scan for occurrences under
/// either [`SpecialMatching`] discipline.
#[derive(Debug)]
pub struct SpecialScanner {
    /// Sorted by UTF-8 byte order, used by the `Parity` discipline.
    sorted: Vec<(String, TokenId)>,
    /// `LeftmostLongest` automaton, used by the `Longest` discipline.
    automaton: Option<AhoCorasick>,
    automaton_ids: Vec<TokenId>,
}

impl SpecialScanner {
    pub fn new(specials: &FxHashMap<String, TokenId>) -> Self {
        let mut sorted: Vec<(String, TokenId)> =
            specials.iter().map(|(s, &id)| (s.clone(), id)).collect();
        sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        let (automaton, automaton_ids) = if sorted.is_empty() {
            (None, Vec::new())
        } else {
            let patterns: Vec<&str> = sorted.iter().map(|(s, _)| s.as_str()).collect();
            let ac = AhoCorasickBuilder::new()
                .match_kind(MatchKind::LeftmostLongest)
                .build(&patterns)
                .expect("special-token literals form a valid automaton");
            (Some(ac), sorted.iter().map(|(_, id)| *id).collect())
        };

        Self {
            sorted,
            automaton,
            automaton_ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Partition `text` per spec §4.2. If `allow` is false, the whole input
    /// is a single ordinary segment regardless of what it contains.
    pub fn split<'t>(&self, text: &'t str, allow: bool, matching: SpecialMatching) -> Vec<Segment<'t>> {
        if !allow || self.is_empty() {
            return if text.is_empty() {
                Vec::new()
            } else {
                vec![Segment::Ordinary(text)]
            };
        }

        match matching {
            SpecialMatching::Longest => self.split_longest(text),
            SpecialMatching::Parity => self.split_parity(text),
        }
    }

    fn split_longest<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let Some(automaton) = &self.automaton else {
            return vec![Segment::Ordinary(text)];
        };

        let mut segments = Vec::new();
        let mut cursor = 0usize;
        for m in automaton.find_iter(text) {
            if m.start() > cursor {
                segments.push(Segment::Ordinary(&text[cursor..m.start()]));
            }
            segments.push(Segment::Special(self.automaton_ids[m.pattern().as_usize()]));
            cursor = m.end();
        }
        if cursor < text.len() {
            segments.push(Segment::Ordinary(&text[cursor..]));
        }
        segments
    }

    /// Scans left to right; at each position, accepts the first literal (in
    /// sorted order) that starts there. This matches the documented
    /// reference-compatible fallback in spec §9.
    fn split_parity<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut segments = Vec::new();
        let mut start = 0usize;
        let mut i = 0usize;

        while i < text.len() {
            if !text.is_char_boundary(i) {
                i += 1;
                continue;
            }
            let rest = &text[i..];
            let hit = self
                .sorted
                .iter()
                .find(|(literal, _)| rest.starts_with(literal.as_str()));

            match hit {
                Some((literal, id)) => {
                    if i > start {
                        segments.push(Segment::Ordinary(&text[start..i]));
                    }
                    segments.push(Segment::Special(*id));
                    i += literal.len();
                    start = i;
                }
                None => i += 1,
            }
        }

        if start < text.len() {
            segments.push(Segment::Ordinary(&text[start..]));
        }
        segments
    }
}
