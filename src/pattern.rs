//! Pattern translator: rewrites TikToken's `&&` character-class
//! intersections into an equivalent form that doesn't need them.
//!
//! `fancy_regex` (like most non-PCRE engines) has no intersection operator,
//! so Kimi's `pat_str` can't be compiled as-is. The translation is a pure
//! string substitution over the four specific patterns Kimi's `pat_str`
//! contains — not a general regex-AST rewrite.

/// The four substitutions from spec §6, applied in order. Each pair is
/// `(from, to)`; `from` only ever appears as a whole alternative, so plain
/// substring replacement is safe and exact.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    (
        r"[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}&&[^\p{Han}]]*",
        r"(?:(?!\p{Han})[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}])*",
    ),
    (
        r"[\p{Ll}\p{Lm}\p{Lo}\p{M}&&[^\p{Han}]]+",
        r"(?:(?!\p{Han})[\p{Ll}\p{Lm}\p{Lo}\p{M}])+",
    ),
    (
        r"[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}&&[^\p{Han}]]+",
        r"(?:(?!\p{Han})[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}])+",
    ),
    (
        r"[\p{Ll}\p{Lm}\p{Lo}\p{M}&&[^\p{Han}]]*",
        r"(?:(?!\p{Han})[\p{Ll}\p{Lm}\p{Lo}\p{M}])*",
    ),
];

/// Eliminate every `[CLASS && [^\p{Han}]]` occurrence recognized by
/// [`SUBSTITUTIONS`], leaving everything else in `source` untouched.
///
/// For text containing no `\p{Han}` codepoints, the translated pattern
/// matches the same spans as the original (spec §4.4's contract is on the
/// match set, not the internal match trace).
pub fn translate(source: &str) -> String {
    let mut out = source.to_string();
    for (from, to) in SUBSTITUTIONS {
        out = out.replace(from, to);
    }
    out
}

/// Kimi's canonical `pat_str`, before translation — contains `&&`
/// intersections and will not compile with `fancy_regex` directly.
pub const KIMI_PATTERN_RAW: &str = concat!(
    r"[\p{Han}]+",
    "|",
    r"[^\r\n\p{L}\p{N}]?[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}&&[^\p{Han}]]*[\p{Ll}\p{Lm}\p{Lo}\p{M}&&[^\p{Han}]]+(?i:'s|'t|'re|'ve|'m|'ll|'d)?",
    "|",
    r"[^\r\n\p{L}\p{N}]?[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}&&[^\p{Han}]]+[\p{Ll}\p{Lm}\p{Lo}\p{M}&&[^\p{Han}]]*(?i:'s|'t|'re|'ve|'m|'ll|'d)?",
    "|",
    r"\p{N}{1,3}",
    "|",
    r" ?[^\s\p{L}\p{N}]+[\r\n]*",
    "|",
    r"\s*[\r\n]+",
    "|",
    r"\s+(?!\S)",
    "|",
    r"\s+",
);

/// Kimi's `pat_str` after translation — the form this crate actually
/// compiles by default.
pub fn kimi_pattern() -> String {
    translate(KIMI_PATTERN_RAW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_removes_all_intersections() {
        let translated = translate(KIMI_PATTERN_RAW);
        assert!(!translated.contains("&&"));
    }

    #[test]
    fn translate_is_idempotent_on_already_translated_input() {
        let once = translate(KIMI_PATTERN_RAW);
        let twice = translate(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn translate_leaves_unrelated_text_untouched() {
        let input = r"\p{N}{1,3}|\s+";
        assert_eq!(translate(input), input);
    }

    #[test]
    fn kimi_pattern_compiles_with_fancy_regex() {
        let compiled = fancy_regex::Regex::new(&kimi_pattern());
        assert!(compiled.is_ok());
    }

    #[test]
    fn each_substitution_individually_round_trips() {
        for (from, to) in SUBSTITUTIONS {
            assert_eq!(translate(from), *to);
        }
    }
}
