//! Unicode-aware pre-tokenizer: splits a byte slice into pieces using a
//! compiled regex pattern.

use fancy_regex::Regex;

use crate::error::Error;

/// A compiled pre-tokenization pattern.
///
/// Construction validates the pattern is non-empty and compiles; matching
/// never allocates beyond the returned slices, which borrow from the input.
#[derive(Debug)]
pub struct CompiledPattern {
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(source: &str) -> Result<Self, Error> {
        if source.is_empty() {
            return Err(Error::InvalidPattern {
                pattern_source: source.to_string(),
                message: "pattern source must not be empty".to_string(),
            });
        }
        let regex = Regex::new(source).map_err(|e| Error::InvalidPattern {
            pattern_source: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// Split `text` into non-overlapping, contiguous, non-empty pieces that
    /// together cover `text` exactly, in order.
    ///
    /// The pattern is applied with `find_iter`, matching the teacher's
    /// single-pattern fast path: greedy left-to-right, first alternative
    /// wins.
    pub fn pretokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.regex
            .find_iter(text)
            .filter_map(|m| m.ok())
            .map(|m| m.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::kimi_pattern;

    #[test]
    fn empty_source_is_rejected() {
        assert!(CompiledPattern::compile("").is_err());
    }

    #[test]
    fn invalid_regex_is_rejected() {
        assert!(CompiledPattern::compile("(unclosed").is_err());
    }

    #[test]
    fn splits_cover_input_exactly() {
        let pat = CompiledPattern::compile(&kimi_pattern()).unwrap();
        let text = "Hello, world!\n";
        let pieces = pat.pretokenize(text);
        let joined: String = pieces.concat();
        assert_eq!(joined, text);
        assert!(pieces.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn han_runs_are_isolated() {
        let pat = CompiledPattern::compile(&kimi_pattern()).unwrap();
        let pieces = pat.pretokenize("Mix 汉字 and ASCII");
        assert!(pieces.contains(&"汉字"));
    }

    #[test]
    fn crlf_and_lf_boundaries() {
        let pat = CompiledPattern::compile(&kimi_pattern()).unwrap();
        let text = "line1\r\nline2\nline3\tend";
        let pieces = pat.pretokenize(text);
        assert_eq!(pieces.concat(), text);
    }
}
