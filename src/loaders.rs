//! Artifact loaders: parse `tiktoken.model` and `tokenizer_config.json`
//! shapes into a rank table and a special-tokens map.
//!
//! The HuggingFace-style fetcher (HTTP download + local disk cache) is an
//! external collaborator per the spec, specified only at its interface:
//! given `(repo, revision, filename)` it yields a local file path. This
//! module defines that interface (`ArtifactSource`) and a local-filesystem
//! implementation; no network client is bundled.

use std::collections::HashMap as StdHashMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rustc_hash::FxHashMap;

use crate::error::Error;
use crate::TokenId;

/// Given `(repo, revision, filename)`, yields a local file path. Blocking;
/// the core's only contract with whatever performs the actual fetch.
pub trait ArtifactSource {
    fn resolve(&self, repo: &str, revision: &str, filename: &str) -> Result<PathBuf, Error>;
}

/// Resolves artifacts from a single local directory, laid out as
/// `<root>/<repo>/<revision>/<filename>`. Stands in for the HTTP+cache
/// collaborator in contexts (tests, offline bundles) that already have the
/// files on disk.
pub struct LocalPathSource {
    root: PathBuf,
}

impl LocalPathSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactSource for LocalPathSource {
    fn resolve(&self, repo: &str, revision: &str, filename: &str) -> Result<PathBuf, Error> {
        let path = self.root.join(repo).join(revision).join(filename);
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found under local artifact source", path.display()),
            )));
        }
        Ok(path)
    }
}

/// Parse a `tiktoken.model` file: one `BASE64 WS+ DECIMAL` record per
/// non-empty line.
///
/// Lines that don't split into exactly two whitespace-separated fields are
/// ignored. Duplicate byte-strings: last one wins.
pub fn load_tiktoken_model(path: impl AsRef<Path>) -> Result<FxHashMap<Vec<u8>, TokenId>, Error> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut encoder: FxHashMap<Vec<u8>, TokenId> = FxHashMap::default();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(raw), Some(rank_str)) = (fields.next(), fields.next()) else {
            continue;
        };
        if fields.next().is_some() {
            continue;
        }

        let bytes = BASE64.decode(raw).map_err(|e| Error::InvalidModel {
            path: path.to_path_buf(),
            reason: format!("invalid base64 {raw:?}: {e}"),
        })?;
        let rank: TokenId = rank_str.parse().map_err(|e| Error::InvalidModel {
            path: path.to_path_buf(),
            reason: format!("invalid rank {rank_str:?}: {e}"),
        })?;
        encoder.insert(bytes, rank);
    }

    if encoder.is_empty() {
        return Err(Error::EmptyModel {
            path: path.to_path_buf(),
        });
    }
    Ok(encoder)
}

/// Same parse as [`load_tiktoken_model`], additionally rejecting an artifact
/// missing one or more of the 256 single-byte ranks ([`Error::InvalidModel`]).
/// Used by the Kimi load path (spec §4.3 option (a)), where BPE must always
/// be able to terminate on a token present in the table.
pub fn load_tiktoken_model_complete(
    path: impl AsRef<Path>,
) -> Result<FxHashMap<Vec<u8>, TokenId>, Error> {
    let path = path.as_ref();
    let encoder = load_tiktoken_model(path)?;
    if !crate::byte_string::all_single_bytes_present(&encoder) {
        return Err(Error::InvalidModel {
            path: path.to_path_buf(),
            reason: "missing one or more of the 256 single-byte tokens".to_string(),
        });
    }
    Ok(encoder)
}

/// Read and parse a `tokenizer_config.json` file.
pub fn load_tokenizer_config(path: impl AsRef<Path>) -> Result<serde_json::Value, Error> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| Error::InvalidJson {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Build the reserved special-token map for ids `[base_count, base_count +
/// 256)` from a parsed `tokenizer_config.json` value.
///
/// For each id, `added_tokens_decoder[id]["content"]` is used if present;
/// otherwise the default literal `"<|reserved_token_<id>|>"` is used.
pub fn build_special_tokens(
    config: &serde_json::Value,
    base_count: TokenId,
) -> Result<FxHashMap<String, TokenId>, Error> {
    let decoder = config.get("added_tokens_decoder");
    if let Some(value) = decoder {
        if !value.is_object() && !value.is_null() {
            return Err(Error::InvalidSpecialTokens {
                reason: "added_tokens_decoder must be an object".to_string(),
            });
        }
    }

    let mut contents: StdHashMap<TokenId, String> = StdHashMap::new();
    if let Some(obj) = decoder.and_then(|v| v.as_object()) {
        for (key, entry) in obj {
            let id: TokenId = key.parse().map_err(|_| Error::InvalidSpecialTokens {
                reason: format!("non-numeric added_tokens_decoder key: {key:?}"),
            })?;
            let content = entry.get("content").and_then(|c| c.as_str());
            if let Some(content) = content {
                contents.insert(id, content.to_string());
            }
        }
    }

    let mut result = FxHashMap::default();
    for id in base_count..base_count + 256 {
        let content = contents
            .remove(&id)
            .unwrap_or_else(|| format!("<|reserved_token_{id}|>"));
        result.insert(content, id);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_well_formed_model_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SGVsbG8= 0").unwrap();
        writeln!(file, "IQ== 1").unwrap();
        let encoder = load_tiktoken_model(file.path()).unwrap();
        assert_eq!(encoder.get(&b"Hello".to_vec()), Some(&0));
        assert_eq!(encoder.get(&b"!".to_vec()), Some(&1));
    }

    #[test]
    fn malformed_lines_are_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SGVsbG8= 0").unwrap();
        writeln!(file, "this line has three fields here").unwrap();
        writeln!(file, "onlyonefield").unwrap();
        let encoder = load_tiktoken_model(file.path()).unwrap();
        assert_eq!(encoder.len(), 1);
    }

    #[test]
    fn duplicate_byte_strings_last_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SGVsbG8= 0").unwrap();
        writeln!(file, "SGVsbG8= 5").unwrap();
        let encoder = load_tiktoken_model(file.path()).unwrap();
        assert_eq!(encoder.get(&b"Hello".to_vec()), Some(&5));
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            load_tiktoken_model(file.path()),
            Err(Error::EmptyModel { .. })
        ));
    }

    #[test]
    fn invalid_base64_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not-valid-base64!! 0").unwrap();
        assert!(matches!(
            load_tiktoken_model(file.path()),
            Err(Error::InvalidModel { .. })
        ));
    }

    fn write_all_single_bytes(file: &mut tempfile::NamedTempFile) {
        for b in 0u16..256 {
            writeln!(file, "{} {}", BASE64.encode([b as u8]), b).unwrap();
        }
    }

    #[test]
    fn complete_model_with_all_single_bytes_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write_all_single_bytes(&mut file);
        let encoder = load_tiktoken_model_complete(file.path()).unwrap();
        assert_eq!(encoder.len(), 256);
    }

    #[test]
    fn incomplete_model_missing_a_single_byte_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SGVsbG8= 300").unwrap();
        assert!(matches!(
            load_tiktoken_model_complete(file.path()),
            Err(Error::InvalidModel { .. })
        ));
    }

    #[test]
    fn load_tokenizer_config_parses_valid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"added_tokens_decoder": {{}}}}"#).unwrap();
        let config = load_tokenizer_config(file.path()).unwrap();
        assert!(config.get("added_tokens_decoder").is_some());
    }

    #[test]
    fn load_tokenizer_config_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{not valid json").unwrap();
        assert!(matches!(
            load_tokenizer_config(file.path()),
            Err(Error::InvalidJson { .. })
        ));
    }

    #[test]
    fn build_special_tokens_uses_configured_content_then_default() {
        let config: serde_json::Value = serde_json::json!({
            "added_tokens_decoder": {
                "100": {"content": "<|im_start|>"},
            }
        });
        let specials = build_special_tokens(&config, 100).unwrap();
        assert_eq!(specials.get("<|im_start|>"), Some(&100));
        assert_eq!(specials.get("<|reserved_token_101|>"), Some(&101));
        assert_eq!(specials.len(), 256);
    }

    #[test]
    fn build_special_tokens_rejects_non_numeric_keys() {
        let config: serde_json::Value = serde_json::json!({
            "added_tokens_decoder": { "not-a-number": {"content": "x"} }
        });
        assert!(matches!(
            build_special_tokens(&config, 0),
            Err(Error::InvalidSpecialTokens { .. })
        ));
    }

    #[test]
    fn build_special_tokens_tolerates_missing_section() {
        let config: serde_json::Value = serde_json::json!({});
        let specials = build_special_tokens(&config, 0).unwrap();
        assert_eq!(specials.len(), 256);
        assert_eq!(specials.get("<|reserved_token_0|>"), Some(&0));
    }

    #[test]
    fn local_path_source_resolves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("repo").join("main");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("tiktoken.model"), "SGVsbG8= 0\n").unwrap();

        let source = LocalPathSource::new(dir.path());
        let resolved = source.resolve("repo", "main", "tiktoken.model").unwrap();
        assert!(resolved.ends_with("repo/main/tiktoken.model"));
    }

    #[test]
    fn local_path_source_errors_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalPathSource::new(dir.path());
        assert!(source.resolve("repo", "main", "missing").is_err());
    }
}
