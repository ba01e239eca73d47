//! Normalization passes applied to every input string.
//!
//! The pipeline runs in a fixed order: decode `%XX` escapes, case-fold,
//! Soundex (optional), tokenize on the delimiter set (optional), drop stop
//! tokens, reverse. Each pass is a pure function on the string; whatever
//! the passes bake in is final, measures never re-normalize.
//!
//! Escape decoding is forgiving: a `%` that is not followed by two hex
//! digits stays in the output as a literal symbol.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use simat_util::hash::hash_bytes;

use crate::hstring::HString;
use crate::soundex::soundex_encode;

/// Preprocessing options, the `input.*` subset that shapes symbol content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreprocConfig {
    /// Decode URL-style `%XX` escapes in the input bytes.
    #[serde(default)]
    pub decode_escapes: bool,

    /// Fold ASCII letters to lowercase.
    #[serde(default)]
    pub case_fold: bool,

    /// Replace each alphabetic word with its 4-character Soundex code.
    #[serde(default)]
    pub soundex: bool,

    /// Delimiter characters for token form. Empty keeps byte form.
    ///
    /// The set itself may contain `%XX` escapes, so whitespace and other
    /// awkward characters can be configured: `"%20%0a,;"`.
    #[serde(default)]
    pub delim: String,

    /// Tokens to drop after tokenization, given as their surfaces.
    #[serde(default)]
    pub stopwords: Vec<String>,

    /// Reverse the symbol sequence.
    #[serde(default)]
    pub reverse: bool,
}

impl Default for PreprocConfig {
    fn default() -> Self {
        Self {
            decode_escapes: false,
            case_fold: false,
            soundex: false,
            delim: String::new(),
            stopwords: Vec::new(),
            reverse: false,
        }
    }
}

/// A compiled preprocessor: the config latched into lookup structures.
pub struct Preproc {
    decode_escapes: bool,
    case_fold: bool,
    soundex: bool,
    delim: Option<[bool; 256]>,
    stop: FxHashSet<u64>,
    reverse: bool,
}

impl Preproc {
    pub fn new(cfg: &PreprocConfig) -> Self {
        let delim = if cfg.delim.is_empty() {
            None
        } else {
            let mut map = [false; 256];
            for &b in decode_escapes(cfg.delim.as_bytes()).iter() {
                map[b as usize] = true;
            }
            Some(map)
        };

        // Stopwords are hashed the same way token surfaces are, after the
        // same case fold, so the filter matches what tokenization emits.
        let case_fold = cfg.case_fold;
        let stop = cfg
            .stopwords
            .iter()
            .map(|w| {
                if case_fold {
                    hash_bytes(&w.bytes().map(|b| b.to_ascii_lowercase()).collect::<Vec<_>>())
                } else {
                    hash_bytes(w.as_bytes())
                }
            })
            .collect();

        Self {
            decode_escapes: cfg.decode_escapes,
            case_fold,
            soundex: cfg.soundex,
            delim,
            stop,
            reverse: cfg.reverse,
        }
    }

    /// Whether this preprocessor produces token form.
    pub fn tokenizing(&self) -> bool {
        self.delim.is_some()
    }

    /// Run the pass pipeline on one string.
    ///
    /// Idempotent for a fixed configuration: a string that has already been
    /// through the pipeline is returned unchanged.
    pub fn apply(&self, mut s: HString) -> HString {
        if s.is_preprocessed() {
            return s;
        }

        if let Some(raw) = s.as_bytes() {
            let mut bytes = raw.to_vec();

            if self.decode_escapes {
                bytes = decode_escapes(&bytes);
            }
            if self.case_fold {
                for b in bytes.iter_mut() {
                    *b = b.to_ascii_lowercase();
                }
            }
            if self.soundex {
                bytes = soundex_encode(&bytes);
            }

            if let Some(delim) = &self.delim {
                let tokens = self.tokenize(&bytes, delim);
                s.replace_tokens(tokens);
            } else {
                s.replace_bytes(bytes);
            }
        }

        if self.reverse {
            s.reverse();
        }
        s.mark_preprocessed();
        s
    }

    fn tokenize(&self, bytes: &[u8], delim: &[bool; 256]) -> Vec<u64> {
        let mut tokens = Vec::new();
        let mut start = None;
        for (i, &b) in bytes.iter().enumerate() {
            if delim[b as usize] {
                if let Some(s) = start.take() {
                    self.push_token(&mut tokens, &bytes[s..i]);
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        if let Some(s) = start {
            self.push_token(&mut tokens, &bytes[s..]);
        }
        tokens
    }

    fn push_token(&self, tokens: &mut Vec<u64>, surface: &[u8]) {
        let id = hash_bytes(surface);
        if !self.stop.contains(&id) {
            tokens.push(id);
        }
    }
}

/// Decode URL-style `%XX` escapes; malformed escapes stay literal.
fn decode_escapes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(v) = bytes.get(i + 1..i + 3).and_then(hex_pair) {
                out.push(v);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn hex_pair(hex: &[u8]) -> Option<u8> {
    let hi = (hex[0] as char).to_digit(16)?;
    let lo = (hex[1] as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preproc(cfg: &PreprocConfig, raw: &str) -> HString {
        Preproc::new(cfg).apply(HString::new(raw.as_bytes().to_vec()))
    }

    #[test]
    fn default_config_keeps_bytes() {
        let s = preproc(&PreprocConfig::default(), "Hello");
        assert_eq!(s.as_bytes(), Some(&b"Hello"[..]));
        assert!(s.is_preprocessed());
    }

    #[test]
    fn case_fold_lowers_ascii_only() {
        let cfg = PreprocConfig {
            case_fold: true,
            ..Default::default()
        };
        let s = preproc(&cfg, "MiXeD 123 \u{00c4}");
        assert_eq!(s.as_bytes(), Some("mixed 123 \u{00c4}".as_bytes()));
    }

    #[test]
    fn escape_decoding_is_forgiving() {
        let cfg = PreprocConfig {
            decode_escapes: true,
            ..Default::default()
        };
        assert_eq!(preproc(&cfg, "a%20b").as_bytes(), Some(&b"a b"[..]));
        assert_eq!(preproc(&cfg, "100%").as_bytes(), Some(&b"100%"[..]));
        assert_eq!(preproc(&cfg, "%zz%41").as_bytes(), Some(&b"%zzA"[..]));
    }

    #[test]
    fn tokenization_skips_empty_tokens() {
        let cfg = PreprocConfig {
            delim: " ".into(),
            ..Default::default()
        };
        let s = preproc(&cfg, "  one   two  ");
        assert_eq!(s.len(), 2);

        let t = preproc(&cfg, "one two");
        assert_eq!(s.sym(0), t.sym(0));
        assert_eq!(s.sym(1), t.sym(1));
    }

    #[test]
    fn delimiter_set_supports_escapes() {
        let cfg = PreprocConfig {
            delim: "%20%2c".into(), // space and comma
            ..Default::default()
        };
        let s = preproc(&cfg, "a,b c");
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn equal_token_surfaces_share_one_identifier() {
        let cfg = PreprocConfig {
            delim: " ".into(),
            ..Default::default()
        };
        let s = preproc(&cfg, "ab cd ab");
        assert_eq!(s.len(), 3);
        assert_eq!(s.sym(0), s.sym(2));
        assert_ne!(s.sym(0), s.sym(1));
    }

    #[test]
    fn stopwords_are_dropped() {
        let cfg = PreprocConfig {
            delim: " ".into(),
            stopwords: vec!["the".into(), "a".into()],
            ..Default::default()
        };
        let s = preproc(&cfg, "the quick a fox");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn stopwords_respect_case_fold() {
        let cfg = PreprocConfig {
            case_fold: true,
            delim: " ".into(),
            stopwords: vec!["The".into()],
            ..Default::default()
        };
        let s = preproc(&cfg, "THE fox");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn reverse_flips_symbol_order() {
        let cfg = PreprocConfig {
            reverse: true,
            ..Default::default()
        };
        let s = preproc(&cfg, "abc");
        assert_eq!(s.as_bytes(), Some(&b"cba"[..]));
    }

    #[test]
    fn apply_is_idempotent() {
        let cfg = PreprocConfig {
            decode_escapes: true,
            case_fold: true,
            delim: " ".into(),
            reverse: true,
            ..Default::default()
        };
        let p = Preproc::new(&cfg);
        let once = p.apply(HString::new(b"A%2525 B c".to_vec()));
        let h = once.hash();
        let twice = p.apply(once);
        assert_eq!(twice.hash(), h);
    }

    #[quickcheck_macros::quickcheck]
    fn prop_apply_is_idempotent_on_arbitrary_bytes(data: Vec<u8>) -> bool {
        let cfg = PreprocConfig {
            decode_escapes: true,
            case_fold: true,
            delim: " %0a".into(),
            reverse: true,
            ..Default::default()
        };
        let p = Preproc::new(&cfg);
        let once = p.apply(HString::new(data.clone()));
        let h = once.hash();
        p.apply(once).hash() == h
    }

    #[quickcheck_macros::quickcheck]
    fn prop_byte_passes_preserve_no_delimiters(data: Vec<u8>) -> bool {
        // Without a delimiter set the string stays in byte form.
        let p = Preproc::new(&PreprocConfig {
            case_fold: true,
            ..Default::default()
        });
        p.apply(HString::new(data)).as_bytes().is_some()
    }

    #[test]
    fn trailing_delimiter_yields_no_empty_token() {
        let cfg = PreprocConfig {
            delim: ";".into(),
            ..Default::default()
        };
        assert_eq!(preproc(&cfg, "x;y;").len(), 2);
        assert_eq!(preproc(&cfg, ";;;").len(), 0);
    }
}
