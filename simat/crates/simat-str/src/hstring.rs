//! The unified sequence type all measures operate on.

use std::borrow::Cow;
use std::sync::OnceLock;

use simat_util::hash::{hash_bytes, hash_symbols, mix3};

/// Representation of a preprocessed string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// One symbol per input byte.
    Bytes,
    /// One 64-bit identifier per token.
    Tokens,
}

/// Domain tags folded into the content hash so the two forms never collide.
const TAG_BYTES: u64 = 0x42;
const TAG_TOKENS: u64 = 0x54;

#[derive(Debug, Clone)]
enum Seq {
    Bytes(Vec<u8>),
    Tokens(Vec<u64>),
}

/// An input string in its canonical sequence form.
///
/// `HString` is created from raw bytes, carried through preprocessing once,
/// and then treated as immutable: length, label, source and symbol content
/// are fixed for the rest of the run. The content hash is computed lazily
/// on first use and covers the symbol sequence plus the form flag, nothing
/// else — two strings with equal post-preprocessing symbols hash equally
/// regardless of where they came from.
#[derive(Debug)]
pub struct HString {
    seq: Seq,
    label: Option<f32>,
    source: Option<String>,
    preprocessed: bool,
    hash: OnceLock<u64>,
}

impl HString {
    /// Wrap a raw byte sequence. Byte form, not yet preprocessed.
    pub fn new(raw: Vec<u8>) -> Self {
        Self {
            seq: Seq::Bytes(raw),
            label: None,
            source: None,
            preprocessed: false,
            hash: OnceLock::new(),
        }
    }

    /// Attach a numeric label.
    pub fn with_label(mut self, label: f32) -> Self {
        self.label = Some(label);
        self
    }

    /// Attach a source tag, e.g. a filename.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn label(&self) -> Option<f32> {
        self.label
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn form(&self) -> Form {
        match self.seq {
            Seq::Bytes(_) => Form::Bytes,
            Seq::Tokens(_) => Form::Tokens,
        }
    }

    /// Whether the preprocessor has run on this string.
    pub fn is_preprocessed(&self) -> bool {
        self.preprocessed
    }

    /// Length in symbols.
    #[inline]
    pub fn len(&self) -> usize {
        match &self.seq {
            Seq::Bytes(b) => b.len(),
            Seq::Tokens(t) => t.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbol at position `i`. Bytes are widened to `u64`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds, like slice indexing.
    #[inline]
    pub fn sym(&self, i: usize) -> u64 {
        match &self.seq {
            Seq::Bytes(b) => b[i] as u64,
            Seq::Tokens(t) => t[i],
        }
    }

    /// Symbol equality across two strings.
    ///
    /// Comparing a byte-form symbol against a token-form symbol is always
    /// false: the identifier domains are disjoint by construction of the
    /// preprocessor, and mixing forms in one matrix is rejected upstream.
    #[inline]
    pub fn sym_eq(&self, i: usize, other: &HString, j: usize) -> bool {
        self.form() == other.form() && self.sym(i) == other.sym(j)
    }

    /// 64-bit content hash, computed once and cached.
    pub fn hash(&self) -> u64 {
        *self.hash.get_or_init(|| match &self.seq {
            Seq::Bytes(b) => mix3(TAG_BYTES, hash_bytes(b), b.len() as u64),
            Seq::Tokens(t) => mix3(TAG_TOKENS, hash_symbols(t), t.len() as u64),
        })
    }

    /// The symbol sequence as raw bytes.
    ///
    /// Byte form borrows the backing storage; token form serializes each
    /// identifier little-endian. This is the view the compression measure
    /// feeds to its compressor.
    pub fn symbol_bytes(&self) -> Cow<'_, [u8]> {
        match &self.seq {
            Seq::Bytes(b) => Cow::Borrowed(b),
            Seq::Tokens(t) => {
                let mut out = Vec::with_capacity(t.len() * 8);
                for &id in t {
                    out.extend_from_slice(&id.to_le_bytes());
                }
                Cow::Owned(out)
            }
        }
    }

    /// Raw bytes of a byte-form string, if this is one.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.seq {
            Seq::Bytes(b) => Some(b),
            Seq::Tokens(_) => None,
        }
    }

    pub(crate) fn replace_bytes(&mut self, bytes: Vec<u8>) {
        debug_assert!(!self.preprocessed);
        self.seq = Seq::Bytes(bytes);
    }

    pub(crate) fn replace_tokens(&mut self, tokens: Vec<u64>) {
        debug_assert!(!self.preprocessed);
        self.seq = Seq::Tokens(tokens);
    }

    pub(crate) fn reverse(&mut self) {
        match &mut self.seq {
            Seq::Bytes(b) => b.reverse(),
            Seq::Tokens(t) => t.reverse(),
        }
    }

    pub(crate) fn mark_preprocessed(&mut self) {
        self.preprocessed = true;
    }
}

impl PartialEq for HString {
    fn eq(&self, other: &Self) -> bool {
        self.form() == other.form()
            && self.len() == other.len()
            && (0..self.len()).all(|i| self.sym(i) == other.sym(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_form_symbols_are_bytes() {
        let s = HString::new(b"abc".to_vec());
        assert_eq!(s.form(), Form::Bytes);
        assert_eq!(s.len(), 3);
        assert_eq!(s.sym(0), b'a' as u64);
        assert_eq!(s.sym(2), b'c' as u64);
    }

    #[test]
    fn hash_depends_on_content_only() {
        let a = HString::new(b"hello".to_vec()).with_label(1.0);
        let b = HString::new(b"hello".to_vec()).with_source("other.txt");
        assert_eq!(a.hash(), b.hash());

        let c = HString::new(b"hellp".to_vec());
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn hash_distinguishes_forms() {
        let mut toks = HString::new(Vec::new());
        toks.replace_tokens(vec![b'a' as u64, b'b' as u64]);
        let bytes = HString::new(b"ab".to_vec());
        assert_ne!(toks.hash(), bytes.hash());
        assert!(!bytes.sym_eq(0, &toks, 0));
    }

    #[test]
    fn empty_string_has_stable_hash() {
        let a = HString::new(Vec::new());
        let b = HString::new(Vec::new());
        assert_eq!(a.hash(), b.hash());
        assert!(a.is_empty());
    }

    #[test]
    fn symbol_bytes_roundtrips_token_ids() {
        let mut s = HString::new(Vec::new());
        s.replace_tokens(vec![1, 0x0102_0304_0506_0708]);
        let bytes = s.symbol_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..8], &1u64.to_le_bytes());
    }
}
