//! simat-str - String Model and Preprocessing
//!
//! Every input to simat becomes an [`HString`]: an immutable sequence of
//! symbols with an optional numeric label, an optional source tag and a
//! cached 64-bit content hash. A symbol is either a raw byte (byte form) or
//! a 64-bit token identifier produced by splitting on a delimiter set
//! (token form). Measures only ever see the symbol-access triple
//! `len` / `sym` / `sym_eq`, so they work on both forms without knowing
//! which one they got.
//!
//! The [`preproc`] module turns raw byte strings into their canonical form:
//! escape decoding, case folding, optional Soundex encoding, tokenization,
//! stop-token removal and reversal, applied in that fixed order. After
//! preprocessing an `HString` never changes again.

pub mod hstring;
pub mod preproc;
pub mod soundex;

pub use hstring::{Form, HString};
pub use preproc::{Preproc, PreprocConfig};
