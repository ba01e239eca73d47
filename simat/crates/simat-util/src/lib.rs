//! simat-util - Foundation Utilities
//!
//! This crate provides the small, shared building blocks the rest of the
//! simat workspace is built on:
//!
//! - Deterministic 64-bit hashing of byte and symbol sequences, plus the
//!   fingerprint combiner used to key memoized pair values.
//! - A bounded, thread-safe value cache that maps 64-bit fingerprints to
//!   single floats. The cache is lossy by contract: callers treat it as a
//!   memo, never as a ledger.
//!
//! Both pieces are deliberately free of any knowledge about strings,
//! measures or matrices; higher crates decide what the hashes mean.

pub mod hash;
pub mod vcache;

pub use hash::{hash_bytes, hash_symbols, mix3, mix64, pair_fingerprint, string_fingerprint};
pub use vcache::{VCache, VCacheStats};
