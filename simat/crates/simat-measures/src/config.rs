//! Measure configuration structures.
//!
//! One struct per measure subsection, all with serde defaults, so a config
//! file only needs the knobs it actually changes. The top-level
//! [`MeasuresConfig`] mirrors the `measures.*` group of the config file.

use serde::{Deserialize, Serialize};

use crate::norm::{KernNorm, Norm};

/// The `measures.*` configuration group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasuresConfig {
    /// Canonical name of the selected measure.
    #[serde(rename = "type", default = "default_measure")]
    pub measure: String,

    /// Memoize whole-pair results across the matrix.
    #[serde(default)]
    pub global_cache: bool,

    /// Value-cache capacity in entries.
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    #[serde(default)]
    pub dist_levenshtein: EditCosts,
    #[serde(default)]
    pub dist_osa: OsaCosts,
    #[serde(default)]
    pub dist_hamming: HammingConfig,
    #[serde(default)]
    pub dist_lee: LeeConfig,
    #[serde(default)]
    pub dist_jarowinkler: JaroWinklerConfig,
    #[serde(default)]
    pub dist_compression: CompressionConfig,
    #[serde(default)]
    pub dist_bag: BagConfig,
    #[serde(default)]
    pub kern_spectrum: SpectrumConfig,
    #[serde(default)]
    pub kern_wdegree: WdegreeConfig,
    #[serde(default)]
    pub kern_subsequence: SubsequenceConfig,
    #[serde(default)]
    pub dist_kernel: KernelDistConfig,
}

impl Default for MeasuresConfig {
    fn default() -> Self {
        Self {
            measure: default_measure(),
            global_cache: false,
            cache_size: default_cache_size(),
            dist_levenshtein: EditCosts::default(),
            dist_osa: OsaCosts::default(),
            dist_hamming: HammingConfig::default(),
            dist_lee: LeeConfig::default(),
            dist_jarowinkler: JaroWinklerConfig::default(),
            dist_compression: CompressionConfig::default(),
            dist_bag: BagConfig::default(),
            kern_spectrum: SpectrumConfig::default(),
            kern_wdegree: WdegreeConfig::default(),
            kern_subsequence: SubsequenceConfig::default(),
            dist_kernel: KernelDistConfig::default(),
        }
    }
}

fn default_measure() -> String {
    "dist_levenshtein".to_string()
}

fn default_cache_size() -> usize {
    1 << 20
}

fn one() -> f32 {
    1.0
}

/// Cost knobs shared by the plain edit distances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditCosts {
    #[serde(default)]
    pub norm: Norm,
    #[serde(default = "one")]
    pub cost_ins: f32,
    #[serde(default = "one")]
    pub cost_del: f32,
    #[serde(default = "one")]
    pub cost_sub: f32,
}

impl Default for EditCosts {
    fn default() -> Self {
        Self {
            norm: Norm::None,
            cost_ins: 1.0,
            cost_del: 1.0,
            cost_sub: 1.0,
        }
    }
}

/// Edit costs plus the transposition cost for the restricted
/// Damerau-Levenshtein (optimal string alignment) distance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OsaCosts {
    #[serde(default)]
    pub norm: Norm,
    #[serde(default = "one")]
    pub cost_ins: f32,
    #[serde(default = "one")]
    pub cost_del: f32,
    #[serde(default = "one")]
    pub cost_sub: f32,
    #[serde(default = "one")]
    pub cost_tra: f32,
}

impl Default for OsaCosts {
    fn default() -> Self {
        Self {
            norm: Norm::None,
            cost_ins: 1.0,
            cost_del: 1.0,
            cost_sub: 1.0,
            cost_tra: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HammingConfig {
    #[serde(default)]
    pub norm: Norm,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeeConfig {
    #[serde(default)]
    pub norm: Norm,
    /// Size of the modular alphabet.
    #[serde(default = "default_alph")]
    pub alph: u64,
}

fn default_alph() -> u64 {
    256
}

impl Default for LeeConfig {
    fn default() -> Self {
        Self {
            norm: Norm::None,
            alph: default_alph(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JaroWinklerConfig {
    /// Maximum shared prefix length rewarded by the Winkler scaling.
    #[serde(default = "default_prefix_len")]
    pub prefix_len: usize,
    /// Winkler prefix weight.
    #[serde(default = "default_scaling")]
    pub scaling: f32,
}

fn default_prefix_len() -> usize {
    4
}

fn default_scaling() -> f32 {
    0.1
}

impl Default for JaroWinklerConfig {
    fn default() -> Self {
        Self {
            prefix_len: default_prefix_len(),
            scaling: default_scaling(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompressionConfig {
    /// zlib compression level, 1-9.
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    9
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BagConfig {
    #[serde(default)]
    pub norm: Norm,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpectrumConfig {
    /// k-gram order.
    #[serde(default = "default_gram_len")]
    pub length: usize,
    #[serde(default)]
    pub norm: KernNorm,
}

fn default_gram_len() -> usize {
    3
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            length: default_gram_len(),
            norm: KernNorm::None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WdegreeConfig {
    /// Maximum block length considered.
    #[serde(default = "default_degree")]
    pub degree: usize,
    #[serde(default)]
    pub norm: KernNorm,
}

fn default_degree() -> usize {
    3
}

impl Default for WdegreeConfig {
    fn default() -> Self {
        Self {
            degree: default_degree(),
            norm: KernNorm::None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubsequenceConfig {
    /// Subsequence length.
    #[serde(default = "default_gram_len")]
    pub length: usize,
    /// Gap decay factor in `(0, 1]`.
    #[serde(default = "default_decay")]
    pub decay: f32,
    #[serde(default)]
    pub norm: KernNorm,
}

fn default_decay() -> f32 {
    0.75
}

impl Default for SubsequenceConfig {
    fn default() -> Self {
        Self {
            length: default_gram_len(),
            decay: default_decay(),
            norm: KernNorm::None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KernelDistConfig {
    /// Name of the kernel backing the distance.
    #[serde(default = "default_kern")]
    pub kern: String,
    #[serde(default)]
    pub norm: Norm,
    /// Skip the final square root.
    #[serde(default)]
    pub squared: bool,
}

fn default_kern() -> String {
    "kern_wdegree".to_string()
}

impl Default for KernelDistConfig {
    fn default() -> Self {
        Self {
            kern: default_kern(),
            norm: Norm::None,
            squared: false,
        }
    }
}
