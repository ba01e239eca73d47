//! Configuration loading for the simat CLI.
//!
//! The config file is a TOML document with three groups, mirroring the
//! pipeline: `input` (reader selection and preprocessing), `measures`
//! (measure selection and per-measure knobs), `output` (writer selection
//! and formatting). Every field has a default, so the file may configure
//! as little as a single knob.
//!
//! A malformed file is fatal. An unknown key is only a warning: the
//! parsed document is diffed against the re-serialized configuration and
//! every key path that did not land anywhere is reported.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use simat_io::{InputConfig, OutputConfig};
use simat_measures::MeasuresConfig;
use simat_str::PreprocConfig;

/// Complete configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputSection,

    #[serde(default)]
    pub measures: MeasuresConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Worker count; available parallelism when unset.
    #[serde(default)]
    pub num_threads: Option<usize>,
}

/// The `input.*` group: reader selection plus the preprocessing knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InputSection {
    /// Reader format (`dir`, `lines`, `archive`); inferred when empty.
    #[serde(default)]
    pub format: String,

    /// Regex extracting a numeric label from filenames / member names.
    #[serde(default)]
    pub decode_label: Option<String>,

    /// File with one stop token per line, merged into the stopword list.
    #[serde(default)]
    pub stopword_file: Option<PathBuf>,

    #[serde(flatten)]
    pub preproc: PreprocConfig,
}

impl Config {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let raw: toml::Value = text
            .parse()
            .with_context(|| format!("malformed config file {}", path.display()))?;

        let cfg: Config = raw
            .clone()
            .try_into()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;

        for key in unknown_keys(&raw, &cfg)? {
            tracing::warn!(config = %path.display(), key, "unknown configuration key");
        }
        Ok(cfg)
    }

    /// The reader-facing slice of the input section.
    pub fn reader_config(&self) -> InputConfig {
        InputConfig {
            format: self.input.format.clone(),
            decode_label: self.input.decode_label.clone(),
        }
    }
}

/// Key paths present in `raw` that the parsed config did not absorb.
///
/// The parsed config re-serializes with every known field present (absent
/// `Option`s excepted, but those were either in the file and parsed, or
/// not in the file at all), so a path found in the document but not in
/// the round-trip is unknown.
fn unknown_keys(raw: &toml::Value, cfg: &Config) -> Result<Vec<String>> {
    let known = toml::Value::try_from(cfg).context("configuration re-serialization failed")?;
    let mut unknown = Vec::new();
    walk("", raw, &known, &mut unknown);
    unknown.sort();
    Ok(unknown)
}

fn walk(prefix: &str, raw: &toml::Value, known: &toml::Value, out: &mut Vec<String>) {
    let (toml::Value::Table(raw_table), toml::Value::Table(known_table)) = (raw, known) else {
        return;
    };
    for (key, value) in raw_table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match known_table.get(key) {
            Some(known_value) => walk(&path, value, known_value, out),
            None => out.push(path),
        }
    }
}
