//! Board configuration and the immutable public parameter set.

use core::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default domain-separation tag for structure digests and proof bindings.
pub const DEFAULT_DOMAIN: &str = "board.r1cs.v1";

/// User-facing configuration, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Keep constraint annotations and variable names
    pub annotations: bool,
    /// Domain-separation tag mixed into digests
    pub domain: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            annotations: true,
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

impl BoardConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }
}

/// Public parameters for one field, constructed once and shared by every
/// board built over that field.
#[derive(Debug, Clone)]
pub struct Params<F: PrimeField> {
    config: BoardConfig,
    modulus: &'static str,
    num_bits: u32,
    _field: PhantomData<F>,
}

impl<F: PrimeField> Params<F> {
    pub fn new(config: BoardConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            modulus: F::MODULUS,
            num_bits: F::NUM_BITS,
            _field: PhantomData,
        })
    }

    pub fn with_defaults() -> Arc<Self> { Self::new(BoardConfig::default()) }

    #[inline]
    pub fn config(&self) -> &BoardConfig { &self.config }

    #[inline]
    pub fn annotations(&self) -> bool { self.config.annotations }

    #[inline]
    pub fn domain(&self) -> &[u8] { self.config.domain.as_bytes() }

    /// Field modulus as published by the field implementation (hex string).
    #[inline]
    pub fn modulus(&self) -> &'static str { self.modulus }

    #[inline]
    pub fn num_bits(&self) -> u32 { self.num_bits }
}
