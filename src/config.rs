use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A configuration for a single simulation run
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    pub write_policy: WritePolicy,
    #[serde(default = "ReplacementPolicyConfig::default")]
    pub replacement_policy: ReplacementPolicyConfig,
    pub total_size: u64,
    pub line_size: u64,
    pub associativity: u64,
    #[serde(default = "default_hit_latency")]
    pub hit_latency: u64,
    #[serde(default = "default_memory_latency")]
    pub read_latency: u64,
    #[serde(default = "default_memory_latency")]
    pub write_latency: u64,
    /// Pins the eviction sequence of the random replacement policy, so runs
    /// can be reproduced exactly
    #[serde(default)]
    pub seed: Option<u64>,
}

// Latency defaults in nanoseconds
fn default_hit_latency() -> u64 {
    5
}

fn default_memory_latency() -> u64 {
    70
}

/// The write policy - write-through or write-back
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WritePolicy {
    #[serde(alias = "wt", alias = "write_through")]
    WriteThrough,
    #[serde(alias = "wb", alias = "write_back")]
    WriteBack,
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePolicy::WriteThrough => write!(f, "Write-through"),
            WritePolicy::WriteBack => write!(f, "Write-back"),
        }
    }
}

/// The replacement policy - random or lru. Defaults to lru.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacementPolicyConfig {
    #[serde(alias = "random")]
    Random,
    #[serde(alias = "lru")]
    LeastRecentlyUsed,
}

impl Default for ReplacementPolicyConfig {
    fn default() -> Self {
        ReplacementPolicyConfig::LeastRecentlyUsed
    }
}

impl fmt::Display for ReplacementPolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementPolicyConfig::Random => write!(f, "Random"),
            ReplacementPolicyConfig::LeastRecentlyUsed => write!(f, "LRU"),
        }
    }
}

/// The shape of the cache derived from a validated configuration
///
/// The index and offset arithmetic in the cache assumes the power-of-two
/// requirements checked here, so a `Geometry` can only be obtained through
/// [`SimConfig::geometry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub num_sets: u64,
    pub associativity: usize,
    pub offset_bits: u32,
    pub index_bits: u32,
}

impl Geometry {
    pub fn total_lines(&self) -> u64 {
        self.num_sets * self.associativity as u64
    }
}

impl SimConfig {
    /// Validates the configured sizes and derives the set count and the bit
    /// widths used for address decomposition
    ///
    /// # Arguments
    ///
    /// returns: Result<Geometry, ConfigError>
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        for (name, value) in [
            ("total_size", self.total_size),
            ("line_size", self.line_size),
            ("associativity", self.associativity),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroDimension(name));
            }
        }
        if !self.line_size.is_power_of_two() {
            return Err(ConfigError::LineSizeNotPowerOfTwo(self.line_size));
        }
        let set_bytes = self
            .line_size
            .checked_mul(self.associativity)
            .ok_or(ConfigError::TooLarge)?;
        if self.total_size % set_bytes != 0 {
            return Err(ConfigError::NotDivisible {
                total: self.total_size,
                line_size: self.line_size,
                associativity: self.associativity,
            });
        }
        let num_sets = self.total_size / set_bytes;
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::SetCountNotPowerOfTwo(num_sets));
        }
        let offset_bits = self.line_size.trailing_zeros();
        let index_bits = num_sets.trailing_zeros();
        if offset_bits + index_bits >= u64::BITS {
            return Err(ConfigError::TooLarge);
        }
        let associativity =
            usize::try_from(self.associativity).map_err(|_| ConfigError::TooLarge)?;
        Ok(Geometry {
            num_sets,
            associativity,
            offset_bits,
            index_bits,
        })
    }
}
