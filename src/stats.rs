use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// The raw counters of one simulation run
///
/// Zero-initialised when the run starts, mutated only by the access engine
/// and the final flush, and read-only once the run completes. Owned by its
/// `Simulator`; independent runs never share an instance
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_reads: u64,
    pub total_writes: u64,
    pub read_hits: u64,
    pub write_hits: u64,
    pub memory_reads: u64,
    pub memory_writes: u64,
}

impl Statistics {
    pub fn total_accesses(&self) -> u64 {
        self.total_reads + self.total_writes
    }

    pub fn read_hit_rate(&self) -> f64 {
        ratio(self.read_hits, self.total_reads)
    }

    pub fn write_hit_rate(&self) -> f64 {
        ratio(self.write_hits, self.total_writes)
    }

    pub fn global_hit_rate(&self) -> f64 {
        ratio(self.read_hits + self.write_hits, self.total_accesses())
    }

    pub fn miss_rate(&self) -> f64 {
        1.0 - self.global_hit_rate()
    }

    /// Average time spent in backing memory, charged per access
    ///
    /// The denominator is the total access count, not the number of memory
    /// operations
    pub fn avg_memory_time(&self, config: &SimConfig) -> f64 {
        let total = self.total_accesses();
        if total == 0 {
            return 0.0;
        }
        let memory_time =
            self.memory_reads * config.read_latency + self.memory_writes * config.write_latency;
        memory_time as f64 / total as f64
    }

    /// Average memory access time: hits at the hit latency, misses at the
    /// per-access memory time
    pub fn amat(&self, config: &SimConfig) -> f64 {
        self.global_hit_rate() * config.hit_latency as f64
            + self.miss_rate() * self.avg_memory_time(config)
    }

    /// Snapshots the counters together with the derived metrics
    pub fn result(&self, config: &SimConfig) -> SimulationResult {
        SimulationResult {
            total_reads: self.total_reads,
            total_writes: self.total_writes,
            read_hits: self.read_hits,
            write_hits: self.write_hits,
            memory_reads: self.memory_reads,
            memory_writes: self.memory_writes,
            read_hit_rate: self.read_hit_rate(),
            write_hit_rate: self.write_hit_rate(),
            global_hit_rate: self.global_hit_rate(),
            avg_memory_time: self.avg_memory_time(config),
            amat: self.amat(config),
        }
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// The result of a cache simulation. Can be serialised to the required output
/// format
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub total_reads: u64,
    pub total_writes: u64,
    pub read_hits: u64,
    pub write_hits: u64,
    pub memory_reads: u64,
    pub memory_writes: u64,
    pub read_hit_rate: f64,
    pub write_hit_rate: f64,
    pub global_hit_rate: f64,
    pub avg_memory_time: f64,
    pub amat: f64,
}
