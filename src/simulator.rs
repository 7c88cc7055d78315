use std::io::BufRead;
use std::time::{Duration, Instant};

use log::debug;

use crate::cache::{Cache, CacheAccess, GenericCache};
use crate::config::{ReplacementPolicyConfig, SimConfig, WritePolicy};
use crate::error::SimError;
use crate::replacement_policies::{LeastRecentlyUsed, RandomReplacement};
use crate::stats::Statistics;
use crate::trace::parse_trace_line;

/// Replays an access trace against one configured cache and collects results
///
/// The simulator owns the cache and the statistics for the whole run; batch
/// callers construct one independent simulator per trace. It supports calling
/// simulate multiple times, and will update the time taken to simulate and
/// the results accordingly
pub struct Simulator {
    cache: GenericCache,
    write_policy: WritePolicy,
    stats: Statistics,
    skipped_lines: u64,
    simulation_time: Duration,
}

impl Simulator {
    /// Creates a new simulator for a given configuration
    ///
    /// Validates the geometry and allocates the line arena up front, so no
    /// error can interrupt a run once it starts
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, usually resulting from parsing JSON
    ///
    /// returns: Result<Simulator, SimError>
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        let geometry = config.geometry()?;
        let cache = match config.replacement_policy {
            ReplacementPolicyConfig::Random => GenericCache::from(Cache::new(
                &geometry,
                config.write_policy,
                RandomReplacement::new(config.seed),
            )?),
            ReplacementPolicyConfig::LeastRecentlyUsed => GenericCache::from(Cache::new(
                &geometry,
                config.write_policy,
                LeastRecentlyUsed::default(),
            )?),
        };
        Ok(Self {
            cache,
            write_policy: config.write_policy,
            stats: Statistics::default(),
            skipped_lines: 0,
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Streams a trace through the cache, strictly in input order
    ///
    /// Lines that don't parse are skipped without touching any counter; a
    /// failing trace source aborts the run and no statistics are emitted
    ///
    /// # Arguments
    ///
    /// * `reader`: The trace source, consumed line by line
    ///
    /// returns: Result<(), SimError>
    pub fn simulate(&mut self, reader: impl BufRead) -> Result<(), SimError> {
        let start = Instant::now();
        for line in reader.lines() {
            let line = line?;
            match parse_trace_line(&line) {
                Some(entry) => {
                    self.cache
                        .access(entry.address, entry.operation, &mut self.stats);
                }
                None => {
                    debug!("skipping malformed trace line: {line:?}");
                    self.skipped_lines += 1;
                }
            }
        }
        self.simulation_time += start.elapsed();
        Ok(())
    }

    /// The end-of-run sweep: writes every remaining dirty line back to memory
    ///
    /// Only write-back caches carry dirty lines, so this does nothing under
    /// write-through. Flushed lines are marked clean, which makes a repeated
    /// call a no-op
    pub fn flush(&mut self) {
        if self.write_policy == WritePolicy::WriteBack {
            self.cache.flush(&mut self.stats);
        }
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Gets the wall-clock execution time for processing
    pub fn execution_time(&self) -> Duration {
        self.simulation_time
    }

    /// The number of trace lines that failed to parse and were skipped
    pub fn skipped_lines(&self) -> u64 {
        self.skipped_lines
    }

    /// Gets the number of cache lines never filled. Useful for analysing
    /// cache performance or debugging
    pub fn uninitialised_lines(&self) -> usize {
        self.cache.uninitialised_lines()
    }

    /// The number of valid lines still awaiting write-back
    pub fn dirty_lines(&self) -> usize {
        self.cache.dirty_lines()
    }
}
