use std::ops::Range;

use crate::config::{Geometry, WritePolicy};
use crate::error::SimError;
use crate::replacement_policies::{LeastRecentlyUsed, RandomReplacement, ReplacementPolicy};
use crate::stats::Statistics;

/// The two operations a trace record can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// The bookkeeping state of one cache line
///
/// A line is owned by exactly one set and never moves between sets. `dirty`
/// is only ever set on a valid line, and never under write-through. `recency`
/// carries the access stamp of the last touch; it is only meaningful under
/// lru replacement
#[derive(Debug, Clone, Copy, Default)]
pub struct Line {
    pub valid: bool,
    pub tag: u64,
    pub dirty: bool,
    pub recency: u64,
}

/// A generic trait for caches
///
/// Technically not required as we're using static dispatch to speed things up
/// instead of dyn Cache, but this gives flexibility for the future with no
/// overhead
pub trait CacheAccess {
    /// Splits an address into its tag and set index
    ///
    /// Pure: the same address always decodes to the same pair for one cache.
    /// The power-of-two geometry the shift/mask arithmetic relies on is
    /// guaranteed by configuration validation
    ///
    /// # Arguments
    ///
    /// * `address`:
    ///
    /// returns: (u64, u64), the tag and the set index
    fn decode(&self, address: u64) -> (u64, u64);

    /// Applies one access, returning true on a hit and false otherwise
    ///
    /// On both hits and misses the implementation must update line state,
    /// recency stamps, and every counter the access touches
    ///
    /// # Arguments
    ///
    /// * `address`: The byte address of the access
    /// * `operation`: Read or Write
    /// * `stats`: The counters for the current run
    ///
    /// returns: bool
    fn access(&mut self, address: u64, operation: Operation, stats: &mut Statistics) -> bool;

    /// Writes every dirty line back to memory, charging one memory write per
    /// line. Clears the dirty bits it flushes, so a second sweep is a no-op
    fn flush(&mut self, stats: &mut Statistics);

    /// Gets the number of uninitialised cache lines. Useful for analysing
    /// cache performance or debugging
    fn uninitialised_lines(&self) -> usize;

    /// Gets the number of valid lines still awaiting write-back
    fn dirty_lines(&self) -> usize;
}

/// Finds the way holding `tag` within one set, scanning from way 0 upward
///
/// At most one valid line per set can hold a given tag, so the first match
/// is the only match
pub(crate) fn find_line(set: &[Line], tag: u64) -> Option<usize> {
    set.iter().position(|line| line.valid && line.tag == tag)
}

/// A single-level set-associative cache, parameterised by a replacement policy
///
/// The general approach here is to have one solid implementation which is easy
/// to maintain and expand with more replacement policies without compromising
/// too much on performance; monomorphisation and inlining of the policy keep
/// the cost close to hand-specialised implementations
///
/// The lines live in one contiguous arena, set-major, so set `s` owns the
/// slice `[s * associativity, (s + 1) * associativity)`
pub struct Cache<R: ReplacementPolicy> {
    write_policy: WritePolicy,
    lines: Vec<Line>,
    num_sets: u64,
    associativity: usize,
    offset_bits: u32,
    index_bits: u32,
    // Stamp source for recency, incremented once per access, never reset
    accesses: u64,
    policy: R,
}

impl<R: ReplacementPolicy> Cache<R> {
    /// Builds the line arena for a validated geometry
    ///
    /// Either the whole arena is allocated or the reservation error is
    /// returned with nothing partially constructed
    pub fn new(geometry: &Geometry, write_policy: WritePolicy, policy: R) -> Result<Self, SimError> {
        let total_lines = geometry.total_lines();
        let capacity = usize::try_from(total_lines).map_err(|_| SimError::Resource {
            lines: total_lines,
        })?;
        let mut lines = Vec::new();
        lines.try_reserve_exact(capacity).map_err(|_| SimError::Resource {
            lines: total_lines,
        })?;
        lines.resize(capacity, Line::default());
        Ok(Self {
            write_policy,
            lines,
            num_sets: geometry.num_sets,
            associativity: geometry.associativity,
            offset_bits: geometry.offset_bits,
            index_bits: geometry.index_bits,
            accesses: 0,
            policy,
        })
    }

    fn set_range(&self, set_index: u64) -> Range<usize> {
        let base = set_index as usize * self.associativity;
        base..base + self.associativity
    }
}

impl<R: ReplacementPolicy> CacheAccess for Cache<R> {
    fn decode(&self, address: u64) -> (u64, u64) {
        let set_index = (address >> self.offset_bits) & (self.num_sets - 1);
        let tag = address >> (self.offset_bits + self.index_bits);
        (tag, set_index)
    }

    fn access(&mut self, address: u64, operation: Operation, stats: &mut Statistics) -> bool {
        self.accesses += 1;
        let stamp = self.accesses;
        let (tag, set_index) = self.decode(address);
        let set = self.set_range(set_index);
        let hit = find_line(&self.lines[set.clone()], tag);

        match operation {
            Operation::Read => {
                stats.total_reads += 1;
                if let Some(way) = hit {
                    stats.read_hits += 1;
                    self.lines[set.start + way].recency = stamp;
                    return true;
                }
                stats.memory_reads += 1;
                let victim = self.policy.select_victim(&self.lines[set.clone()]);
                let line = &mut self.lines[set.start + victim];
                if line.valid && line.dirty && self.write_policy == WritePolicy::WriteBack {
                    stats.memory_writes += 1;
                }
                // A read miss installs the line clean under either write policy
                *line = Line {
                    valid: true,
                    tag,
                    dirty: false,
                    recency: stamp,
                };
                false
            }
            Operation::Write => {
                stats.total_writes += 1;
                if let Some(way) = hit {
                    stats.write_hits += 1;
                    let line = &mut self.lines[set.start + way];
                    match self.write_policy {
                        WritePolicy::WriteThrough => stats.memory_writes += 1,
                        WritePolicy::WriteBack => line.dirty = true,
                    }
                    line.recency = stamp;
                    return true;
                }
                stats.memory_reads += 1;
                let victim = self.policy.select_victim(&self.lines[set.clone()]);
                let line = &mut self.lines[set.start + victim];
                if line.valid && line.dirty && self.write_policy == WritePolicy::WriteBack {
                    stats.memory_writes += 1;
                }
                let dirty = match self.write_policy {
                    // Write-through stores immediately: the miss charges the
                    // fetch above and the store here
                    WritePolicy::WriteThrough => {
                        stats.memory_writes += 1;
                        false
                    }
                    WritePolicy::WriteBack => true,
                };
                *line = Line {
                    valid: true,
                    tag,
                    dirty,
                    recency: stamp,
                };
                false
            }
        }
    }

    fn flush(&mut self, stats: &mut Statistics) {
        // Arena order is set-major, so this sweeps sets and ways in index order
        for line in &mut self.lines {
            if line.valid && line.dirty {
                stats.memory_writes += 1;
                line.dirty = false;
            }
        }
    }

    fn uninitialised_lines(&self) -> usize {
        self.lines.iter().filter(|line| !line.valid).count()
    }

    fn dirty_lines(&self) -> usize {
        self.lines.iter().filter(|line| line.valid && line.dirty).count()
    }
}

/// Enum for the cache types provided by the library
///
/// Using trait objects in Rust reduces boilerplate, but it is completely
/// opaque to the compiler; we would be de-referencing once per trace record.
/// Branching on the concrete types instead lets the compiler inline the
/// policy into the access loop
pub enum GenericCache {
    Random(Cache<RandomReplacement>),
    LeastRecentlyUsed(Cache<LeastRecentlyUsed>),
}

impl From<Cache<RandomReplacement>> for GenericCache {
    fn from(value: Cache<RandomReplacement>) -> Self {
        Self::Random(value)
    }
}

impl From<Cache<LeastRecentlyUsed>> for GenericCache {
    fn from(value: Cache<LeastRecentlyUsed>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl CacheAccess for GenericCache {
    fn decode(&self, address: u64) -> (u64, u64) {
        match self {
            GenericCache::Random(c) => c.decode(address),
            GenericCache::LeastRecentlyUsed(c) => c.decode(address),
        }
    }

    fn access(&mut self, address: u64, operation: Operation, stats: &mut Statistics) -> bool {
        match self {
            GenericCache::Random(c) => c.access(address, operation, stats),
            GenericCache::LeastRecentlyUsed(c) => c.access(address, operation, stats),
        }
    }

    fn flush(&mut self, stats: &mut Statistics) {
        match self {
            GenericCache::Random(c) => c.flush(stats),
            GenericCache::LeastRecentlyUsed(c) => c.flush(stats),
        }
    }

    fn uninitialised_lines(&self) -> usize {
        match self {
            GenericCache::Random(c) => c.uninitialised_lines(),
            GenericCache::LeastRecentlyUsed(c) => c.uninitialised_lines(),
        }
    }

    fn dirty_lines(&self) -> usize {
        match self {
            GenericCache::Random(c) => c.dirty_lines(),
            GenericCache::LeastRecentlyUsed(c) => c.dirty_lines(),
        }
    }
}
