use crate::config::SimConfig;
use crate::stats::Statistics;

/// Renders the end-of-run report: the configuration block followed by the
/// results block
///
/// Rates are percentages at one decimal, the average access time is printed
/// at four decimals. The underlying values come straight from `Statistics`
pub fn render(config: &SimConfig, stats: &Statistics) -> String {
    format!(
        "--CONFIGURATION----------------------------------------------------------------\n\
         \n\
         Write policy: {write_policy}\n\
         Line size: {line_size} bytes\n\
         Associativity: {associativity}\n\
         Replacement policy: {replacement_policy}\n\
         Hit time: {hit_latency} ns\n\
         Memory read time: {read_latency} ns\n\
         Memory write time: {write_latency} ns\n\
         \n\
         --RESULTS----------------------------------------------------------------------\n\
         \n\
         Reads: {total_reads}\n\
         Writes: {total_writes}\n\
         Main memory reads: {memory_reads}\n\
         Main memory writes: {memory_writes}\n\
         Read hit rate: {read_hit_rate:.1}%\n\
         Write hit rate: {write_hit_rate:.1}%\n\
         Global hit rate: {global_hit_rate:.1}%\n\
         Average access time: {amat:.4} ns\n",
        write_policy = config.write_policy,
        line_size = config.line_size,
        associativity = config.associativity,
        replacement_policy = config.replacement_policy,
        hit_latency = config.hit_latency,
        read_latency = config.read_latency,
        write_latency = config.write_latency,
        total_reads = stats.total_reads,
        total_writes = stats.total_writes,
        memory_reads = stats.memory_reads,
        memory_writes = stats.memory_writes,
        read_hit_rate = stats.read_hit_rate() * 100.0,
        write_hit_rate = stats.write_hit_rate() * 100.0,
        global_hit_rate = stats.global_hit_rate() * 100.0,
        amat = stats.amat(config),
    )
}
