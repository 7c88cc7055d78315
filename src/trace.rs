use lazy_static::lazy_static;
use regex::Regex;

use crate::cache::Operation;

lazy_static! {
    // One hex address token (an optional 0x prefix is tolerated) followed by
    // a single R or W, nothing else on the line
    static ref TRACE_LINE: Regex =
        Regex::new(r"^\s*(?:0[xX])?([0-9a-fA-F]+)\s+([RW])\s*$").unwrap();
}

/// One record of the access trace. Consumed one at a time, never retained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    pub address: u64,
    pub operation: Operation,
}

/// Parses one line of a trace
///
/// Lines that don't match the `<hex-address> <op>` pattern yield `None` and
/// are skipped by the simulator without touching any statistic. Addresses
/// too wide for 64 bits are treated the same way
///
/// # Examples
///
/// ```
/// use amatsim::cache::Operation;
/// use amatsim::trace::parse_trace_line;
///
/// let entry = parse_trace_line("1f2a W").unwrap();
/// assert_eq!(entry.address, 0x1f2a);
/// assert_eq!(entry.operation, Operation::Write);
/// assert!(parse_trace_line("1f2a X").is_none());
/// ```
pub fn parse_trace_line(line: &str) -> Option<TraceEntry> {
    let captures = TRACE_LINE.captures(line)?;
    let address = u64::from_str_radix(&captures[1], 16).ok()?;
    let operation = if &captures[2] == "R" {
        Operation::Read
    } else {
        Operation::Write
    };
    Some(TraceEntry { address, operation })
}
