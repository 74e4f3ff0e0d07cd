//! Collatz Range Maxima
//! =========================================
//!
//! Problem
//! -------
//! Given an inclusive range bounded by two integers (in either order), find
//! the maximum Collatz cycle length among all integers in that range. The
//! cycle length of `n` is the number of steps, counting `n` itself as step 1,
//! for the sequence "halve if even, else triple and add one" to reach 1.
//! Queries arrive as whitespace-separated integer pairs on an input stream;
//! each answer is echoed as `i j max` on the output stream.
//!
//! Approach
//! --------
//! 1) Cycle-length computation ([`cycle_length`]):
//!    - A plain step-counting loop. Intermediates run in u64: even though
//!      query values stay below one million, the odd branch `3n + 1` can
//!      transiently climb past 56 billion inside that domain, which overflows
//!      a 32-bit counter.
//!
//! 2) Range evaluation with pruning ([`max_cycle_length`]):
//!    - Validate both bounds against the supported domain before touching
//!      any shared state, then resolve `low = min`, `high = max`.
//!    - Narrow the scan's lower end to `max(low, high/2 + 1)`. Every integer
//!      `k` below that pivot has `2k` inside `(high/2, high]`, and the cycle
//!      of `2k` is one step longer than the cycle of `k`, so the dropped
//!      prefix can never hold the range maximum. The upper bound of the scan
//!      stays `high`.
//!    - Scan the narrowed window through the cycle-length cache, tracking a
//!      running maximum initialized to 1.
//!
//! 3) Memoization ([`cache::CycleCache`]):
//!    - A dense write-once table over the whole supported domain, shared
//!      across queries for the life of the process. Overlapping and repeated
//!      ranges pay for each cycle length once.
//!
//! Correctness notes
//! -----------------
//! - The pruning step is validated against a brute-force full-range scan,
//!   exhaustively over a small domain, in this crate's tests. The halving
//!   argument above is inherited, not re-proven here.
//! - Query values outside `1..UPPER_BOUND` surface as a typed
//!   [`CollatzError::InvalidInput`] rather than a fault; the cache is never
//!   touched on the error path.
//! - A lone trailing integer at end of input is not a query: the loop stops
//!   without inventing a second bound.
//!
//! Performance notes
//! -----------------
//! - Build with release settings (opt-level=3, lto=thin, codegen-units=1).
//! - The binary's `--server` mode speaks a small line protocol so an external
//!   harness can drive hot-cache measurements; see [`run_server`].

use std::io::{self, BufRead, BufReader, Write};
use std::str::FromStr;
use std::time::Instant;

use thiserror::Error;

pub mod cache;

pub use cache::CycleCache;

/// Exclusive upper bound on valid query values.
pub const UPPER_BOUND: u32 = 1_000_000;

/// Domain validation failure for a range query.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CollatzError {
    /// A query value fell outside the supported domain.
    #[error("invalid query value {value}: must satisfy 1 <= value < {limit}")]
    InvalidInput { value: i64, limit: u32 },
}

/// Failures surfaced by the query loop.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Invalid(#[from] CollatzError),
    #[error("query stream i/o failure: {0}")]
    Io(#[from] io::Error),
}

//
// Cycle-length computation
//

/// Return the Collatz cycle length of `n`, counting `n` itself as step 1.
///
/// Pure; terminates for every `n` this crate accepts (a conjecture for the
/// integers at large, long since checked computationally far past our
/// domain cap).
#[inline]
pub fn cycle_length(n: u32) -> u32 {
    debug_assert!(n >= 1);
    let mut current = u64::from(n);
    let mut steps: u32 = 1;
    while current != 1 {
        if current.is_multiple_of(2) {
            current /= 2;
        } else {
            current = 3 * current + 1;
        }
        steps += 1;
    }
    steps
}

//
// Range evaluation with pruning
//

/// Find the maximum cycle length over the inclusive range bounded by `i` and
/// `j` (order irrelevant), memoizing per-value results in `cache`.
///
/// Both values must lie in `1..cache.limit()`; the first offender is reported
/// as [`CollatzError::InvalidInput`] before any cache access.
#[inline]
pub fn max_cycle_length(cache: &mut CycleCache, i: i64, j: i64) -> Result<u32, CollatzError> {
    let limit = cache.limit();
    for value in [i, j] {
        if value < 1 || value >= i64::from(limit) {
            return Err(CollatzError::InvalidInput { value, limit });
        }
    }

    let (low, high) = if i < j {
        (i as u32, j as u32)
    } else {
        (j as u32, i as u32)
    };

    // Anything below high/2 + 1 doubles into the kept window, one step short
    // of its double's cycle, so the scan can start at the pivot.
    let start = low.max(high / 2 + 1);

    let mut best: u32 = 1;
    for k in start..=high {
        let len = cache.get_or_compute(k, cycle_length);
        if len > best {
            best = len;
        }
    }
    Ok(best)
}

//
// Query loop
//

/// Byte-level integer scanner over a buffered reader.
///
/// Tokens are maximal runs of an optional sign followed by ASCII digits,
/// separated by whitespace. The first byte that fits neither role ends the
/// token stream, mirroring formatted-extraction failure semantics.
struct Tokens<R> {
    reader: R,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Next integer token, or `None` at end of input / first malformed byte.
    fn next_i64(&mut self) -> io::Result<Option<i64>> {
        // Skip whitespace, refilling across buffer boundaries.
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }
            let skipped = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
            let exhausted = skipped == buf.len();
            self.reader.consume(skipped);
            if !exhausted {
                break;
            }
        }

        let mut value: i64 = 0;
        let mut negative = false;
        let mut digits: u32 = 0;
        let mut leading = true;
        'scan: loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let mut used = 0;
            for &byte in buf {
                if leading && (byte == b'-' || byte == b'+') {
                    negative = byte == b'-';
                    leading = false;
                    used += 1;
                    continue;
                }
                leading = false;
                if byte.is_ascii_digit() {
                    // Saturate rather than wrap; anything this large is
                    // rejected by domain validation regardless.
                    value = value
                        .saturating_mul(10)
                        .saturating_add(i64::from(byte - b'0'));
                    digits += 1;
                    used += 1;
                } else {
                    self.reader.consume(used);
                    break 'scan;
                }
            }
            self.reader.consume(used);
        }

        if digits == 0 {
            return Ok(None);
        }
        Ok(Some(if negative { -value } else { value }))
    }
}

/// Drive the query loop: read integer pairs from `reader` until exhausted,
/// evaluate each through `cache`, and write `i j max` lines to `writer`.
///
/// A lone trailing integer ends the loop without evaluating. The first
/// out-of-domain value aborts the run with a typed error; partial output
/// written up to that point stays written.
pub fn solve<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    cache: &mut CycleCache,
) -> Result<(), SolveError> {
    let mut tokens = Tokens::new(reader);
    while let Some(i) = tokens.next_i64()? {
        let Some(j) = tokens.next_i64()? else {
            break;
        };
        let best = max_cycle_length(cache, i, j)?;
        writeln!(writer, "{i} {j} {best}")?;
    }
    writer.flush()?;
    Ok(())
}

//
// Line-protocol server used by the benchmark harness
//

/// Benchmark-harness server over stdin/stdout.
///
/// Protocol (one command per line):
/// - `INIT <i> <j>`: set the query range (must come first).
/// - `WARMUP <iters>`: run `iters` iterations without reporting a result.
/// - `RUN <iters>`: run `iters` iterations and print `OK <max> <acc> <nanos>`.
/// - `QUIT`: exit.
///
/// The `do_iters(i, j, iters)` closure does the full evaluation work and
/// returns the base range's maximum, an anti-elision accumulator, and the
/// elapsed nanoseconds.
pub fn run_server<F>(mut do_iters: F) -> io::Result<()>
where
    F: FnMut(u32, u32, u64) -> (Option<u32>, u64, u64),
{
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = BufReader::new(stdin.lock());
    let mut writer = io::BufWriter::new(stdout.lock());

    let mut line = String::new();
    let mut range = (1u32, 1u32);
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let mut fields = line.split_ascii_whitespace();
        match fields.next() {
            Some("INIT") => {
                let i = parse_field(fields.next())?;
                let j = parse_field(fields.next())?;
                range = (i, j);
                writeln!(writer, "OK")?;
                writer.flush()?;
            }
            Some("WARMUP") => {
                let iters: u64 = parse_field(fields.next())?;
                let _ = do_iters(range.0, range.1, iters);
                writeln!(writer, "OK")?;
                writer.flush()?;
            }
            Some("RUN") => {
                let iters: u64 = parse_field(fields.next())?;
                let (best, acc, nanos) = do_iters(range.0, range.1, iters);
                writeln!(writer, "OK {} {} {}", best.unwrap_or(0), acc, nanos)?;
                writer.flush()?;
            }
            Some("QUIT") => break,
            // Unknown or blank commands are ignored.
            _ => {}
        }
    }
    Ok(())
}

fn parse_field<T: FromStr>(field: Option<&str>) -> io::Result<T> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "malformed harness command"))
}

/// Evaluate `iters` queries against `[i, j]`, rotating the lower bound each
/// iteration so the run mixes cache hits with fresh work. Returns the base
/// range's maximum, the accumulator, and elapsed nanoseconds for the loop.
#[inline]
pub fn run_iters<F>(i: u32, j: u32, iters: u64, mut eval: F) -> (Option<u32>, u64, u64)
where
    F: FnMut(u32, u32) -> Option<u32>,
{
    let base = eval(i, j);

    let mut acc: u64 = 0;
    let mut counter: u64 = 0;
    let mut current = i;
    let start = Instant::now();

    for _ in 0..iters {
        if let Some(best) = eval(current, j) {
            acc += u64::from(best) + counter;
            counter += 1;
        }
        current = if current >= j { i } else { current + 1 };
    }

    let elapsed_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
    (base, acc, elapsed_ns)
}
