use std::fmt;

/// Conditions that can be reported across a `Result` boundary.
///
/// Per the exchange's error model, only allocation/resource failure ever
/// takes this path. Usage errors (programmer bugs) abort loudly instead of
/// returning a `Result` — see [`fail_with_exception`]. "Expected empty" and
/// "limit reached" are not errors at all; they are ordinary `bool` returns.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// A paged memory resource refused to grow beyond its configured cap.
    #[error("paged memory resource exhausted: requested {requested} bytes, cap is {limit} bytes")]
    Allocation { requested: usize, limit: usize },
}

/// Abort loudly on a programmer error: a double-release, a writer/reader
/// identity mismatch, a negative partition count, or any other condition the
/// exchange cannot recover from by retrying.
///
/// Mirrors the C++ `fail_with_exception()` idiom used throughout the
/// original forward exchange for usage errors that are not meant to be
/// caught by callers.
#[track_caller]
pub fn fail_with_exception(reason: impl fmt::Display) -> ! {
    panic!("exchange usage error: {reason}");
}
