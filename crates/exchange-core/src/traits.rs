//! Abstract capability sets exposed by every exchange flavor.
//!
//! `exchange-forward` implements these for the forward exchange; a future
//! shuffle/broadcast/aggregate crate would implement the same traits so
//! that the step graph and task scheduler never need to know which flavor
//! they are driving.

use crate::kind::ExchangeKind;
use crate::record::RecordRef;
use crate::request_context::RequestContext;
use crate::task::TaskList;
use std::sync::Arc;

/// Producer-side handle: pushes rows into one partition.
///
/// `write` never blocks and, for the forward exchange, never refuses a row
/// — the `bool` return exists so other exchange flavors can signal
/// backpressure through the same trait without a signature change. Forward
/// callers must not branch on it for flow control.
pub trait RecordWriter: Send + Sync {
    fn write(&self, record: RecordRef) -> bool;
    fn flush(&self);
    fn release(&self);
}

/// Consumer-side handle: pops rows from one partition.
///
/// Never blocks. A `next_record` that returns `false` means "check
/// `source_active()`": if it's still `true` the partition is merely
/// temporarily empty and the caller should yield back to the scheduler; if
/// it's `false` the stream is permanently drained.
pub trait RecordReader: Send + Sync {
    fn available(&self) -> bool;
    fn next_record(&self) -> bool;
    fn get_record(&self) -> RecordRef;
    fn release(&self);
    fn source_active(&self) -> bool;
}

/// Lifecycle owner of one writer for one partition.
pub trait Sink: Send + Sync {
    /// Creates the writer on first call; returns the same instance on every
    /// subsequent call. Concurrent acquisition from more than one producer
    /// task is not a supported usage.
    fn acquire_writer(&self) -> Arc<dyn RecordWriter>;

    /// Atomically marks the partition as no longer being fed. Idempotent.
    fn deactivate(&self);
}

/// Lifecycle owner of one reader for one partition.
pub trait Source: Send + Sync {
    /// Lazily creates the reader on first call; returns a handle to the
    /// same reader on every subsequent call.
    fn acquire_reader(&self) -> Arc<dyn RecordReader>;
}

/// Per-execution owner of one exchange instance's partitions.
pub trait Flow: Send + Sync {
    /// Produces the (currently single-element) task list handed to the
    /// scheduler. Not required to be idempotent; callers invoke it once per
    /// activation.
    fn create_tasks(&self) -> TaskList;

    /// Grows the flow by `partitions` fresh partitions, returning sinks and
    /// sources for them. Safe to call with `0`, and safe to call more than
    /// once on the same flow — previously returned sinks/sources remain
    /// valid.
    fn setup_partitions(&self, partitions: usize) -> (Vec<Arc<dyn Sink>>, Vec<Arc<dyn Source>>);

    /// All sinks set up on this flow so far, same index correspondence as
    /// [`Flow::sources`].
    fn sinks(&self) -> Vec<Arc<dyn Sink>>;

    /// All sources set up on this flow so far.
    fn sources(&self) -> Vec<Arc<dyn Source>>;

    fn kind(&self) -> ExchangeKind;

    fn context(&self) -> Arc<dyn RequestContext>;
}

/// A node in the query DAG. Holds schema + configuration; on activation,
/// constructs the [`Flow`] that lives only for the duration of execution.
pub trait Step: Send + Sync {
    fn activate(&self, context: Arc<dyn RequestContext>) -> Arc<dyn Flow>;

    fn kind(&self) -> ExchangeKind;
}
