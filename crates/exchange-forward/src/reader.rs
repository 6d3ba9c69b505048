use crate::input_partition::InputPartition;
use exchange_core::{RecordReader, RecordRef};
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Consumer handle for exactly one partition.
///
/// Non-blocking: `next_record` returning `false` means only "nothing is
/// queued right now", not "the partition is drained" — callers must check
/// `source_active()` separately to tell the two apart, mirroring the
/// original's split between an empty queue and a closed upstream.
pub struct Reader {
    partition: Arc<InputPartition>,
    current: Mutex<Option<RecordRef>>,
}

impl Reader {
    pub(crate) fn new(partition: Arc<InputPartition>) -> Self {
        Self { partition, current: Mutex::new(None) }
    }
}

impl RecordReader for Reader {
    fn available(&self) -> bool {
        !self.partition.empty()
    }

    fn next_record(&self) -> bool {
        let mut out = None;
        if self.partition.try_pop(&mut out) {
            *self.current.lock() = out;
            true
        } else {
            false
        }
    }

    fn get_record(&self) -> RecordRef {
        self.current
            .lock()
            .clone()
            .unwrap_or_else(|| exchange_core::fail_with_exception("get_record called before a successful next_record"))
    }

    fn release(&self) {
        tracing::trace!("reader released");
    }

    fn source_active(&self) -> bool {
        self.partition.active().load(Ordering::Acquire)
    }
}
