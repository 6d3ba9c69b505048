use crate::forward_info::ForwardInfo;
use crate::input_partition::InputPartition;
use crate::sink::Sink;
use exchange_core::{RecordRef, RecordWriter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// Producer handle for exactly one partition.
///
/// `write` never refuses a row for the forward exchange: once the shared
/// limit counter (if any) reaches `forward_info.limit`, further rows are
/// silently dropped rather than rejected — this is the exchange's
/// implementation of a pushed-down `LIMIT`, not backpressure, so the
/// producer is never obliged to branch on the return value.
pub struct Writer {
    info: Arc<ForwardInfo>,
    owner: Weak<Sink>,
    write_count: Option<Arc<AtomicUsize>>,
    partition: Arc<InputPartition>,
}

impl Writer {
    pub(crate) fn new(
        info: Arc<ForwardInfo>,
        owner: Weak<Sink>,
        write_count: Option<Arc<AtomicUsize>>,
        partition: Arc<InputPartition>,
    ) -> Self {
        Self { info, owner, write_count, partition }
    }
}

impl RecordWriter for Writer {
    fn write(&self, record: RecordRef) -> bool {
        if let (Some(counter), Some(limit)) = (&self.write_count, self.info.limit()) {
            let mut observed = counter.load(Ordering::Relaxed);
            loop {
                if observed >= limit {
                    // Limit already reached: drop silently, report success.
                    return true;
                }
                match counter.compare_exchange_weak(
                    observed,
                    observed + 1,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break,
                    Err(current) => observed = current,
                }
            }
        }
        self.partition.push(record);
        true
    }

    fn flush(&self) {
        self.partition.flush();
    }

    fn release(&self) {
        tracing::trace!("writer released");
        if let Some(sink) = self.owner.upgrade() {
            sink.release_writer(self);
        }
    }
}
