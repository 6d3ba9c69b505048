use exchange_core::RecordMeta;
use std::sync::Arc;

/// Immutable per-exchange configuration, shared (lifetime = longest holder)
/// by the step, the flow, every partition, every writer, and every reader.
#[derive(Debug)]
pub struct ForwardInfo {
    record_meta: Arc<RecordMeta>,
    limit: Option<usize>,
}

impl ForwardInfo {
    pub fn new(record_meta: Arc<RecordMeta>, limit: Option<usize>) -> Self {
        Self { record_meta, limit }
    }

    pub fn record_meta(&self) -> &Arc<RecordMeta> {
        &self.record_meta
    }

    /// Global maximum number of rows the exchange will transmit across all
    /// partitions combined. `None` means unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
