use crate::forward_info::ForwardInfo;
use crate::record_store::RecordStore;
use exchange_core::{PagedMemoryResource, RecordRef};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const DEFAULT_PAGE_SIZE: usize = 64 * 1024;

/// One parallel lane of a forward exchange: a FIFO record store, the two
/// paged memory resources backing it, and the active-flag shared with this
/// partition's sink and source.
///
/// Cheap to construct: the backing store is only materialized on first
/// `push`/`try_pop`, so plans that over-allocate partitions and never
/// populate some of them pay no allocation cost for the ones left empty.
pub struct InputPartition {
    info: Arc<ForwardInfo>,
    resources: Mutex<Option<(PagedMemoryResource, PagedMemoryResource)>>,
    store: Mutex<Option<Arc<RecordStore>>>,
    active: AtomicBool,
}

impl InputPartition {
    /// Creates a partition backed by the given memory resources, defaulting
    /// both to a fresh page pool if not supplied.
    pub fn new(
        fixed: Option<PagedMemoryResource>,
        varlen: Option<PagedMemoryResource>,
        info: Arc<ForwardInfo>,
    ) -> Self {
        Self {
            info,
            resources: Mutex::new(Some((
                fixed.unwrap_or_else(|| PagedMemoryResource::new(DEFAULT_PAGE_SIZE)),
                varlen.unwrap_or_else(|| PagedMemoryResource::new(DEFAULT_PAGE_SIZE)),
            ))),
            store: Mutex::new(None),
            active: AtomicBool::new(true),
        }
    }

    /// Returns the backing store, creating it on first call. The lock is
    /// held only long enough to publish or clone the `Arc`; the actual
    /// `push`/`try_pop` run against the clone, so a concurrent producer and
    /// consumer never contend on a partition-wide lock.
    fn store(&self) -> Arc<RecordStore> {
        let mut store = self.store.lock();
        if let Some(store) = store.as_ref() {
            return store.clone();
        }
        let (fixed, varlen) = self
            .resources
            .lock()
            .take()
            .expect("resources consumed exactly once, at store creation");
        let created = Arc::new(RecordStore::new(self.info.record_meta().clone(), fixed, varlen));
        *store = Some(created.clone());
        created
    }

    pub fn push(&self, record: RecordRef) {
        self.store().push(record);
    }

    pub fn try_pop(&self, out: &mut Option<RecordRef>) -> bool {
        self.store().try_pop(out)
    }

    /// No-op in the forward exchange; retained so the interface stays
    /// uniform with shuffle/aggregate variants, which finalize a per-epoch
    /// pointer table on flush.
    pub fn flush(&self) {}

    pub fn empty(&self) -> bool {
        match self.store.lock().as_ref() {
            Some(store) => store.empty(),
            None => true,
        }
    }

    pub fn count(&self) -> usize {
        match self.store.lock().as_ref() {
            Some(store) => store.count(),
            None => 0,
        }
    }

    pub fn active(&self) -> &AtomicBool {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward_info::ForwardInfo;
    use exchange_core::testkit::{encode_row, FieldValue};
    use exchange_core::RecordMeta;

    fn info() -> Arc<ForwardInfo> {
        Arc::new(ForwardInfo::new(Arc::new(RecordMeta::new(vec![], 8)), None))
    }

    #[test]
    fn never_touched_partition_allocates_no_store() {
        let partition = InputPartition::new(None, None, info());
        assert!(partition.empty());
        assert_eq!(partition.count(), 0);
        assert!(partition.store.lock().is_none());
    }

    #[test]
    fn push_then_pop_transitions_count() {
        let (bytes, _backing, meta) = encode_row(&[FieldValue::Int8(1)]);
        let partition = InputPartition::new(None, None, Arc::new(ForwardInfo::new(Arc::new(meta), None)));
        assert_eq!(partition.count(), 0);
        let record = unsafe { RecordRef::new(bytes.as_ptr(), bytes.len()) };
        partition.push(record);
        assert_eq!(partition.count(), 1);
        let mut out = None;
        assert!(partition.try_pop(&mut out));
        assert_eq!(partition.count(), 0);
    }

    #[test]
    fn active_flag_starts_true_and_flips_once() {
        let partition = InputPartition::new(None, None, info());
        assert!(partition.active().load(Ordering::SeqCst));
        partition.active().store(false, Ordering::SeqCst);
        assert!(!partition.active().load(Ordering::SeqCst));
    }
}
