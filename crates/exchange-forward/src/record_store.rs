use exchange_core::{PagedMemoryResource, RecordMeta, RecordRef, VarlenSlot};
use parking_lot::Mutex;
use std::slice;
use std::sync::Arc;

/// Append-only, single-partition FIFO of rows.
///
/// `push` deep-copies a row's fixed bytes and any varlen appendages into the
/// two paged resources it owns; `try_pop` returns a reference into the
/// stored copy, never the original. The queue itself never blocks: a writer
/// may push while a reader concurrently pops, per the forward exchange's
/// one-writer-one-reader-per-partition contract. `count`/`empty` read
/// straight off the queue rather than a side counter, so there is no window
/// where the two could disagree.
pub struct RecordStore {
    record_meta: Arc<RecordMeta>,
    fixed: Mutex<PagedMemoryResource>,
    varlen: Mutex<PagedMemoryResource>,
    queue: crossbeam_queue::SegQueue<RecordRef>,
}

impl RecordStore {
    pub fn new(
        record_meta: Arc<RecordMeta>,
        fixed: PagedMemoryResource,
        varlen: PagedMemoryResource,
    ) -> Self {
        Self {
            record_meta,
            fixed: Mutex::new(fixed),
            varlen: Mutex::new(varlen),
            queue: crossbeam_queue::SegQueue::new(),
        }
    }

    /// Deep-copies `record` into this store and appends it to the FIFO tail.
    pub fn push(&self, record: RecordRef) {
        let record_size = self.record_meta.record_size();
        let src = record.as_bytes();
        debug_assert_eq!(src.len(), record_size, "row width does not match record_meta");

        let dst_ptr = self
            .fixed
            .lock()
            .allocate(record_size)
            .unwrap_or_else(|e| exchange_core::fail_with_exception(e));
        // SAFETY: `dst_ptr` was just allocated with room for exactly
        // `record_size` bytes and is not aliased by anything else yet.
        let dst = unsafe { slice::from_raw_parts_mut(dst_ptr.as_ptr(), record_size) };
        dst.copy_from_slice(src);

        for offset in self.record_meta.varlen_slot_offsets() {
            // SAFETY: `dst` was just populated from `src`, which the caller
            // guarantees was laid out per `record_meta`.
            let slot = unsafe { VarlenSlot::read_at(dst, offset) };
            if slot.len == 0 {
                continue;
            }
            // SAFETY: the slot's pointer/length was written by whoever
            // produced `record` and must stay valid until this push
            // completes, per `RecordRef`'s own safety contract.
            let varlen_src = unsafe { slice::from_raw_parts(slot.ptr as *const u8, slot.len) };
            let varlen_dst_ptr = self
                .varlen
                .lock()
                .allocate(slot.len)
                .unwrap_or_else(|e| exchange_core::fail_with_exception(e));
            // SAFETY: freshly allocated, sized exactly `slot.len`.
            let varlen_dst = unsafe { slice::from_raw_parts_mut(varlen_dst_ptr.as_ptr(), slot.len) };
            varlen_dst.copy_from_slice(varlen_src);
            VarlenSlot { len: slot.len, ptr: varlen_dst_ptr.as_ptr() as usize }.write_at(dst, offset);
        }

        // SAFETY: `dst_ptr` is backed by `self.fixed`, which outlives every
        // `RecordRef` handed out from this store.
        let stored = unsafe { RecordRef::new(dst_ptr.as_ptr(), record_size) };
        self.queue.push(stored);
    }

    /// Pops the head of the FIFO into `out` and returns `true`, or leaves
    /// `out` untouched and returns `false` if the store is empty.
    pub fn try_pop(&self, out: &mut Option<RecordRef>) -> bool {
        match self.queue.pop() {
            Some(record) => {
                *out = Some(record);
                true
            }
            None => false,
        }
    }

    pub fn empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn count(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_core::testkit::{encode_row, FieldValue};

    fn store() -> (RecordStore, Vec<u8>, Vec<Vec<u8>>) {
        let (bytes, varlen_backing, meta) =
            encode_row(&[FieldValue::Int8(7), FieldValue::Text("hello".into())]);
        let store = RecordStore::new(
            Arc::new(meta),
            PagedMemoryResource::new(256),
            PagedMemoryResource::new(256),
        );
        (store, bytes, varlen_backing)
    }

    #[test]
    fn push_then_pop_round_trips_fixed_and_varlen_bytes() {
        let (store, bytes, _backing) = store();
        let record = unsafe { RecordRef::new(bytes.as_ptr(), bytes.len()) };
        store.push(record);
        assert_eq!(store.count(), 1);

        let mut out = None;
        assert!(store.try_pop(&mut out));
        let popped = out.unwrap();
        // The fixed-width int8 prefix is copied byte-for-byte.
        assert_eq!(&popped.as_bytes()[0..8], &bytes[0..8]);
        assert!(store.empty());
    }

    #[test]
    fn try_pop_on_empty_store_returns_false() {
        let (store, _bytes, _backing) = store();
        let mut out = None;
        assert!(!store.try_pop(&mut out));
        assert!(out.is_none());
    }

    #[test]
    fn fifo_order_is_preserved() {
        let (store, _bytes, _backing) = store();
        for i in 0..5 {
            let (bytes, _backing, _meta) =
                encode_row(&[FieldValue::Int8(i), FieldValue::Text("x".into())]);
            let record = unsafe { RecordRef::new(bytes.as_ptr(), bytes.len()) };
            store.push(record);
        }
        assert_eq!(store.count(), 5);
        for i in 0..5 {
            let mut out = None;
            assert!(store.try_pop(&mut out));
            let got = i64::from_ne_bytes(out.unwrap().as_bytes()[0..8].try_into().unwrap());
            assert_eq!(got, i);
        }
    }
}
