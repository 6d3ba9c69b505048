use crate::forward_info::ForwardInfo;
use crate::input_partition::InputPartition;
use crate::writer::Writer;
use exchange_core::{RecordWriter, RequestContext};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// Owning end of one partition's writer.
///
/// Created once per partition by the flow; hands out at most one live
/// `Writer` at a time. `release_writer` is how a producer task returns its
/// writer when done — it must be the same writer this sink is currently
/// holding, checked by pointer identity, or it is a usage error.
pub struct Sink {
    info: Arc<ForwardInfo>,
    context: Arc<dyn RequestContext>,
    partition: Arc<InputPartition>,
    write_count: Option<Arc<AtomicUsize>>,
    weak_self: Weak<Sink>,
    writer: Mutex<Option<Arc<Writer>>>,
    active: AtomicBool,
}

impl Sink {
    pub(crate) fn new(
        info: Arc<ForwardInfo>,
        context: Arc<dyn RequestContext>,
        partition: Arc<InputPartition>,
        write_count: Option<Arc<AtomicUsize>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            info,
            context,
            partition,
            write_count,
            weak_self: weak_self.clone(),
            writer: Mutex::new(None),
            active: AtomicBool::new(true),
        })
    }

    /// Returns the live writer, creating it on first call. A sink that
    /// already has a live writer returns the same instance.
    pub fn acquire_writer(&self) -> Arc<dyn RecordWriter> {
        let mut held = self.writer.lock();
        if held.is_none() {
            tracing::trace!("acquiring writer");
            *held = Some(Arc::new(Writer::new(
                self.info.clone(),
                self.weak_self.clone(),
                self.write_count.clone(),
                self.partition.clone(),
            )));
        }
        held.as_ref().expect("just populated above").clone() as Arc<dyn RecordWriter>
    }

    /// Called by a `Writer::release()`. Aborts loudly if `writer` is not the
    /// one this sink currently holds — returning the wrong writer, or the
    /// same writer twice, is a caller bug, not a recoverable condition.
    pub(crate) fn release_writer(&self, writer: &Writer) {
        let mut held = self.writer.lock();
        match held.as_deref() {
            Some(current) if std::ptr::eq(current, writer) => {
                *held = None;
            }
            _ => exchange_core::fail_with_exception(
                "release_writer called with a writer this sink is not currently holding",
            ),
        }
        drop(held);
        self.deactivate();
    }

    /// Idempotent: flips the shared active flag to `false` so readers on the
    /// same partition learn the upstream has closed.
    pub fn deactivate(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            tracing::debug!("sink deactivated");
        }
        self.partition.active().store(false, Ordering::Release);
    }

    pub fn partition(&self) -> &Arc<InputPartition> {
        &self.partition
    }

    pub fn context(&self) -> &Arc<dyn RequestContext> {
        &self.context
    }
}

impl exchange_core::Sink for Sink {
    fn acquire_writer(&self) -> Arc<dyn RecordWriter> {
        Sink::acquire_writer(self)
    }

    fn deactivate(&self) {
        Sink::deactivate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_core::{RecordMeta, TestRequestContext};

    fn sink() -> Arc<Sink> {
        let info = Arc::new(ForwardInfo::new(Arc::new(RecordMeta::new(vec![], 8)), None));
        let partition = Arc::new(InputPartition::new(None, None, info.clone()));
        Sink::new(info, Arc::new(TestRequestContext::new(1)), partition, None)
    }

    #[test]
    fn acquire_writer_is_idempotent_while_held() {
        let sink = sink();
        let first = sink.acquire_writer();
        let second = sink.acquire_writer();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn releasing_the_held_writer_deactivates_the_sink_and_partition() {
        let sink = sink();
        let writer = sink.acquire_writer();
        writer.release();
        assert!(!sink.partition().active().load(Ordering::Acquire));
        assert!(sink.writer.lock().is_none());
    }

    #[test]
    #[should_panic(expected = "not currently holding")]
    fn releasing_a_writer_the_sink_never_held_aborts() {
        let sink = sink();
        let other_info = Arc::new(ForwardInfo::new(Arc::new(RecordMeta::new(vec![], 8)), None));
        let other_partition = Arc::new(InputPartition::new(None, None, other_info.clone()));
        let stray = Writer::new(other_info, Weak::new(), None, other_partition);
        sink.release_writer(&stray);
    }

    #[test]
    fn deactivate_is_idempotent() {
        let sink = sink();
        sink.deactivate();
        sink.deactivate();
        assert!(!sink.partition().active().load(Ordering::Acquire));
    }
}
