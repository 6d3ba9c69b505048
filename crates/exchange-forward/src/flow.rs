use crate::forward_info::ForwardInfo;
use crate::input_partition::InputPartition;
use crate::sink::Sink;
use crate::source::Source;
use exchange_core::{ExchangeKind, RequestContext, Task, TaskList};
use parking_lot::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

/// The flow's single scheduling handle, submitted to the scheduler
/// regardless of how many partitions the flow has set up. The forward
/// exchange only produces the submission contract; how and when the
/// scheduler runs it is out of its scope.
struct ExchangeTask {
    label: String,
}

impl Task for ExchangeTask {
    fn label(&self) -> &str {
        &self.label
    }
}

/// Live instance of a forward exchange for one request: owns the partitions
/// and hands out `Sink`/`Source` views with stable (`Arc`-backed) addresses,
/// since tasks and collaborators may hold onto them past a `Vec` reallocation.
pub struct Flow {
    info: Arc<ForwardInfo>,
    context: Arc<dyn RequestContext>,
    write_count: Mutex<Option<Arc<AtomicUsize>>>,
    sinks: Mutex<Vec<Arc<Sink>>>,
    sources: Mutex<Vec<Arc<Source>>>,
}

impl Flow {
    pub fn new(info: Arc<ForwardInfo>, context: Arc<dyn RequestContext>) -> Self {
        Self {
            info,
            context,
            write_count: Mutex::new(None),
            sinks: Mutex::new(Vec::new()),
            sources: Mutex::new(Vec::new()),
        }
    }
}

impl exchange_core::Flow for Flow {
    fn create_tasks(&self) -> TaskList {
        vec![Arc::new(ExchangeTask {
            label: format!("forward-exchange-{}", self.context.request_id()),
        }) as Arc<dyn Task>]
    }

    fn setup_partitions(&self, partitions: usize) -> (Vec<Arc<dyn exchange_core::Sink>>, Vec<Arc<dyn exchange_core::Source>>) {
        tracing::debug!(partitions, "setting up forward exchange partitions");

        // The limit counter is shared by every partition ever created on
        // this flow, so it is created once, lazily, not per call.
        let mut write_count_slot = self.write_count.lock();
        if write_count_slot.is_none() {
            *write_count_slot = self.info.limit().map(|_| Arc::new(AtomicUsize::new(0)));
        }
        let write_count = write_count_slot.clone();
        drop(write_count_slot);

        let mut new_sinks = Vec::with_capacity(partitions);
        let mut new_sources = Vec::with_capacity(partitions);
        for _ in 0..partitions {
            let partition = Arc::new(InputPartition::new(None, None, self.info.clone()));
            new_sinks.push(Sink::new(self.info.clone(), self.context.clone(), partition.clone(), write_count.clone()));
            new_sources.push(Arc::new(Source::new(partition)));
        }

        self.sinks.lock().extend(new_sinks.iter().cloned());
        self.sources.lock().extend(new_sources.iter().cloned());

        (
            new_sinks.into_iter().map(|s| s as Arc<dyn exchange_core::Sink>).collect(),
            new_sources.into_iter().map(|s| s as Arc<dyn exchange_core::Source>).collect(),
        )
    }

    fn sinks(&self) -> Vec<Arc<dyn exchange_core::Sink>> {
        self.sinks.lock().iter().cloned().map(|s| s as Arc<dyn exchange_core::Sink>).collect()
    }

    fn sources(&self) -> Vec<Arc<dyn exchange_core::Source>> {
        self.sources.lock().iter().cloned().map(|s| s as Arc<dyn exchange_core::Source>).collect()
    }

    fn kind(&self) -> ExchangeKind {
        ExchangeKind::Forward
    }

    fn context(&self) -> Arc<dyn RequestContext> {
        self.context.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_core::{RecordMeta, TestRequestContext};

    fn flow(limit: Option<usize>) -> Flow {
        let info = Arc::new(ForwardInfo::new(Arc::new(RecordMeta::new(vec![], 8)), limit));
        Flow::new(info, Arc::new(TestRequestContext::new(1)))
    }

    #[test]
    fn setup_partitions_returns_matching_counts_with_stable_index_correspondence() {
        use exchange_core::{Flow as _, RecordWriter as _, Sink as _};

        let flow = flow(None);
        let (sinks, sources) = flow.setup_partitions(3);
        assert_eq!(sinks.len(), 3);
        assert_eq!(sources.len(), 3);
        assert_eq!(flow.sinks().len(), 3);
        assert_eq!(flow.sources().len(), 3);

        let writer = sinks[0].acquire_writer();
        let bytes = 7i64.to_ne_bytes();
        let record = unsafe { exchange_core::RecordRef::new(bytes.as_ptr(), bytes.len()) };
        // Writing through sinks[0] must not touch any other partition.
        let _ = writer.write(record);
    }

    #[test]
    fn setup_partitions_with_a_limit_shares_one_counter_across_every_sink() {
        use exchange_core::{Flow as _, RecordWriter as _, Sink as _};

        let flow = flow(Some(2));
        let (sinks, _sources) = flow.setup_partitions(2);
        let bytes = 1i64.to_ne_bytes();
        let record = || unsafe { exchange_core::RecordRef::new(bytes.as_ptr(), bytes.len()) };

        let w0 = sinks[0].acquire_writer();
        let w1 = sinks[1].acquire_writer();
        assert!(w0.write(record()));
        assert!(w0.write(record()));
        // The shared limit is already exhausted by partition 0 alone.
        assert!(w1.write(record()));
    }

    #[test]
    fn create_tasks_yields_exactly_one_task_regardless_of_partition_count() {
        use exchange_core::Flow as _;

        let flow = flow(None);
        assert_eq!(flow.create_tasks().len(), 1);
        flow.setup_partitions(4);
        assert_eq!(flow.create_tasks().len(), 1);
    }

    #[test]
    fn kind_is_forward() {
        use exchange_core::Flow as _;
        assert_eq!(flow(None).kind(), ExchangeKind::Forward);
    }
}
