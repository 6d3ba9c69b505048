use crate::input_partition::InputPartition;
use crate::reader::Reader;
use exchange_core::RecordReader;
use parking_lot::Mutex;
use std::sync::Arc;

/// Owning end of one partition's reader. Lazily creates its single reader on
/// first `acquire_reader` and hands out the same instance thereafter.
pub struct Source {
    partition: Arc<InputPartition>,
    reader: Mutex<Option<Arc<Reader>>>,
}

impl Source {
    pub(crate) fn new(partition: Arc<InputPartition>) -> Self {
        Self { partition, reader: Mutex::new(None) }
    }

    pub fn acquire_reader(&self) -> Arc<dyn RecordReader> {
        let mut held = self.reader.lock();
        if held.is_none() {
            tracing::trace!("acquiring reader");
            *held = Some(Arc::new(Reader::new(self.partition.clone())));
        }
        held.as_ref().expect("just populated above").clone() as Arc<dyn RecordReader>
    }

    pub fn partition(&self) -> &Arc<InputPartition> {
        &self.partition
    }
}

impl exchange_core::Source for Source {
    fn acquire_reader(&self) -> Arc<dyn RecordReader> {
        Source::acquire_reader(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward_info::ForwardInfo;
    use exchange_core::RecordMeta;

    fn source() -> Source {
        let info = Arc::new(ForwardInfo::new(Arc::new(RecordMeta::new(vec![], 8)), None));
        Source::new(Arc::new(InputPartition::new(None, None, info)))
    }

    #[test]
    fn acquire_reader_returns_the_same_instance_every_call() {
        let source = source();
        let first = source.acquire_reader();
        let second = source.acquire_reader();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
