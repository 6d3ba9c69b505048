use crate::flow::Flow;
use crate::forward_info::ForwardInfo;
use exchange_core::{ExchangeKind, RecordMeta, RequestContext};
use std::sync::Arc;

/// Plan-time node for a forward exchange. Holds everything needed to
/// `activate` a fresh [`Flow`] once a request is underway; itself carries no
/// per-request state, so one `Step` can be activated many times.
///
/// A forward exchange never sorts or repartitions, so its output order and
/// schema are exactly its input's — `output_order`/`output_meta` exist only
/// to hand those straight through to whatever consumes this step's output.
pub struct Step {
    info: Arc<ForwardInfo>,
    input_order: Option<Vec<usize>>,
}

impl Step {
    pub fn new(info: Arc<ForwardInfo>, input_order: Option<Vec<usize>>) -> Self {
        Self { info, input_order }
    }

    pub fn from_parts(record_meta: Arc<RecordMeta>, limit: Option<usize>, input_order: Option<Vec<usize>>) -> Self {
        Self::new(Arc::new(ForwardInfo::new(record_meta, limit)), input_order)
    }

    /// Sort-key column indices this step's rows already arrive in, unchanged
    /// from the upstream step. `None` means the upstream gives no ordering
    /// guarantee.
    pub fn output_order(&self) -> Option<&[usize]> {
        self.input_order.as_deref()
    }

    pub fn output_meta(&self) -> &Arc<RecordMeta> {
        self.info.record_meta()
    }
}

impl exchange_core::Step for Step {
    fn activate(&self, context: Arc<dyn RequestContext>) -> Arc<dyn exchange_core::Flow> {
        tracing::debug!("activating forward exchange step");
        Arc::new(Flow::new(self.info.clone(), context))
    }

    fn kind(&self) -> ExchangeKind {
        ExchangeKind::Forward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_core::{Step as _, TestRequestContext};

    #[test]
    fn output_order_and_meta_pass_through_unchanged() {
        let meta = Arc::new(RecordMeta::new(vec![], 16));
        let step = Step::from_parts(meta.clone(), None, Some(vec![1, 0]));
        assert_eq!(step.output_order(), Some(&[1, 0][..]));
        assert_eq!(step.output_meta().record_size(), meta.record_size());
    }

    #[test]
    fn activate_produces_a_usable_flow() {
        use exchange_core::Flow as _;

        let meta = Arc::new(RecordMeta::new(vec![], 8));
        let step = Step::from_parts(meta, Some(5), None);
        let flow = step.activate(Arc::new(TestRequestContext::new(9)));
        assert_eq!(flow.kind(), ExchangeKind::Forward);
        let (sinks, sources) = flow.setup_partitions(2);
        assert_eq!(sinks.len(), 2);
        assert_eq!(sources.len(), 2);
    }
}
