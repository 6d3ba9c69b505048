//! # exchange-forward
//!
//! The forward exchange: the no-repartitioning, no-sort, optional-`LIMIT`
//! flavor of the dataflow fabric. Rows pushed into partition *i* are read
//! back from partition *i* and nowhere else; the only cross-partition
//! coordination is a shared row-limit counter.
//!
//! Implements the [`exchange_core`] capability traits (`Sink`, `Source`,
//! `Flow`, `Step`, `RecordWriter`, `RecordReader`) against the concrete types
//! in this crate.

pub mod flow;
pub mod forward_info;
pub mod input_partition;
pub mod reader;
pub mod record_store;
pub mod sink;
pub mod source;
pub mod step;
pub mod writer;

pub use flow::Flow;
pub use forward_info::ForwardInfo;
pub use input_partition::InputPartition;
pub use reader::Reader;
pub use record_store::RecordStore;
pub use sink::Sink;
pub use source::Source;
pub use step::Step;
pub use writer::Writer;
