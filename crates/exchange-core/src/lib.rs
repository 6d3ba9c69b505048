//! # exchange-core
//!
//! Capability traits and collaborator contracts shared by every exchange
//! flavor (forward, shuffle, broadcast, aggregate) of the query engine's
//! dataflow fabric.
//!
//! This crate defines *what* an exchange flavor must expose to the step
//! graph and task scheduler (`Sink`, `Source`, `RecordWriter`,
//! `RecordReader`, `Flow`, `Step`), plus the minimal concrete stand-ins for
//! the collaborator contracts the exchange only ever consumes
//! (`RecordMeta`, `RecordRef`, `RequestContext`, `PagedMemoryResource`,
//! `Task`). `exchange-forward` implements the forward flavor against these.

pub mod error;
pub mod kind;
pub mod memory;
pub mod record;
pub mod request_context;
pub mod task;
pub mod traits;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{fail_with_exception, ExchangeError};
pub use kind::ExchangeKind;
pub use memory::PagedMemoryResource;
pub use record::{FieldMeta, FieldType, RecordMeta, RecordRef, VarlenSlot};
pub use request_context::{RequestContext, TestRequestContext};
pub use task::{Task, TaskList};
pub use traits::{Flow, RecordReader, RecordWriter, Sink, Source, Step};
