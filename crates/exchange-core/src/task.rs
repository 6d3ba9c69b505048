//! The task-submission contract consumed from the scheduler.
//!
//! Only the shape the scheduler expects to receive is in scope here — task
//! execution policy (where it runs, how it is retried, priority) belongs to
//! the scheduler and is out of scope for the exchange.

/// A unit of work the exchange hands to the scheduler.
///
/// The exchange produces exactly one task per flow (`Flow::create_tasks`);
/// what the scheduler does with it — run it to completion, suspend it,
/// retry it — is entirely the scheduler's contract, not this crate's.
pub trait Task: Send + Sync {
    /// Short, human-readable label for logging/diagnostics.
    fn label(&self) -> &str;
}

/// The list type the scheduler consumes.
pub type TaskList = Vec<std::sync::Arc<dyn Task>>;
