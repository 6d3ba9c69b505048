/// Tag identifying which exchange flavor a step/flow implements.
///
/// Only `Forward` is implemented in this crate; the other variants are kept
/// here because the capability sets (`Sink`, `Source`, `Flow`, `Step`) are
/// shared across all of them and code consuming these traits generically
/// needs a way to tell flavors apart without downcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeKind {
    Forward,
    Shuffle,
    Broadcast,
    Aggregate,
}
