// Public API
pub use max_heap::{MaxHeap, Ranked};
pub use turn_queue::TurnQueue;

// Internal modules
mod max_heap;
mod turn_queue;
