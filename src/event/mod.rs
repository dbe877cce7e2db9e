// Event-driven architecture components
//
// This module provides the infrastructure for pushing game facts to the
// presentation layer without the core knowing who renders them.

// Public API
pub use bus::EventBus;
pub use events::GameEvent;

// Internal modules
mod bus;
mod events;
