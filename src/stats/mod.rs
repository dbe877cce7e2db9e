// Public API
pub use models::PlayerStats;
pub use repository::{InMemoryStatsRepository, StatsRepository};

// Internal modules
mod models;
mod repository;
