//! Scoring and statistics over review tables.

pub mod scorer;
pub mod summary;

pub use scorer::score_with_progress;
pub use summary::*;
