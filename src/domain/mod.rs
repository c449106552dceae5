pub mod adapters;
pub mod models;

pub use adapters::ProgressSummary;
