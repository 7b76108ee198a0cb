pub mod feedback;
pub mod filter;
pub mod stats;
pub mod streak;

pub use filter::FilterCriteria;
pub use stats::Stats;
