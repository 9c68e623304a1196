pub mod analytics;
pub mod report;

pub use analytics::*;
pub use report::*;
