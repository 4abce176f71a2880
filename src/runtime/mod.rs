//! Single-resource driver loop and result reporting.

pub mod driver;
pub mod report;

pub use driver::drive_until_idle;
pub use report::format_results;
