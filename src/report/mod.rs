pub mod json;
pub mod summary;

pub use json::{write_json_report, SummaryReport};
pub use summary::{print_summary, write_summary};
