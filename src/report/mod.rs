pub mod aggregator;
pub mod writer;

pub use aggregator::{ActivityVerdict, Recorded, ReportEntry, ResultAggregator, RunSummary};
pub use writer::{ReportWriter, format_entry, format_summary, report_filename};
