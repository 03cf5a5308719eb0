//! Report output for keyword coverage analysis

pub mod report;

pub use report::{
    resolve_report_path, save_report_to_file, suggest_filename, ConsoleFormatter, JsonFormatter, KeywordReport,
    ReportFormatter, ReportGenerator, ReportMetadata,
};
