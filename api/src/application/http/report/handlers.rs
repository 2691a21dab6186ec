pub mod compare_reports;
pub mod delete_report;
pub mod export_report;
pub mod get_report;
pub mod list_reports;
pub mod stats_overview;
pub mod update_report;
