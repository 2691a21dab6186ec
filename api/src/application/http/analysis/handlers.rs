pub mod analyze_report;
pub mod get_results;
pub mod hormone_insights;
pub mod reanalyze;
