pub mod delete_file;
pub mod download_file;
pub mod get_file_info;
pub mod get_progress;
pub mod get_thumbnail;
pub mod upload_report;
