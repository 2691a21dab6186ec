pub mod delete_account;
pub mod export_data;
pub mod get_dashboard;
pub mod get_profile;
pub mod get_trends;
pub mod update_preferences;
pub mod update_profile;
