pub mod delete_account;
pub mod google_auth;
pub mod logout;
pub mod me;
pub mod refresh_token;
pub mod verify;
