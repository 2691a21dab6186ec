pub mod ports;
pub mod services;
pub mod value_objects;

/// Confirmation phrase required to delete an account through the auth routes.
pub const DELETE_ACCOUNT_CONFIRMATION: &str = "DELETE_MY_ACCOUNT";

/// Lifetime label reported to clients alongside a fresh token pair.
pub const ACCESS_TOKEN_LIFETIME: &str = "7d";
