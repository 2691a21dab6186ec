use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    authentication::value_objects::Identity,
    common::entities::app_errors::CoreError,
    report::value_objects::Period,
    user::{
        entities::{User, UserPreferences},
        value_objects::{Dashboard, ProfileView, TrendsOverview, UpdateProfileInput, UserExport},
    },
};

#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    fn create(&self, user: User) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<User>, CoreError>> + Send;

    fn find_by_google_id(
        &self,
        google_id: String,
    ) -> impl Future<Output = Result<Option<User>, CoreError>> + Send;

    /// Expects an already lowercased address.
    fn find_by_email(
        &self,
        email: String,
    ) -> impl Future<Output = Result<Option<User>, CoreError>> + Send;

    fn update(&self, user: User) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn touch_last_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// Service trait for the signed-in user's own account
#[cfg_attr(test, mockall::automock)]
pub trait UserService: Send + Sync {
    fn get_profile(
        &self,
        identity: Identity,
    ) -> impl Future<Output = Result<ProfileView, CoreError>> + Send;

    fn update_profile(
        &self,
        identity: Identity,
        input: UpdateProfileInput,
    ) -> impl Future<Output = Result<User, CoreError>> + Send;

    fn get_dashboard(
        &self,
        identity: Identity,
    ) -> impl Future<Output = Result<Dashboard, CoreError>> + Send;

    fn update_preferences(
        &self,
        identity: Identity,
        preferences: UserPreferences,
    ) -> impl Future<Output = Result<UserPreferences, CoreError>> + Send;

    fn get_trends(
        &self,
        identity: Identity,
        period: Period,
        hormone: Option<String>,
    ) -> impl Future<Output = Result<TrendsOverview, CoreError>> + Send;

    fn delete_account(
        &self,
        identity: Identity,
        confirm_email: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn export_data(
        &self,
        identity: Identity,
    ) -> impl Future<Output = Result<UserExport, CoreError>> + Send;
}
