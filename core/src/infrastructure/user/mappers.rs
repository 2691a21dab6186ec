use sea_orm::ActiveValue::Set;
use tracing::error;

use crate::{
    domain::{common::entities::app_errors::CoreError, user::entities::User},
    entity::users::{ActiveModel as UserActiveModel, Model as UserModel},
};

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        let created_at = model.created_at.to_utc();

        User {
            id: model.id,
            google_id: model.google_id,
            email: model.email,
            name: model.name,
            avatar: model.avatar,
            date_of_birth: model.date_of_birth,
            member_since: model.member_since.to_utc(),
            profile: serde_json::from_value(model.profile).unwrap_or_default(),
            preferences: serde_json::from_value(model.preferences).unwrap_or_default(),
            subscription: serde_json::from_value(model.subscription)
                .unwrap_or_else(|_| crate::domain::user::entities::Subscription::free(created_at)),
            last_login: model.last_login.to_utc(),
            is_active: model.is_active,
            is_deleted: model.is_deleted,
            deleted_at: model.deleted_at.map(|dt| dt.to_utc()),
            created_at,
            updated_at: model.updated_at.to_utc(),
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, field: &str) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value).map_err(|e| {
        error!("Failed to serialize user {}: {}", field, e);
        CoreError::InternalServerError
    })
}

impl TryFrom<&User> for UserActiveModel {
    type Error = CoreError;

    fn try_from(user: &User) -> Result<Self, Self::Error> {
        Ok(UserActiveModel {
            id: Set(user.id),
            google_id: Set(user.google_id.clone()),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            avatar: Set(user.avatar.clone()),
            date_of_birth: Set(user.date_of_birth),
            member_since: Set(user.member_since.fixed_offset()),
            profile: Set(to_json(&user.profile, "profile")?),
            preferences: Set(to_json(&user.preferences, "preferences")?),
            subscription: Set(to_json(&user.subscription, "subscription")?),
            last_login: Set(user.last_login.fixed_offset()),
            is_active: Set(user.is_active),
            is_deleted: Set(user.is_deleted),
            deleted_at: Set(user.deleted_at.map(|dt| dt.fixed_offset())),
            created_at: Set(user.created_at.fixed_offset()),
            updated_at: Set(user.updated_at.fixed_offset()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_model_with_partial_json_uses_defaults() {
        let now = Utc::now().fixed_offset();
        let model = UserModel {
            id: Uuid::new_v4(),
            google_id: "g-1".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            avatar: None,
            date_of_birth: None,
            member_since: now,
            profile: json!({"height": 170.0}),
            preferences: json!({"language": "fr", "timezone": "Europe/Paris"}),
            subscription: json!("garbage"),
            last_login: now,
            is_active: true,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let user = User::from(model);

        assert_eq!(user.profile.height, Some(170.0));
        assert_eq!(user.profile.lifestyle.sleep_hours, 8.0);
        assert_eq!(user.preferences.language, "fr");
        assert!(user.preferences.notifications.email);
        assert_eq!(
            user.subscription.plan,
            crate::domain::user::entities::SubscriptionPlan::Free
        );
    }
}
