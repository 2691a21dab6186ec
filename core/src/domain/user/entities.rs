use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::common::generate_timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[serde(default, skip_serializing)]
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub member_since: DateTime<Utc>,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub subscription: Subscription,
    pub last_login: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default, skip_serializing)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(google_id: String, email: String, name: String, avatar: Option<String>) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            google_id,
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
            avatar,
            date_of_birth: None,
            member_since: now,
            profile: UserProfile::default(),
            preferences: UserPreferences::default(),
            subscription: Subscription::free(now),
            last_login: now,
            is_active: true,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full years since the date of birth, counting a birthday only once it has passed.
    pub fn age(&self, today: NaiveDate) -> Option<i32> {
        let birth = self.date_of_birth?;
        let mut age = today.year() - birth.year();

        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }

        Some(age)
    }

    pub fn membership_duration_days(&self, now: DateTime<Utc>) -> i64 {
        let elapsed = now.signed_duration_since(self.member_since);
        let days = elapsed.num_days();

        if elapsed > chrono::Duration::days(days) {
            days + 1
        } else {
            days
        }
    }

    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.is_active = false;
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Centimeters.
    pub height: Option<f64>,
    /// Kilograms.
    pub weight: Option<f64>,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<Medication>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub lifestyle: Lifestyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Medication {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lifestyle {
    pub exercise_frequency: Option<ExerciseFrequency>,
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: f64,
    pub stress_level: Option<StressLevel>,
    pub smoking_status: Option<SmokingStatus>,
    pub alcohol_consumption: Option<AlcoholConsumption>,
}

fn default_sleep_hours() -> f64 {
    8.0
}

impl Default for Lifestyle {
    fn default() -> Self {
        Self {
            exercise_frequency: None,
            sleep_hours: default_sleep_hours(),
            stress_level: None,
            smoking_status: None,
            alcohol_consumption: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseFrequency {
    None,
    Light,
    Moderate,
    Intense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlcoholConsumption {
    None,
    Occasional,
    Moderate,
    Frequent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default)]
    pub privacy: PrivacyPreferences,
    pub language: String,
    pub timezone: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            notifications: NotificationPreferences::default(),
            privacy: PrivacyPreferences::default(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub report_ready: bool,
    pub weekly_digest: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            report_ready: true,
            weekly_digest: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPreferences {
    pub share_anonymous_data: bool,
    pub allow_research_participation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Free,
    Premium,
    Professional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: SubscriptionPlan,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Subscription {
    pub fn free(start_date: DateTime<Utc>) -> Self {
        Self {
            plan: SubscriptionPlan::Free,
            start_date,
            end_date: None,
            is_active: true,
        }
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::free(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user() -> User {
        User::new(
            "google-1".to_string(),
            "  Jane@Example.COM ".to_string(),
            " Jane ".to_string(),
            None,
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = user();

        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.name, "Jane");
        assert_eq!(user.subscription.plan, SubscriptionPlan::Free);
        assert_eq!(user.preferences.language, "en");
        assert_eq!(user.profile.lifestyle.sleep_hours, 8.0);
        assert!(user.is_active);
    }

    #[test]
    fn test_age_counts_birthday_once_passed() {
        let mut user = user();
        user.date_of_birth = NaiveDate::from_ymd_opt(1990, 6, 15);

        assert_eq!(user.age(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), Some(33));
        assert_eq!(user.age(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), Some(34));
    }

    #[test]
    fn test_membership_duration_rounds_up() {
        let mut user = user();
        user.member_since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 3, 1, 0, 0).unwrap();
        assert_eq!(user.membership_duration_days(now), 3);

        let exact = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(user.membership_duration_days(exact), 2);
    }

    #[test]
    fn test_serialization_hides_google_id() {
        let json = serde_json::to_value(user()).unwrap();

        assert!(json.get("googleId").is_none());
        assert!(json.get("isDeleted").is_none());
        assert_eq!(json["subscription"]["plan"], "free");
    }
}
