use chrono::{Datelike, NaiveDate, Utc};
use pearl_core::domain::user::{
    entities::{
        AlcoholConsumption, ExerciseFrequency, Medication, NotificationPreferences,
        PrivacyPreferences, SmokingStatus, StressLevel, UserPreferences, UserProfile,
    },
    value_objects::UpdateProfileInput,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

const LANGUAGES: [&str; 6] = ["en", "zh", "es", "fr", "de", "ja"];

fn age_on(date_of_birth: &NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

fn validate_date_of_birth(date_of_birth: &NaiveDate) -> Result<(), ValidationError> {
    let age = age_on(date_of_birth, Utc::now().date_naive());
    if (13..=120).contains(&age) {
        Ok(())
    } else {
        Err(ValidationError::new("dateOfBirth")
            .with_message("Age must be between 13 and 120 years".into()))
    }
}

fn validate_history(items: &Vec<String>) -> Result<(), ValidationError> {
    if items.iter().all(|i| (1..=200).contains(&i.trim().chars().count())) {
        Ok(())
    } else {
        Err(ValidationError::new("medicalHistory")
            .with_message("Each medical history item must be between 1 and 200 characters".into()))
    }
}

fn validate_language(language: &str) -> Result<(), ValidationError> {
    if LANGUAGES.contains(&language) {
        Ok(())
    } else {
        Err(ValidationError::new("language").with_message("Unsupported language".into()))
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleValidator {
    pub exercise_frequency: Option<ExerciseFrequency>,
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: Option<f64>,
    pub stress_level: Option<StressLevel>,
    pub smoking_status: Option<SmokingStatus>,
    pub alcohol_consumption: Option<AlcoholConsumption>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileValidator {
    #[validate(range(min = 50.0, max = 300.0, message = "Height must be between 50 and 300 cm"))]
    pub height: Option<f64>,
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg"))]
    pub weight: Option<f64>,
    #[validate(custom(function = "validate_history"))]
    pub medical_history: Option<Vec<String>>,
    pub current_medications: Option<Vec<Medication>>,
    pub allergies: Option<Vec<String>>,
    #[validate(nested)]
    pub lifestyle: Option<LifestyleValidator>,
}

impl ProfileValidator {
    /// Overlays the submitted fields on the stored profile.
    pub fn apply(self, mut profile: UserProfile) -> UserProfile {
        if self.height.is_some() {
            profile.height = self.height;
        }
        if self.weight.is_some() {
            profile.weight = self.weight;
        }
        if let Some(history) = self.medical_history {
            profile.medical_history = history.into_iter().map(|h| h.trim().to_string()).collect();
        }
        if let Some(medications) = self.current_medications {
            profile.current_medications = medications;
        }
        if let Some(allergies) = self.allergies {
            profile.allergies = allergies;
        }
        if let Some(lifestyle) = self.lifestyle {
            let current = &mut profile.lifestyle;
            if lifestyle.exercise_frequency.is_some() {
                current.exercise_frequency = lifestyle.exercise_frequency;
            }
            if let Some(sleep_hours) = lifestyle.sleep_hours {
                current.sleep_hours = sleep_hours;
            }
            if lifestyle.stress_level.is_some() {
                current.stress_level = lifestyle.stress_level;
            }
            if lifestyle.smoking_status.is_some() {
                current.smoking_status = lifestyle.smoking_status;
            }
            if lifestyle.alcohol_consumption.is_some() {
                current.alcohol_consumption = lifestyle.alcohol_consumption;
            }
        }
        profile
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileValidator {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_date_of_birth"))]
    pub date_of_birth: Option<NaiveDate>,
    #[validate(nested)]
    pub profile: Option<ProfileValidator>,
}

impl UpdateProfileValidator {
    pub fn into_input(self, current: UserProfile) -> UpdateProfileInput {
        UpdateProfileInput {
            name: self.name,
            date_of_birth: self.date_of_birth,
            profile: self.profile.map(|p| p.apply(current)),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesValidator {
    pub notifications: Option<NotificationPreferences>,
    pub privacy: Option<PrivacyPreferences>,
    #[validate(custom(function = "validate_language"))]
    pub language: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Timezone must be between 1 and 50 characters"))]
    pub timezone: Option<String>,
}

impl UpdatePreferencesValidator {
    pub fn apply(self, mut preferences: UserPreferences) -> UserPreferences {
        if let Some(notifications) = self.notifications {
            preferences.notifications = notifications;
        }
        if let Some(privacy) = self.privacy {
            preferences.privacy = privacy;
        }
        if let Some(language) = self.language {
            preferences.language = language;
        }
        if let Some(timezone) = self.timezone {
            preferences.timezone = timezone;
        }
        preferences
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendsQuery {
    /// `1month`, `3months`, `6months` or `1year`
    pub period: Option<String>,
    /// Restrict the statistics to one hormone
    pub hormone: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmEmailValidator {
    #[serde(default)]
    pub confirm_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_counts_birthday_once_passed() {
        let dob = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        assert_eq!(age_on(&dob, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), 23);
        assert_eq!(age_on(&dob, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), 24);
    }

    #[test]
    fn test_profile_ranges_are_checked() {
        let update = UpdateProfileValidator {
            name: Some(String::new()),
            profile: Some(ProfileValidator {
                height: Some(20.0),
                lifestyle: Some(LifestyleValidator {
                    sleep_hours: Some(30.0),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let errors = update.validate().unwrap_err();
        let errors = errors.errors();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("profile"));
    }

    #[test]
    fn test_too_young_is_rejected() {
        let update = UpdateProfileValidator {
            date_of_birth: Some(Utc::now().date_naive()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_profile_is_merged_into_current() {
        let current = UserProfile {
            height: Some(170.0),
            allergies: vec!["pollen".to_string()],
            ..Default::default()
        };
        let update = UpdateProfileValidator {
            profile: Some(ProfileValidator {
                weight: Some(62.5),
                lifestyle: Some(LifestyleValidator {
                    stress_level: Some(StressLevel::High),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let profile = update.into_input(current).profile.unwrap();
        assert_eq!(profile.height, Some(170.0));
        assert_eq!(profile.weight, Some(62.5));
        assert_eq!(profile.allergies, vec!["pollen".to_string()]);
        assert_eq!(profile.lifestyle.stress_level, Some(StressLevel::High));
        assert_eq!(profile.lifestyle.sleep_hours, 8.0);
    }

    #[test]
    fn test_preferences_language_and_merge() {
        let bad = UpdatePreferencesValidator {
            language: Some("xx".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let update = UpdatePreferencesValidator {
            language: Some("fr".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        let merged = update.apply(UserPreferences::default());
        assert_eq!(merged.language, "fr");
        assert_eq!(merged.timezone, "UTC");
        assert!(merged.notifications.report_ready);
    }
}
