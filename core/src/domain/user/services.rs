use chrono::Utc;
use tracing::instrument;

use crate::domain::{
    analysis::ports::{LLMClient, TextExtractor},
    authentication::{
        ports::{GoogleTokenVerifier, TokenRepository},
        value_objects::Identity,
    },
    common::{entities::app_errors::CoreError, services::Service},
    health::ports::HealthCheckRepository,
    report::{ports::ReportRepository, value_objects::Period},
    storage::ports::{FileStorage, ThumbnailGenerator},
    user::{
        entities::{User, UserPreferences},
        helpers::{dashboard_trend, hormone_stats, tombstone_email, trend_points},
        ports::{UserRepository, UserService},
        value_objects::{
            Dashboard, DashboardStatistics, DashboardUser, ProfileView, RecentReport,
            TrendsOverview, UpdateProfileInput, UserExport,
        },
    },
};

const RECENT_REPORTS: u64 = 5;
const DASHBOARD_TREND_POINTS: u64 = 12;
const EXPORT_VERSION: &str = "1.0";

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> UserService for Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
where
    U: UserRepository,
    RP: ReportRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
    TE: TextExtractor,
    FS: FileStorage,
    TH: ThumbnailGenerator,
    TK: TokenRepository,
    GV: GoogleTokenVerifier,
{
    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn get_profile(&self, identity: Identity) -> Result<ProfileView, CoreError> {
        let stats = self.report_repository.stats(identity.id()).await?;
        let now = Utc::now();
        let user = identity.into_user();

        Ok(ProfileView {
            age: user.age(now.date_naive()),
            membership_duration: user.membership_duration_days(now),
            stats,
            user,
        })
    }

    #[instrument(skip(self, identity, input), fields(user_id = %identity.id()))]
    async fn update_profile(
        &self,
        identity: Identity,
        input: UpdateProfileInput,
    ) -> Result<User, CoreError> {
        let mut user = identity.into_user();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CoreError::Validation("Name cannot be empty".to_string()));
            }
            user.name = name;
        }
        if let Some(date_of_birth) = input.date_of_birth {
            user.date_of_birth = Some(date_of_birth);
        }
        if let Some(profile) = input.profile {
            user.profile = profile;
        }
        user.updated_at = Utc::now();

        let user = self.user_repository.update(user).await?;
        tracing::info!(user_id = %user.id, "profile updated");

        Ok(user)
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn get_dashboard(&self, identity: Identity) -> Result<Dashboard, CoreError> {
        let user_id = identity.id();

        let stats = self.report_repository.stats(user_id).await?;
        let recent = self.report_repository.recent(user_id, RECENT_REPORTS).await?;
        let latest = self.report_repository.latest_analyzed(user_id).await?;
        let trend = self
            .report_repository
            .analyzed(user_id, None, Some(DASHBOARD_TREND_POINTS))
            .await?;

        let user = identity.into_user();

        Ok(Dashboard {
            user: DashboardUser {
                name: user.name,
                email: user.email,
                avatar: user.avatar,
                member_since: user.member_since,
                subscription: user.subscription,
            },
            statistics: DashboardStatistics {
                total_reports: stats.total_reports,
                analyzed_reports: stats.analyzed_reports,
                avg_health_score: stats.avg_score,
                last_update: latest.as_ref().map(|r| r.report_date),
            },
            recent_reports: recent.iter().map(RecentReport::from).collect(),
            latest_hormone_data: latest
                .as_ref()
                .map(|r| r.hormone_data.clone())
                .unwrap_or_default(),
            latest_insights: latest
                .as_ref()
                .and_then(|r| r.ai_analysis.as_ref())
                .map(|a| a.insights.clone())
                .unwrap_or_default(),
            trend_data: dashboard_trend(&trend),
        })
    }

    #[instrument(skip(self, identity, preferences), fields(user_id = %identity.id()))]
    async fn update_preferences(
        &self,
        identity: Identity,
        preferences: UserPreferences,
    ) -> Result<UserPreferences, CoreError> {
        let mut user = identity.into_user();
        user.preferences = preferences;
        user.updated_at = Utc::now();

        let user = self.user_repository.update(user).await?;
        Ok(user.preferences)
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn get_trends(
        &self,
        identity: Identity,
        period: Period,
        hormone: Option<String>,
    ) -> Result<TrendsOverview, CoreError> {
        let end_date = Utc::now();
        let start_date = period.start_from(end_date);

        let reports = self
            .report_repository
            .analyzed(identity.id(), Some(start_date), None)
            .await?;

        Ok(TrendsOverview {
            period,
            start_date,
            end_date,
            trend_data: trend_points(&reports),
            hormone_stats: hormone_stats(&reports, hormone.as_deref()),
            total_reports: reports.len(),
        })
    }

    #[instrument(skip(self, identity, confirm_email), fields(user_id = %identity.id()))]
    async fn delete_account(&self, identity: Identity, confirm_email: String) -> Result<(), CoreError> {
        let mut user = identity.into_user();

        if !confirm_email.trim().eq_ignore_ascii_case(&user.email) {
            return Err(CoreError::ConfirmationMismatch(
                "Email confirmation does not match".to_string(),
            ));
        }

        let now = Utc::now();
        user.email = tombstone_email(&user.email, now);
        user.soft_delete(now);
        let user = self.user_repository.update(user).await?;

        let hidden = self.report_repository.make_private(user.id).await?;
        tracing::info!(user_id = %user.id, reports = hidden, "user account deleted");

        Ok(())
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn export_data(&self, identity: Identity) -> Result<UserExport, CoreError> {
        let reports = self.report_repository.all_for_user(identity.id()).await?;

        Ok(UserExport {
            user: identity.into_user(),
            reports,
            exported_at: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        analysis::entities::{AiAnalysis, RiskLevel},
        common::services::test_support::Mocks,
        report::{
            entities::{Report, ReportMetadata, ReportStatus},
            value_objects::ReportStats,
        },
    };
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn identity() -> Identity {
        Identity::new(User::new(
            "g".to_string(),
            "Jane@example.com".to_string(),
            "Jane".to_string(),
            None,
        ))
    }

    fn analyzed_report(user_id: Uuid, score: u8) -> Report {
        let mut report = Report::new(
            user_id,
            None,
            None,
            None,
            Vec::new(),
            ReportMetadata::default(),
            Vec::new(),
        );
        report.status = ReportStatus::Analyzed;
        report.ai_analysis = Some(AiAnalysis {
            overall_score: score,
            risk_level: RiskLevel::Low,
            summary: String::new(),
            insights: Vec::new(),
            processed_at: None,
            processing_time: None,
            ai_model: None,
            confidence: 0.7,
        });
        report
    }

    #[tokio::test]
    async fn test_profile_includes_derived_values() {
        let mut mocks = Mocks::default();
        mocks
            .reports
            .expect_stats()
            .returning(|_| Box::pin(async move { Ok(ReportStats::default()) }));

        let mut user = identity().into_user();
        user.date_of_birth = NaiveDate::from_ymd_opt(1990, 1, 1);

        let profile = mocks
            .into_service()
            .get_profile(Identity::new(user))
            .await
            .unwrap();

        assert!(profile.age.is_some_and(|age| age >= 34));
        assert!(profile.membership_duration <= 1);
    }

    #[tokio::test]
    async fn test_update_profile_keeps_protected_fields() {
        let mut mocks = Mocks::default();
        mocks
            .users
            .expect_update()
            .returning(|user| Box::pin(async move { Ok(user) }));

        let identity = identity();
        let email = identity.user().email.clone();

        let user = mocks
            .into_service()
            .update_profile(
                identity,
                UpdateProfileInput {
                    name: Some("  Janet ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(user.name, "Janet");
        assert_eq!(user.email, email);
    }

    #[tokio::test]
    async fn test_dashboard_without_analyzed_reports() {
        let mut mocks = Mocks::default();
        mocks.reports.expect_stats().returning(|_| {
            Box::pin(async move {
                Ok(ReportStats {
                    total_reports: 1,
                    ..Default::default()
                })
            })
        });
        mocks.reports.expect_recent().returning(|user_id, _| {
            let report = Report::new(
                user_id,
                None,
                None,
                None,
                Vec::new(),
                ReportMetadata::default(),
                Vec::new(),
            );
            Box::pin(async move { Ok(vec![report]) })
        });
        mocks
            .reports
            .expect_latest_analyzed()
            .returning(|_| Box::pin(async move { Ok(None) }));
        mocks
            .reports
            .expect_analyzed()
            .withf(|_, since, limit| since.is_none() && *limit == Some(12))
            .returning(|_, _, _| Box::pin(async move { Ok(Vec::new()) }));

        let dashboard = mocks.into_service().get_dashboard(identity()).await.unwrap();

        assert_eq!(dashboard.statistics.total_reports, 1);
        assert_eq!(dashboard.recent_reports.len(), 1);
        assert!(dashboard.latest_hormone_data.is_empty());
        assert!(dashboard.statistics.last_update.is_none());
    }

    #[tokio::test]
    async fn test_trends_use_period_start() {
        let mut mocks = Mocks::default();
        mocks
            .reports
            .expect_analyzed()
            .withf(|_, since, limit| since.is_some() && limit.is_none())
            .returning(|user_id, _, _| {
                let reports = vec![analyzed_report(user_id, 60), analyzed_report(user_id, 70)];
                Box::pin(async move { Ok(reports) })
            });

        let trends = mocks
            .into_service()
            .get_trends(identity(), Period::ThreeMonths, None)
            .await
            .unwrap();

        assert_eq!(trends.total_reports, 2);
        assert_eq!(trends.trend_data[1].overall_score, Some(70));
        assert!(trends.start_date < trends.end_date);
    }

    #[tokio::test]
    async fn test_delete_account_checks_email() {
        let service = Mocks::default().into_service();

        let result = service
            .delete_account(identity(), "other@example.com".to_string())
            .await;

        assert!(matches!(result, Err(CoreError::ConfirmationMismatch(_))));
    }

    #[tokio::test]
    async fn test_delete_account_hides_reports() {
        let mut mocks = Mocks::default();
        mocks
            .users
            .expect_update()
            .withf(|user| user.is_deleted && user.email.starts_with("deleted_"))
            .returning(|user| Box::pin(async move { Ok(user) }));
        mocks
            .reports
            .expect_make_private()
            .times(1)
            .returning(|_| Box::pin(async move { Ok(2) }));

        mocks
            .into_service()
            .delete_account(identity(), "JANE@example.com".to_string())
            .await
            .unwrap();
    }
}
