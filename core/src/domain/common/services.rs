use crate::domain::{
    analysis::ports::{LLMClient, TextExtractor},
    authentication::ports::{GoogleTokenVerifier, TokenRepository},
    common::StorageConfig,
    health::ports::HealthCheckRepository,
    report::ports::ReportRepository,
    storage::ports::{FileStorage, ThumbnailGenerator},
    user::ports::UserRepository,
};

/// Holds every port; each domain implements its service trait on this struct.
#[derive(Clone)]
pub struct Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
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
    pub(crate) user_repository: U,
    pub(crate) report_repository: RP,
    pub(crate) health_check_repository: HC,
    pub(crate) llm_client: LLM,
    pub(crate) text_extractor: TE,
    pub(crate) file_storage: FS,
    pub(crate) thumbnail_generator: TH,
    pub(crate) token_repository: TK,
    pub(crate) google_verifier: GV,
    pub(crate) storage_config: StorageConfig,
    pub(crate) google_client_id: String,
}

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
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
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repository: U,
        report_repository: RP,
        health_check_repository: HC,
        llm_client: LLM,
        text_extractor: TE,
        file_storage: FS,
        thumbnail_generator: TH,
        token_repository: TK,
        google_verifier: GV,
        storage_config: StorageConfig,
        google_client_id: String,
    ) -> Self {
        Self {
            user_repository,
            report_repository,
            health_check_repository,
            llm_client,
            text_extractor,
            file_storage,
            thumbnail_generator,
            token_repository,
            google_verifier,
            storage_config,
            google_client_id,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Service;
    use crate::domain::{
        analysis::ports::{MockLLMClient, MockTextExtractor},
        authentication::ports::{MockGoogleTokenVerifier, MockTokenRepository},
        common::StorageConfig,
        health::ports::MockHealthCheckRepository,
        report::ports::MockReportRepository,
        storage::ports::{MockFileStorage, MockThumbnailGenerator},
        user::ports::MockUserRepository,
    };

    pub type MockService = Service<
        MockUserRepository,
        MockReportRepository,
        MockHealthCheckRepository,
        MockLLMClient,
        MockTextExtractor,
        MockFileStorage,
        MockThumbnailGenerator,
        MockTokenRepository,
        MockGoogleTokenVerifier,
    >;

    /// Every port starts without expectations; tests set only what they touch.
    pub struct Mocks {
        pub users: MockUserRepository,
        pub reports: MockReportRepository,
        pub health: MockHealthCheckRepository,
        pub llm: MockLLMClient,
        pub extractor: MockTextExtractor,
        pub storage: MockFileStorage,
        pub thumbnails: MockThumbnailGenerator,
        pub tokens: MockTokenRepository,
        pub google: MockGoogleTokenVerifier,
    }

    impl Default for Mocks {
        fn default() -> Self {
            Self {
                users: MockUserRepository::new(),
                reports: MockReportRepository::new(),
                health: MockHealthCheckRepository::new(),
                llm: MockLLMClient::new(),
                extractor: MockTextExtractor::new(),
                storage: MockFileStorage::new(),
                thumbnails: MockThumbnailGenerator::new(),
                tokens: MockTokenRepository::new(),
                google: MockGoogleTokenVerifier::new(),
            }
        }
    }

    impl Mocks {
        pub fn into_service(self) -> MockService {
            Service::new(
                self.users,
                self.reports,
                self.health,
                self.llm,
                self.extractor,
                self.storage,
                self.thumbnails,
                self.tokens,
                self.google,
                StorageConfig::default(),
                "client-id.apps.googleusercontent.com".to_string(),
            )
        }
    }
}
