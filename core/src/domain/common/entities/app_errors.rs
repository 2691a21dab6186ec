use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Not found")]
    NotFound,

    #[error("Report not found")]
    ReportNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid input")]
    Invalid,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal server error")]
    InternalServerError,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // authentication
    #[error("Google credential is required")]
    MissingCredential,

    #[error("Refresh token is required")]
    MissingRefreshToken,

    #[error("Invalid Google credential")]
    InvalidCredential,

    #[error("Email not verified with Google")]
    EmailNotVerified,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Account has been deactivated")]
    AccountDeactivated,

    #[error("{0}")]
    ConfirmationMismatch(String),

    // uploads and files
    #[error("No files uploaded")]
    NoFilesUploaded,

    #[error("Too many files. Maximum is {0} files per upload")]
    TooManyFiles(usize),

    #[error("Invalid file type: {0}")]
    UnsupportedFileType(String),

    #[error("File too large")]
    FileTooLarge,

    #[error("Invalid file index")]
    InvalidFileIndex,

    #[error("File not found on disk")]
    FileNotFound,

    #[error("Thumbnail not found")]
    ThumbnailNotFound,

    #[error("Storage error: {0}")]
    StorageError(String),

    // analysis
    #[error("Report is already being processed")]
    AlreadyProcessing,

    #[error("No analysis available for this report")]
    AnalysisNotAvailable,

    #[error("Hormone not found in report")]
    HormoneNotFound,

    #[error("Text extraction failed: {0}")]
    ExtractionError(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("{0}")]
    InvalidComparison(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}
