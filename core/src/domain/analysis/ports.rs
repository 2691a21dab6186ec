use std::future::Future;

use crate::domain::{
    authentication::value_objects::Identity, common::entities::app_errors::CoreError,
};

use super::value_objects::{AnalysisOutcome, AnalysisResults, HormoneInsights};

/// LLM Client trait for calling chat completion models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    /// Sends one system and one user message, returning the assistant's text.
    fn chat(
        &self,
        system_prompt: String,
        user_prompt: String,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Pulls plain text out of a stored upload
#[cfg_attr(test, mockall::automock)]
pub trait TextExtractor: Send + Sync {
    fn extract(
        &self,
        path: String,
        mimetype: String,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for the report analysis pipeline
#[cfg_attr(test, mockall::automock)]
pub trait AnalysisService: Send + Sync {
    fn analyze_report(
        &self,
        identity: Identity,
        report_id: String,
    ) -> impl Future<Output = Result<AnalysisOutcome, CoreError>> + Send;

    fn get_results(
        &self,
        identity: Identity,
        report_id: String,
    ) -> impl Future<Output = Result<AnalysisResults, CoreError>> + Send;

    /// Clears previous results and runs the pipeline again.
    fn reanalyze(
        &self,
        identity: Identity,
        report_id: String,
    ) -> impl Future<Output = Result<AnalysisOutcome, CoreError>> + Send;

    fn hormone_insights(
        &self,
        identity: Identity,
        report_id: String,
        hormone_name: String,
    ) -> impl Future<Output = Result<HormoneInsights, CoreError>> + Send;
}
