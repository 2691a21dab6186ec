use std::time::Instant;

use chrono::Utc;
use tracing::instrument;

use crate::domain::{
    analysis::{
        charts::{annotate_trends, generate_charts},
        entities::{AI_MODEL, AiAnalysis, Charts},
        helpers::{insights_for_hormone, parse_ai_response, unavailable_analysis},
        ports::{AnalysisService, LLMClient, TextExtractor},
        prompt::{SYSTEM_PROMPT, build_analysis_prompt},
        value_objects::{AnalysisOutcome, AnalysisResults, HormoneInsights},
    },
    authentication::{
        ports::{GoogleTokenVerifier, TokenRepository},
        value_objects::Identity,
    },
    common::{entities::app_errors::CoreError, services::Service},
    health::ports::HealthCheckRepository,
    hormone::{
        entities::HormoneReading,
        parser::{parse_hormone_data, validate_hormone_data},
    },
    report::{
        entities::{Report, ReportStatus},
        ports::ReportRepository,
    },
    storage::ports::{FileStorage, ThumbnailGenerator},
    user::ports::UserRepository,
};

const EXTRACTION_STEP: &str = "text_extraction";
const ANALYSIS_STEP: &str = "analysis";

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
    /// Concatenates the text of every file; failures are recorded on the report.
    async fn extract_report_text(&self, report: &mut Report) -> String {
        let mut text = String::new();

        for file in report.uploaded_files.clone() {
            match self
                .text_extractor
                .extract(file.path.clone(), file.mimetype.clone())
                .await
            {
                Ok(file_text) => {
                    text.push_str(&file_text);
                    text.push_str("\n\n");
                }
                Err(e) => {
                    tracing::error!(
                        report_id = %report.report_id,
                        file = %file.original_name,
                        error = %e,
                        "text extraction failed"
                    );
                    report.push_error(
                        EXTRACTION_STEP,
                        format!("Failed to extract text from {}: {}", file.original_name, e),
                    );
                }
            }
        }

        text
    }

    async fn ai_analysis(&self, text: &str, readings: &[HormoneReading]) -> AiAnalysis {
        let prompt = build_analysis_prompt(text, readings);

        match self.llm_client.chat(SYSTEM_PROMPT.to_string(), prompt).await {
            Ok(reply) => parse_ai_response(&reply, readings),
            Err(e) => {
                tracing::warn!(error = %e, "language model unavailable, using basic analysis");
                unavailable_analysis(readings)
            }
        }
    }

    /// Parsing, model analysis and charts for already extracted text.
    async fn interpret(
        &self,
        report: &Report,
        text: &str,
        started: Instant,
    ) -> Result<(Vec<HormoneReading>, AiAnalysis, Charts), CoreError> {
        let mut readings = parse_hormone_data(text);
        for problem in validate_hormone_data(&readings) {
            tracing::warn!(report_id = %report.report_id, problem = %problem, "suspicious reading");
        }

        let history: Vec<Report> = self
            .report_repository
            .analyzed(report.user_id, None, None)
            .await?
            .into_iter()
            .filter(|r| r.id != report.id && r.report_date <= report.report_date)
            .collect();

        annotate_trends(&mut readings, &history);

        let mut analysis = self.ai_analysis(text, &readings).await;
        let charts = generate_charts(&readings, report.report_date, &history);

        analysis.processed_at = Some(Utc::now());
        analysis.processing_time = Some(started.elapsed().as_millis() as i64);
        analysis.ai_model = Some(AI_MODEL.to_string());

        Ok((readings, analysis, charts))
    }

    async fn run_analysis(&self, mut report: Report) -> Result<Report, CoreError> {
        if report.status == ReportStatus::Processing
            || !self.report_repository.claim_for_processing(report.id).await?
        {
            return Err(CoreError::AlreadyProcessing);
        }

        let started = Instant::now();
        report.status = ReportStatus::Processing;
        tracing::info!(report_id = %report.report_id, "analysis started");

        let text = self.extract_report_text(&mut report).await;
        report.extracted_text = Some(text.clone());

        let result = match self.interpret(&report, &text, started).await {
            Ok((readings, analysis, charts)) => {
                let mut analyzed = report.clone();
                analyzed.hormone_data = readings;
                analyzed.ai_analysis = Some(analysis);
                analyzed.charts = Some(charts);
                analyzed.status = ReportStatus::Analyzed;
                self.report_repository.update(analyzed).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(report) => {
                tracing::info!(
                    report_id = %report.report_id,
                    readings = report.hormone_data.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "analysis completed"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(report_id = %report.report_id, error = %e, "analysis failed");

                report.status = ReportStatus::Error;
                report.push_error(ANALYSIS_STEP, e.to_string());
                if let Err(save_error) = self.report_repository.update(report).await {
                    tracing::error!(error = %save_error, "failed to record analysis error");
                }

                Err(CoreError::AnalysisFailed(e.to_string()))
            }
        }
    }
}

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> AnalysisService
    for Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
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
    async fn analyze_report(
        &self,
        identity: Identity,
        report_id: String,
    ) -> Result<AnalysisOutcome, CoreError> {
        let report = self.owned_report(&identity, report_id).await?;
        let report = self.run_analysis(report).await?;

        Ok(AnalysisOutcome::from(report))
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn get_results(
        &self,
        identity: Identity,
        report_id: String,
    ) -> Result<AnalysisResults, CoreError> {
        let report = self.owned_report(&identity, report_id).await?;
        Ok(AnalysisResults::from(report))
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn reanalyze(
        &self,
        identity: Identity,
        report_id: String,
    ) -> Result<AnalysisOutcome, CoreError> {
        let mut report = self.owned_report(&identity, report_id).await?;
        if report.status == ReportStatus::Processing {
            return Err(CoreError::AlreadyProcessing);
        }

        report.reset_analysis();
        let report = self.report_repository.update(report).await?;
        tracing::info!(report_id = %report.report_id, "analysis reset");

        let report = self.run_analysis(report).await?;
        Ok(AnalysisOutcome::from(report))
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn hormone_insights(
        &self,
        identity: Identity,
        report_id: String,
        hormone_name: String,
    ) -> Result<HormoneInsights, CoreError> {
        let report = self.owned_report(&identity, report_id).await?;

        let hormone = report
            .get_hormone(&hormone_name)
            .cloned()
            .ok_or(CoreError::HormoneNotFound)?;
        let analysis = report
            .ai_analysis
            .as_ref()
            .ok_or(CoreError::AnalysisNotAvailable)?;

        let insights = insights_for_hormone(&hormone, &analysis.insights);
        let recommendations = insights
            .iter()
            .flat_map(|i| i.recommendations.iter().cloned())
            .collect();

        Ok(HormoneInsights {
            hormone,
            insights,
            recommendations,
        })
    }
}
