use serde_json::Value;

use crate::domain::hormone::entities::{HormoneReading, HormoneStatus};

use super::entities::{
    AiAnalysis, Insight, InsightCategory, InsightType, Priority, Recommendation, RiskLevel,
    Severity,
};

const DEFAULT_SCORE: f64 = 50.0;
const DEFAULT_CONFIDENCE: f64 = 0.7;
const UNPARSED_CONFIDENCE: f64 = 0.6;
const UNAVAILABLE_CONFIDENCE: f64 = 0.5;
const SUMMARY_EXCERPT_CHARS: usize = 500;

pub const UNAVAILABLE_SUMMARY: &str =
    "Basic analysis completed. AI analysis temporarily unavailable.";

/// Share of normal readings as a 0-100 score; 50 when nothing was measured.
pub fn basic_score(readings: &[HormoneReading]) -> u8 {
    if readings.is_empty() {
        return DEFAULT_SCORE as u8;
    }

    let normal = readings.iter().filter(|r| r.is_normal()).count();
    (normal as f64 / readings.len() as f64 * 100.0).round() as u8
}

pub fn basic_insights(readings: &[HormoneReading]) -> Vec<Insight> {
    let abnormal: Vec<&HormoneReading> = readings.iter().filter(|r| !r.is_normal()).collect();

    if abnormal.is_empty() {
        return vec![Insight {
            insight_type: InsightType::Positive,
            title: "Hormone Levels Normal".to_string(),
            description: "All tested hormone levels are within normal ranges.".to_string(),
            severity: Severity::Low,
            category: InsightCategory::HormoneBalance,
            recommendations: vec![Recommendation {
                action: "Continue current lifestyle and regular monitoring".to_string(),
                priority: Priority::Low,
                timeframe: Some("ongoing".to_string()),
            }],
        }];
    }

    abnormal
        .into_iter()
        .map(|reading| {
            let status = reading.status.as_str();
            Insight {
                insight_type: InsightType::Warning,
                title: format!("{} {}", reading.full_name, status),
                description: format!(
                    "{} level is {}. Consider consulting with a healthcare provider.",
                    reading.full_name, status
                ),
                severity: if reading.status == HormoneStatus::Critical {
                    Severity::High
                } else {
                    Severity::Medium
                },
                category: InsightCategory::MedicalAttention,
                recommendations: vec![Recommendation {
                    action: "Consult with healthcare provider".to_string(),
                    priority: Priority::High,
                    timeframe: Some("within 1-2 weeks".to_string()),
                }],
            }
        })
        .collect()
}

fn basic_analysis(readings: &[HormoneReading], summary: String, confidence: f64) -> AiAnalysis {
    AiAnalysis {
        overall_score: basic_score(readings),
        risk_level: RiskLevel::Moderate,
        summary,
        insights: basic_insights(readings),
        processed_at: None,
        processing_time: None,
        ai_model: None,
        confidence,
    }
}

/// Analysis used when the language model could not be reached.
pub fn unavailable_analysis(readings: &[HormoneReading]) -> AiAnalysis {
    basic_analysis(
        readings,
        UNAVAILABLE_SUMMARY.to_string(),
        UNAVAILABLE_CONFIDENCE,
    )
}

/// The outermost `{...}` span of the text, if any.
fn outer_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn excerpt(text: &str) -> String {
    let head: String = text.chars().take(SUMMARY_EXCERPT_CHARS).collect();
    format!("{head}...")
}

/// Turns the model's reply into an analysis, clamping every field into range.
///
/// Replies without a parseable JSON object fall back to the basic analysis with the
/// start of the reply as summary.
pub fn parse_ai_response(response: &str, readings: &[HormoneReading]) -> AiAnalysis {
    let parsed = outer_json_block(response)
        .and_then(|block| serde_json::from_str::<Value>(block).ok())
        .filter(Value::is_object);

    let Some(parsed) = parsed else {
        tracing::warn!("model reply did not contain a JSON object");
        return basic_analysis(readings, excerpt(response), UNPARSED_CONFIDENCE);
    };

    let overall_score = parsed
        .get("overallScore")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite())
        .unwrap_or(DEFAULT_SCORE)
        .clamp(0.0, 100.0)
        .round() as u8;

    let risk_level = parsed
        .get("riskLevel")
        .and_then(Value::as_str)
        .and_then(RiskLevel::parse)
        .unwrap_or(RiskLevel::Moderate);

    let summary = parsed
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Analysis completed")
        .to_string();

    let insights = parsed
        .get("insights")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<Insight>(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    let confidence = parsed
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    AiAnalysis {
        overall_score,
        risk_level,
        summary,
        insights,
        processed_at: None,
        processing_time: None,
        ai_model: None,
        confidence,
    }
}

/// Insights whose title or description mention the reading by short or full name.
pub fn insights_for_hormone(reading: &HormoneReading, insights: &[Insight]) -> Vec<Insight> {
    insights
        .iter()
        .filter(|i| i.mentions(&reading.name) || i.mentions(&reading.full_name))
        .cloned()
        .collect()
}
