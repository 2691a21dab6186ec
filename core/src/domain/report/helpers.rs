use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    common::round2,
    hormone::entities::{HormoneReading, Trend},
};

use super::{
    entities::{Report, ReportStatus},
    value_objects::{
        ComparedReport, ComparisonTrends, HormoneComparison, HormoneDataPoint, MonthlyTrend,
        Period, ReportComparison, ReportExport, ReportInfo, ScoreChange, ScoreTrend,
        StatsOverview,
    },
};

/// Change relative to `base` in percent, two decimals; zero when the base is zero.
pub fn percent_change(change: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        round2(change / base * 100.0)
    }
}

/// Hormone names in order of first appearance across the given reports.
pub fn hormone_names<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for report in reports {
        for reading in &report.hormone_data {
            if !names.contains(&reading.name) {
                names.push(reading.name.clone());
            }
        }
    }
    names
}

pub fn build_stats_overview(period: Period, reports: &[Report]) -> StatsOverview {
    let analyzed: Vec<&Report> = reports
        .iter()
        .filter(|r| r.status == ReportStatus::Analyzed)
        .collect();

    let scores: Vec<u32> = analyzed
        .iter()
        .filter_map(|r| r.overall_score())
        .map(u32::from)
        .collect();

    let avg_health_score = average_rounded(&scores);

    let mut risk_distribution = BTreeMap::new();
    for analysis in analyzed.iter().filter_map(|r| r.ai_analysis.as_ref()) {
        *risk_distribution
            .entry(analysis.risk_level.as_str().to_string())
            .or_insert(0) += 1;
    }

    let mut months: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for report in &analyzed {
        if let Some(score) = report.overall_score() {
            months
                .entry(report.created_at.format("%Y-%m").to_string())
                .or_default()
                .push(u32::from(score));
        }
    }

    let monthly_trends = months
        .into_iter()
        .map(|(month, scores)| MonthlyTrend {
            avg_score: average_rounded(&scores),
            report_count: scores.len() as u32,
            month,
        })
        .collect();

    StatsOverview {
        period,
        total_reports: reports.len() as u64,
        analyzed_reports: analyzed.len() as u64,
        avg_health_score,
        risk_distribution,
        monthly_trends,
    }
}

pub fn average_rounded(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let sum: u32 = values.iter().sum();
    (f64::from(sum) / values.len() as f64).round() as u32
}

/// Compares analyzed reports already sorted by report date.
///
/// Returns `None` when fewer than two of them carry an analysis.
pub fn compare_reports(reports: &[Report]) -> Option<ReportComparison> {
    let analyzed: Vec<&Report> = reports.iter().filter(|r| r.ai_analysis.is_some()).collect();
    if analyzed.len() < 2 {
        return None;
    }

    let compared = analyzed
        .iter()
        .filter_map(|report| {
            report.ai_analysis.as_ref().map(|analysis| ComparedReport {
                report_id: report.report_id.clone(),
                title: report.title.clone(),
                report_date: report.report_date,
                overall_score: analysis.overall_score,
                risk_level: analysis.risk_level,
            })
        })
        .collect::<Vec<_>>();

    let mut hormone_comparison = BTreeMap::new();
    for name in hormone_names(analyzed.iter().copied()) {
        let data: Vec<HormoneDataPoint> = analyzed
            .iter()
            .filter_map(|report| {
                report
                    .hormone_data
                    .iter()
                    .find(|h| h.name == name)
                    .map(|h| HormoneDataPoint {
                        report_id: report.report_id.clone(),
                        report_date: report.report_date,
                        value: h.value,
                        status: h.status,
                        unit: h.unit.clone(),
                    })
            })
            .collect();

        if data.len() < 2 {
            continue;
        }

        let values: Vec<f64> = data.iter().map(|d| d.value).collect();
        let first = values[0];
        let change = values[values.len() - 1] - first;

        hormone_comparison.insert(
            name,
            HormoneComparison {
                trend: Trend::from_change(change),
                change: round2(change),
                percent_change: percent_change(change, first),
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                data,
            },
        );
    }

    let first_score = i32::from(compared[0].overall_score);
    let score_change = i32::from(compared[compared.len() - 1].overall_score) - first_score;

    Some(ReportComparison {
        reports: compared,
        hormone_comparison,
        trends: ComparisonTrends {
            overall_score: ScoreChange {
                trend: match score_change {
                    c if c > 0 => ScoreTrend::Improving,
                    c if c < 0 => ScoreTrend::Declining,
                    _ => ScoreTrend::Stable,
                },
                change: score_change,
                percent_change: percent_change(f64::from(score_change), f64::from(first_score)),
            },
        },
    })
}

pub fn build_export(report: &Report, exported_by: Uuid, now: DateTime<Utc>) -> ReportExport {
    ReportExport {
        report_info: ReportInfo {
            report_id: report.report_id.clone(),
            title: report.title.clone(),
            description: report.description.clone(),
            report_date: report.report_date,
            status: report.status,
        },
        hormone_data: report.hormone_data.clone(),
        ai_analysis: report.ai_analysis.clone(),
        exported_at: now,
        exported_by,
    }
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn hormones_to_csv(readings: &[HormoneReading]) -> String {
    let header = ["Hormone", "Value", "Unit", "Status", "Reference Range"];

    let mut lines = vec![header.iter().map(|h| csv_field(h)).collect::<Vec<_>>().join(",")];
    for reading in readings {
        let row = [
            reading.full_name.clone(),
            reading.value.to_string(),
            reading.unit.clone(),
            reading.status.as_str().to_string(),
            reading.reference_range.text.clone().unwrap_or_default(),
        ];
        lines.push(row.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        analysis::entities::{AiAnalysis, RiskLevel},
        hormone::entities::{HormoneStatus, ReferenceRange},
        report::entities::ReportMetadata,
    };
    use chrono::TimeZone;

    fn reading(name: &str, value: f64) -> HormoneReading {
        HormoneReading {
            name: name.to_string(),
            full_name: format!("{name} full"),
            value,
            unit: "ng/mL".to_string(),
            reference_range: ReferenceRange::default(),
            status: HormoneStatus::Normal,
            trend: None,
            change: None,
        }
    }

    fn analyzed(score: u8, risk: RiskLevel, month: u32, readings: Vec<HormoneReading>) -> Report {
        let mut report = Report::new(
            Uuid::new_v4(),
            None,
            None,
            Some(Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap()),
            Vec::new(),
            ReportMetadata::default(),
            Vec::new(),
        );
        report.created_at = Utc.with_ymd_and_hms(2024, month, 2, 0, 0, 0).unwrap();
        report.status = ReportStatus::Analyzed;
        report.hormone_data = readings;
        report.ai_analysis = Some(AiAnalysis {
            overall_score: score,
            risk_level: risk,
            summary: String::new(),
            insights: Vec::new(),
            processed_at: None,
            processing_time: None,
            ai_model: None,
            confidence: 0.7,
        });
        report
    }

    #[test]
    fn test_percent_change_zero_base() {
        assert_eq!(percent_change(5.0, 0.0), 0.0);
        assert_eq!(percent_change(1.0, 3.0), 33.33);
    }

    #[test]
    fn test_stats_overview() {
        let mut pending = analyzed(10, RiskLevel::High, 1, Vec::new());
        pending.status = ReportStatus::Uploaded;

        let reports = vec![
            analyzed(70, RiskLevel::Low, 3, Vec::new()),
            analyzed(81, RiskLevel::Moderate, 3, Vec::new()),
            analyzed(60, RiskLevel::Low, 1, Vec::new()),
            pending,
        ];

        let stats = build_stats_overview(Period::SixMonths, &reports);

        assert_eq!(stats.total_reports, 4);
        assert_eq!(stats.analyzed_reports, 3);
        assert_eq!(stats.avg_health_score, 70);
        assert_eq!(stats.risk_distribution.get("low"), Some(&2));
        assert_eq!(stats.monthly_trends.len(), 2);
        assert_eq!(stats.monthly_trends[0].month, "2024-01");
        assert_eq!(stats.monthly_trends[1].avg_score, 76);
        assert_eq!(stats.monthly_trends[1].report_count, 2);
    }

    #[test]
    fn test_compare_reports() {
        let reports = vec![
            analyzed(60, RiskLevel::Moderate, 1, vec![reading("TSH", 2.0), reading("LH", 5.0)]),
            analyzed(75, RiskLevel::Low, 2, vec![reading("TSH", 3.0)]),
        ];

        let comparison = compare_reports(&reports).unwrap();

        assert_eq!(comparison.reports.len(), 2);
        let tsh = &comparison.hormone_comparison["TSH"];
        assert_eq!(tsh.trend, Trend::Up);
        assert_eq!(tsh.change, 1.0);
        assert_eq!(tsh.percent_change, 50.0);
        assert_eq!(tsh.min, 2.0);
        assert_eq!(tsh.max, 3.0);
        assert!(!comparison.hormone_comparison.contains_key("LH"));
        assert_eq!(comparison.trends.overall_score.trend, ScoreTrend::Improving);
        assert_eq!(comparison.trends.overall_score.change, 15);
        assert_eq!(comparison.trends.overall_score.percent_change, 25.0);
    }

    #[test]
    fn test_compare_requires_two_analyzed() {
        let reports = vec![analyzed(60, RiskLevel::Low, 1, Vec::new())];
        assert!(compare_reports(&reports).is_none());
    }

    #[test]
    fn test_csv_quotes_fields() {
        let mut r = reading("E2", 120.5);
        r.full_name = "Estradiol \"E2\"".to_string();
        r.reference_range.text = Some("30-400 pg/mL".to_string());

        let csv = hormones_to_csv(&[r]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "\"Hormone\",\"Value\",\"Unit\",\"Status\",\"Reference Range\""
        );
        assert_eq!(
            lines[1],
            "\"Estradiol \"\"E2\"\"\",\"120.5\",\"ng/mL\",\"normal\",\"30-400 pg/mL\""
        );
    }
}
