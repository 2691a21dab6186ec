use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    common::round2,
    hormone::entities::Trend,
    report::{
        entities::Report,
        helpers::{hormone_names, percent_change},
    },
};

use super::value_objects::{DashboardTrendPoint, HormoneStats, TrendPoint};

fn hormone_values(report: &Report) -> BTreeMap<String, f64> {
    report
        .hormone_data
        .iter()
        .map(|h| (h.name.clone(), h.value))
        .collect()
}

pub fn dashboard_trend(reports: &[Report]) -> Vec<DashboardTrendPoint> {
    reports
        .iter()
        .map(|report| DashboardTrendPoint {
            date: report.report_date,
            score: report.overall_score(),
            hormones: hormone_values(report),
        })
        .collect()
}

pub fn trend_points(reports: &[Report]) -> Vec<TrendPoint> {
    reports
        .iter()
        .map(|report| TrendPoint {
            date: report.report_date,
            overall_score: report.overall_score(),
            values: hormone_values(report),
        })
        .collect()
}

/// Per-hormone movement across reports ordered by report date.
///
/// Needs more than one report, and at least two values for a hormone to describe it.
/// `only` narrows the result to a single hormone name.
pub fn hormone_stats(reports: &[Report], only: Option<&str>) -> BTreeMap<String, HormoneStats> {
    let mut stats = BTreeMap::new();
    if reports.len() < 2 {
        return stats;
    }

    for name in hormone_names(reports) {
        if only.is_some_and(|filter| !name.eq_ignore_ascii_case(filter)) {
            continue;
        }

        let values: Vec<f64> = reports
            .iter()
            .filter_map(|r| r.hormone_data.iter().find(|h| h.name == name))
            .map(|h| h.value)
            .collect();

        if values.len() < 2 {
            continue;
        }

        let first = values[0];
        let change = values[values.len() - 1] - first;
        let sum: f64 = values.iter().sum();

        stats.insert(
            name,
            HormoneStats {
                trend: Trend::from_change(change),
                change: round2(change),
                percent_change: percent_change(change, first),
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                avg: round2(sum / values.len() as f64),
            },
        );
    }

    stats
}

/// Frees the original address for a future sign-up.
pub fn tombstone_email(email: &str, now: DateTime<Utc>) -> String {
    format!("deleted_{}_{}", now.timestamp_millis(), email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        hormone::entities::{HormoneReading, HormoneStatus, ReferenceRange},
        report::entities::ReportMetadata,
    };
    use chrono::TimeZone;
    use uuid::Uuid;

    fn report(values: &[(&str, f64)]) -> Report {
        let mut report = Report::new(
            Uuid::new_v4(),
            None,
            None,
            None,
            Vec::new(),
            ReportMetadata::default(),
            Vec::new(),
        );
        report.hormone_data = values
            .iter()
            .map(|(name, value)| HormoneReading {
                name: name.to_string(),
                full_name: name.to_string(),
                value: *value,
                unit: "ng/mL".to_string(),
                reference_range: ReferenceRange::default(),
                status: HormoneStatus::Normal,
                trend: None,
                change: None,
            })
            .collect();
        report
    }

    #[test]
    fn test_hormone_stats() {
        let reports = vec![
            report(&[("TSH", 2.0), ("E2", 100.0)]),
            report(&[("TSH", 1.0)]),
            report(&[("TSH", 1.5), ("E2", 80.0)]),
        ];

        let stats = hormone_stats(&reports, None);

        let tsh = &stats["TSH"];
        assert_eq!(tsh.trend, Trend::Down);
        assert_eq!(tsh.change, -0.5);
        assert_eq!(tsh.percent_change, -25.0);
        assert_eq!(tsh.min, 1.0);
        assert_eq!(tsh.max, 2.0);
        assert_eq!(tsh.avg, 1.5);
        assert_eq!(stats["E2"].change, -20.0);
    }

    #[test]
    fn test_hormone_stats_filter_and_single_report() {
        let reports = vec![report(&[("TSH", 2.0), ("E2", 1.0)]), report(&[("TSH", 3.0), ("E2", 2.0)])];

        let stats = hormone_stats(&reports, Some("tsh"));
        assert_eq!(stats.len(), 1);
        assert!(stats.contains_key("TSH"));

        assert!(hormone_stats(&reports[..1], None).is_empty());
    }

    #[test]
    fn test_tombstone_email() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            tombstone_email("a@b.c", now),
            format!("deleted_{}_a@b.c", now.timestamp_millis())
        );
    }
}
