use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    common::round2,
    hormone::entities::{HormoneReading, Trend},
    report::entities::Report,
};

use super::entities::{ChartPoint, Charts, ComparisonBar, TrendSeries};

/// Builds the chart views for a report.
///
/// `history` holds the owner's earlier analyzed reports ordered by report date; each
/// trend series ends with the current reading taken on `report_date`.
pub fn generate_charts(
    readings: &[HormoneReading],
    report_date: DateTime<Utc>,
    history: &[Report],
) -> Charts {
    let trend = readings
        .iter()
        .map(|reading| {
            let mut points: Vec<ChartPoint> = history
                .iter()
                .filter_map(|report| {
                    report
                        .hormone_data
                        .iter()
                        .find(|h| h.name == reading.name)
                        .map(|h| ChartPoint {
                            date: report.report_date,
                            value: h.value,
                        })
                })
                .collect();

            points.push(ChartPoint {
                date: report_date,
                value: reading.value,
            });

            TrendSeries {
                name: reading.name.clone(),
                unit: reading.unit.clone(),
                points,
            }
        })
        .collect();

    let comparison = readings
        .iter()
        .map(|reading| ComparisonBar {
            name: reading.name.clone(),
            value: reading.value,
            min: reading.reference_range.min,
            max: reading.reference_range.max,
            status: reading.status,
        })
        .collect();

    let mut distribution = BTreeMap::new();
    for reading in readings {
        *distribution
            .entry(reading.status.as_str().to_string())
            .or_insert(0) += 1;
    }

    Charts {
        trend,
        comparison,
        distribution,
    }
}

/// Sets `trend` and `change` on each reading against its latest earlier value.
pub fn annotate_trends(readings: &mut [HormoneReading], history: &[Report]) {
    for reading in readings.iter_mut() {
        let previous = history
            .iter()
            .rev()
            .find_map(|report| report.hormone_data.iter().find(|h| h.name == reading.name));

        if let Some(previous) = previous {
            let change = reading.value - previous.value;
            reading.trend = Some(Trend::from_change(change));
            reading.change = Some(round2(change));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        hormone::entities::{HormoneStatus, ReferenceRange},
        report::entities::ReportMetadata,
    };
    use chrono::TimeZone;
    use uuid::Uuid;

    fn reading(name: &str, value: f64, status: HormoneStatus) -> HormoneReading {
        HormoneReading {
            name: name.to_string(),
            full_name: name.to_string(),
            value,
            unit: "mIU/L".to_string(),
            reference_range: ReferenceRange::new(0.27, 4.2, "mIU/L"),
            status,
            trend: None,
            change: None,
        }
    }

    fn past(month: u32, readings: Vec<HormoneReading>) -> Report {
        let mut report = Report::new(
            Uuid::new_v4(),
            None,
            None,
            Some(Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap()),
            Vec::new(),
            ReportMetadata::default(),
            Vec::new(),
        );
        report.hormone_data = readings;
        report
    }

    #[test]
    fn test_generate_charts() {
        let history = vec![
            past(1, vec![reading("TSH", 2.0, HormoneStatus::Normal)]),
            past(2, vec![reading("E2", 90.0, HormoneStatus::Normal)]),
        ];
        let current = vec![
            reading("TSH", 5.0, HormoneStatus::High),
            reading("LH", 3.0, HormoneStatus::Normal),
        ];
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let charts = generate_charts(&current, now, &history);

        assert_eq!(charts.trend.len(), 2);
        assert_eq!(charts.trend[0].points.len(), 2);
        assert_eq!(charts.trend[0].points[1].date, now);
        assert_eq!(charts.trend[1].points.len(), 1);
        assert_eq!(charts.comparison[0].max, Some(4.2));
        assert_eq!(charts.distribution.get("high"), Some(&1));
        assert_eq!(charts.distribution.get("normal"), Some(&1));
    }

    #[test]
    fn test_annotate_trends_uses_latest_value() {
        let history = vec![
            past(1, vec![reading("TSH", 1.0, HormoneStatus::Normal)]),
            past(2, vec![reading("TSH", 3.0, HormoneStatus::Normal)]),
        ];
        let mut current = vec![
            reading("TSH", 2.5, HormoneStatus::Normal),
            reading("LH", 3.0, HormoneStatus::Normal),
        ];

        annotate_trends(&mut current, &history);

        assert_eq!(current[0].trend, Some(Trend::Down));
        assert_eq!(current[0].change, Some(-0.5));
        assert_eq!(current[1].trend, None);
    }
}
