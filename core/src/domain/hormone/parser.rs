use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{
    entities::{HormoneReading, HormoneStatus, ReferenceRange},
    reference::{
        Gender, HORMONE_ALIASES, calculate_status, canonical_unit, full_name_for,
        normalize_hormone_name, reference_range,
    },
};

const UNIT_PATTERN: &str = r"pg/ml|pmol/l|ng/dl|nmol/l|ng/ml|miu/ml|miu/l|iu/l|[uµμ]iu/ml|[uµμ]g/l|[uµμ]g/dl|mg/dl|mmol/mol|mmol/l|ng/l|mu/l|[uµμ]u/ml|%";

static READING_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let mut aliases: Vec<&str> = HORMONE_ALIASES.iter().map(|(alias, _)| *alias).collect();
    aliases.sort_by_key(|alias| std::cmp::Reverse(alias.len()));

    let names = aliases
        .iter()
        .map(|alias| regex::escape(alias).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");

    let pattern = format!(
        r"(?i)\b(?P<name>{names})\b(?:\s*\([^)]*\))?\s*[:=]?\s*(?P<value>\d+(?:\.\d+)?)\s*(?P<unit>{UNIT_PATTERN})(?:\s*\(?\s*(?:ref(?:erence)?(?:\s+range)?\s*[:=]?\s*)?(?P<min>\d+(?:\.\d+)?)\s*[-–]\s*(?P<max>\d+(?:\.\d+)?)\s*\)?)?"
    );

    Regex::new(&pattern)
        .map_err(|e| tracing::error!("Failed to compile hormone pattern: {}", e))
        .ok()
});

/// Extracts hormone readings from free text, one reading per hormone.
///
/// A range printed next to the value takes precedence over the reference table.
pub fn parse_hormone_data(text: &str) -> Vec<HormoneReading> {
    let Some(regex) = READING_REGEX.as_ref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut readings = Vec::new();

    for line in text.lines() {
        for caps in regex.captures_iter(line) {
            let name = normalize_hormone_name(&caps["name"]);
            if seen.contains(&name) {
                continue;
            }

            let Ok(value) = caps["value"].parse::<f64>() else {
                continue;
            };
            let unit = canonical_unit(&caps["unit"]);

            let printed_range = match (caps.name("min"), caps.name("max")) {
                (Some(min), Some(max)) => {
                    match (min.as_str().parse::<f64>(), max.as_str().parse::<f64>()) {
                        (Ok(min), Ok(max)) if min <= max => {
                            Some(ReferenceRange::new(min, max, &unit))
                        }
                        _ => None,
                    }
                }
                _ => None,
            };

            let reference_range = printed_range
                .or_else(|| reference_range(&name, &unit, Gender::default()))
                .unwrap_or_default();

            let status =
                calculate_status(value, &reference_range).unwrap_or(HormoneStatus::Normal);

            seen.insert(name.clone());
            readings.push(HormoneReading {
                full_name: full_name_for(&name),
                name,
                value,
                unit,
                reference_range,
                status,
                trend: None,
                change: None,
            });
        }
    }

    readings
}

/// Lists the problems of each invalid reading; an empty list means the data is usable.
pub fn validate_hormone_data(readings: &[HormoneReading]) -> Vec<String> {
    let mut errors = Vec::new();

    for (index, reading) in readings.iter().enumerate() {
        if reading.name.trim().is_empty() {
            errors.push(format!("Hormone at index {index} is missing a name"));
        }
        if !reading.value.is_finite() {
            errors.push(format!("Hormone at index {index} has an invalid value"));
        }
        if reading.unit.trim().is_empty() {
            errors.push(format!("Hormone at index {index} is missing a unit"));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Patient: Jane Doe
Test date: 2024-03-01
Estradiol (E2): 145.2 pg/mL 30 - 400
TSH 5.1 mIU/L
Free T4 = 1.2 ng/dL
Prolactin 25 ng/ml (ref 4.8-23.3)
Cortisol 12 μg/dL
E2 99 pg/mL
";

    #[test]
    fn test_parse_sample_report() {
        let readings = parse_hormone_data(SAMPLE);
        let names: Vec<&str> = readings.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["E2", "TSH", "Free T4", "Prolactin", "Cortisol"]);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let readings = parse_hormone_data(SAMPLE);
        let e2 = readings.iter().find(|r| r.name == "E2").unwrap();

        assert_eq!(e2.value, 145.2);
        assert_eq!(e2.full_name, "Estradiol");
        assert_eq!(e2.status, HormoneStatus::Normal);
    }

    #[test]
    fn test_status_from_reference_table() {
        let readings = parse_hormone_data(SAMPLE);
        let tsh = readings.iter().find(|r| r.name == "TSH").unwrap();

        assert_eq!(tsh.status, HormoneStatus::High);
        assert_eq!(tsh.reference_range.max, Some(4.2));
    }

    #[test]
    fn test_printed_range_and_unit_normalization() {
        let readings = parse_hormone_data(SAMPLE);
        let prolactin = readings.iter().find(|r| r.name == "Prolactin").unwrap();

        assert_eq!(prolactin.unit, "ng/mL");
        assert_eq!(prolactin.reference_range.min, Some(4.8));
        assert_eq!(prolactin.status, HormoneStatus::High);
    }

    #[test]
    fn test_unknown_range_defaults_to_normal() {
        let readings = parse_hormone_data(SAMPLE);
        let cortisol = readings.iter().find(|r| r.name == "Cortisol").unwrap();

        assert!(cortisol.reference_range.is_empty());
        assert_eq!(cortisol.status, HormoneStatus::Normal);
    }

    #[test]
    fn test_lines_without_unit_are_ignored() {
        assert!(parse_hormone_data("Test date 2024").is_empty());
        assert!(parse_hormone_data("").is_empty());
    }

    #[test]
    fn test_validate_hormone_data() {
        let mut readings = parse_hormone_data("TSH 2.0 mIU/L");
        assert!(validate_hormone_data(&readings).is_empty());

        readings[0].unit = String::new();
        readings[0].value = f64::NAN;
        assert_eq!(validate_hormone_data(&readings).len(), 2);
    }
}
