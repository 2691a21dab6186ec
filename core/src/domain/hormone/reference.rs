use super::entities::{HormoneStatus, ReferenceRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

/// Lower-cased aliases and the canonical name they map to.
pub const HORMONE_ALIASES: &[(&str, &str)] = &[
    ("estradiol", "E2"),
    ("e2", "E2"),
    ("estrogen", "E2"),
    ("testosterone", "Testosterone"),
    ("test", "Testosterone"),
    ("testo", "Testosterone"),
    ("progesterone", "Progesterone"),
    ("prog", "Progesterone"),
    ("lh", "LH"),
    ("luteinizing hormone", "LH"),
    ("fsh", "FSH"),
    ("follicle stimulating hormone", "FSH"),
    ("prolactin", "Prolactin"),
    ("prl", "Prolactin"),
    ("tsh", "TSH"),
    ("thyroid stimulating hormone", "TSH"),
    ("free t4", "Free T4"),
    ("ft4", "Free T4"),
    ("free t3", "Free T3"),
    ("ft3", "Free T3"),
    ("cortisol", "Cortisol"),
    ("dhea-s", "DHEA-S"),
    ("dheas", "DHEA-S"),
    ("insulin", "Insulin"),
    ("glucose", "Glucose"),
    ("hba1c", "HbA1c"),
    ("vitamin d", "Vitamin D"),
    ("vit d", "Vitamin D"),
    ("25-oh vitamin d", "Vitamin D"),
];

pub fn normalize_hormone_name(name: &str) -> String {
    let key = name.trim().to_lowercase();
    let key = key.split_whitespace().collect::<Vec<_>>().join(" ");

    HORMONE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| name.trim().to_string())
}

pub fn full_name_for(name: &str) -> String {
    match name {
        "E2" => "Estradiol",
        "LH" => "Luteinizing Hormone",
        "FSH" => "Follicle Stimulating Hormone",
        "TSH" => "Thyroid Stimulating Hormone",
        "Free T4" => "Free Thyroxine",
        "Free T3" => "Free Triiodothyronine",
        "DHEA-S" => "Dehydroepiandrosterone Sulfate",
        "HbA1c" => "Hemoglobin A1c",
        "Vitamin D" => "25-Hydroxy Vitamin D",
        other => other,
    }
    .to_string()
}

/// Canonical spelling of a unit: micro signs unified to `μ`, known units matched case-insensitively.
pub fn canonical_unit(unit: &str) -> String {
    const UNITS: &[&str] = &[
        "pg/mL", "pmol/L", "ng/dL", "nmol/L", "ng/mL", "mIU/mL", "mIU/L", "IU/L", "μIU/mL",
        "μg/L", "μg/dL", "mg/dL", "mmol/L", "mmol/mol", "ng/L", "mU/L", "μU/mL", "%",
    ];

    let unified = unit.trim().replace('µ', "μ");
    let unified = match unified.strip_prefix(['u', 'U']) {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => format!("μ{rest}"),
        _ => unified,
    };

    UNITS
        .iter()
        .find(|known| known.to_lowercase() == unified.to_lowercase())
        .map(|known| known.to_string())
        .unwrap_or(unified)
}

pub fn reference_range(name: &str, unit: &str, gender: Gender) -> Option<ReferenceRange> {
    let unit = canonical_unit(unit);

    let (min, max) = match (name, unit.as_str(), gender) {
        ("E2", "pg/mL", _) => (30.0, 400.0),
        ("E2", "pmol/L", _) => (110.0, 1468.0),
        ("Testosterone", "ng/dL", Gender::Female) => (15.0, 70.0),
        ("Testosterone", "nmol/L", Gender::Female) => (0.5, 2.4),
        ("Testosterone", "ng/dL", Gender::Male) => (300.0, 1000.0),
        ("Testosterone", "nmol/L", Gender::Male) => (10.4, 34.7),
        ("Progesterone", "ng/mL", _) => (0.2, 25.0),
        ("Progesterone", "nmol/L", _) => (0.6, 79.5),
        ("LH", "mIU/mL" | "IU/L", _) => (2.4, 12.6),
        ("FSH", "mIU/mL" | "IU/L", _) => (3.5, 12.5),
        ("TSH", "mIU/L" | "μIU/mL", _) => (0.27, 4.2),
        ("Free T4", "ng/dL", _) => (0.93, 1.7),
        ("Free T4", "pmol/L", _) => (12.0, 22.0),
        ("Prolactin", "ng/mL" | "μg/L", _) => (4.8, 23.3),
        _ => return None,
    };

    Some(ReferenceRange::new(min, max, &unit))
}

/// `None` when the range carries no bounds.
pub fn calculate_status(value: f64, range: &ReferenceRange) -> Option<HormoneStatus> {
    if range.is_empty() {
        return None;
    }

    if let Some(max) = range.max
        && max > 0.0
        && value > max * 2.0
    {
        return Some(HormoneStatus::Critical);
    }
    if let Some(min) = range.min
        && min > 0.0
        && value < min / 2.0
    {
        return Some(HormoneStatus::Critical);
    }

    if range.min.is_some_and(|min| value < min) {
        Some(HormoneStatus::Low)
    } else if range.max.is_some_and(|max| value > max) {
        Some(HormoneStatus::High)
    } else {
        Some(HormoneStatus::Normal)
    }
}
