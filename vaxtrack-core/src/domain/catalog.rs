//! Vaccines stocked by the pharmacy.
//!
//! The catalog is advisory: names that match an entry are normalized to its
//! spelling, anything else is kept as entered.

pub const VACCINE_CATALOG: [&str; 14] = [
    "COVID-19",
    "COVID-19 Booster",
    "Hepatitis B",
    "HPV",
    "Influenza",
    "BCG",
    "MMR",
    "Pneumococcal",
    "Tdap",
    "DPT",
    "Measles",
    "Polio",
    "Tetanus",
    "Typhoid",
];

pub fn catalog_entry(name: &str) -> Option<&'static str> {
    let name = name.trim();
    VACCINE_CATALOG
        .iter()
        .copied()
        .find(|entry| entry.eq_ignore_ascii_case(name))
}

/// Trims `raw` and maps catalog matches onto the catalog spelling. Returns
/// `None` for blank input.
pub fn normalize_vaccine_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        catalog_entry(trimmed)
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string()),
    )
}
