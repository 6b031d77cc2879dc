//! Persons-per-household ratios by country.
//!
//! Average household sizes for European countries (sources: Eurostat,
//! INSEE). Used to convert a population count into a household count.

/// Country codes with a known household ratio.
pub const SUPPORTED_COUNTRIES: &[&str] = &[
    "FR", "DE", "IT", "ES", "UK", "PL", "NL", "BE", "AT", "CH", "SE", "NO", "DK", "FI", "IE", "PT",
    "EL", "CZ", "HU", "SK", "SI", "HR", "RO", "BG", "LT", "LV", "EE", "CY", "MT", "LU", "IS", "LI",
    "ME", "MK", "AL", "RS", "BA", "XK",
];

/// Ratio applied when the country code is not in the table.
pub const DEFAULT_RATIO: f64 = 2.3;

/// Returns the average persons-per-household ratio for a two-letter
/// country code.
///
/// Codes are case-sensitive. Unknown codes fall back to
/// [`DEFAULT_RATIO`]; this lookup never fails.
#[must_use]
pub fn ratio_for(country_code: &str) -> f64 {
    match country_code {
        "FR" => 2.2,
        "DE" => 2.0,
        "IT" => 2.3,
        "ES" => 2.5,
        "UK" => 2.4,
        "PL" => 2.7,
        "NL" => 2.1,
        "BE" => 2.2,
        "AT" => 2.1,
        "CH" => 2.2,
        "SE" => 2.1,
        "NO" => 2.2,
        "DK" => 2.1,
        "FI" => 2.0,
        "IE" => 2.7,
        "PT" => 2.5,
        "EL" => 2.4,
        "CZ" => 2.3,
        "HU" => 2.3,
        "SK" => 2.4,
        "SI" => 2.3,
        "HR" => 2.7,
        "RO" => 2.4,
        "BG" => 2.5,
        "LT" => 2.3,
        "LV" => 2.2,
        "EE" => 2.1,
        "CY" => 2.4,
        "MT" => 2.4,
        "LU" => 2.3,
        "IS" => 2.4,
        "LI" => 2.3,
        "ME" => 2.8,
        "MK" => 2.9,
        "AL" => 3.0,
        "RS" => 2.8,
        "BA" => 2.9,
        "XK" => 3.0,
        _ => DEFAULT_RATIO,
    }
}
