//! Building footprint classification.
//!
//! Buckets raw OSM building records into residential and non-residential
//! counts. The residential label set is the closed set the estimation
//! model was calibrated against; widening it would shift household
//! estimates.

use std::collections::BTreeMap;

use pop_map_households_models::BuildingFootprintSummary;

/// A raw building footprint with its optional `building=*` tag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingRecord {
    /// The `building` tag value, if the way carried one.
    pub building_type: Option<String>,
}

/// Building-type tag values counted as residential.
pub const RESIDENTIAL_TYPES: &[&str] = &[
    "residential",
    "house",
    "apartments",
    "detached",
    "semi",
    "terrace",
    "bungalow",
    "villa",
    "farm",
];

/// Histogram bucket for records without a usable building type.
const UNKNOWN_TYPE: &str = "unknown";

/// Classifies footprint records into a [`BuildingFootprintSummary`].
///
/// Untagged records count toward the total and the `unknown` histogram
/// bucket but never toward the residential count. The residential ratio
/// is `0` for an empty input rather than a division error.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn classify(records: &[BuildingRecord]) -> BuildingFootprintSummary {
    let mut type_histogram: BTreeMap<String, u64> = BTreeMap::new();
    let mut residential_count = 0u64;

    for record in records {
        let building_type = record.building_type.as_deref().unwrap_or(UNKNOWN_TYPE);
        *type_histogram.entry(building_type.to_string()).or_insert(0) += 1;

        if RESIDENTIAL_TYPES.contains(&building_type) {
            residential_count += 1;
        }
    }

    let total_count = records.len() as u64;
    let residential_ratio = if total_count == 0 {
        0.0
    } else {
        residential_count as f64 / total_count as f64
    };

    BuildingFootprintSummary {
        residential_count,
        total_count,
        type_histogram,
        residential_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tag: Option<&str>) -> BuildingRecord {
        BuildingRecord {
            building_type: tag.map(str::to_string),
        }
    }

    #[test]
    fn classifies_mixed_records() {
        let records = vec![
            record(Some("house")),
            record(Some("apartments")),
            record(Some("commercial")),
            record(Some("house")),
            record(None),
        ];
        let summary = classify(&records);

        assert_eq!(summary.total_count, 5);
        assert_eq!(summary.residential_count, 3);
        assert_eq!(summary.type_histogram["house"], 2);
        assert_eq!(summary.type_histogram["commercial"], 1);
        assert_eq!(summary.type_histogram["unknown"], 1);
        assert!((summary.residential_ratio - 0.6).abs() < 1e-12);
    }

    #[test]
    fn unrecognized_tags_are_not_residential() {
        let records = vec![record(Some("cathedral")), record(Some("garage"))];
        let summary = classify(&records);
        assert_eq!(summary.residential_count, 0);
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.type_histogram["cathedral"], 1);
    }

    #[test]
    fn empty_input_has_zero_ratio() {
        let summary = classify(&[]);
        assert_eq!(summary, BuildingFootprintSummary::empty());
    }

    #[test]
    fn farm_counts_as_residential() {
        // "farm" is part of the calibrated residential set even though its
        // residential nature is debatable.
        let summary = classify(&[record(Some("farm"))]);
        assert_eq!(summary.residential_count, 1);
    }
}
