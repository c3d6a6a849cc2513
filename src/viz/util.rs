//! Utility functions for visualization: colors, aggregation, axis sizing.

use crate::models::Sighting;
use ahash::AHashMap;
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;
use std::collections::BTreeMap;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Count `key(s)` over the sightings and return the `limit` largest groups,
/// descending by count, ties by label.
fn top_counts<'a, F>(sightings: &'a [Sighting], limit: usize, key: F) -> Vec<(String, usize)>
where
    F: Fn(&'a Sighting) -> &'a str,
{
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for s in sightings {
        *counts.entry(key(s)).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, c)| (k.to_string(), c))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out.truncate(limit);
    out
}

/// Sighting records per species (by common name).
pub fn species_counts(sightings: &[Sighting], limit: usize) -> Vec<(String, usize)> {
    top_counts(sightings, limit, |s| s.common_name.as_str())
}

/// Sighting records per location name.
pub fn location_counts(sightings: &[Sighting], limit: usize) -> Vec<(String, usize)> {
    top_counts(sightings, limit, |s| s.location.as_str())
}

/// Records per calendar day, ascending. Undated records are left out.
pub fn daily_counts(sightings: &[Sighting]) -> Vec<(NaiveDate, usize)> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for d in sightings.iter().filter_map(|s| s.observed_on) {
        *days.entry(d).or_default() += 1;
    }
    days.into_iter().collect()
}

/// `(public, private)` record counts, or `None` when no record carries the flag.
pub fn privacy_split(sightings: &[Sighting]) -> Option<(usize, usize)> {
    let flagged: Vec<bool> = sightings.iter().filter_map(|s| s.private_location).collect();
    if flagged.is_empty() {
        return None;
    }
    let private = flagged.iter().filter(|p| **p).count();
    Some((flagged.len() - private, private))
}

/// Min/max of the values, widened so that a single point still gets a visible axis.
pub fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let pad = ((hi - lo) * 0.05).max(0.01);
    lo -= pad;
    hi += pad;
    Some((lo, hi))
}

/// Width of a left label area that fits the longest category label.
pub fn compute_left_label_area_px(labels: &[String], font_px: u32) -> u32 {
    let max_px = labels
        .iter()
        .map(|s| estimate_text_width_px(s, font_px))
        .max()
        .unwrap_or(0);
    max_px.saturating_add(18).clamp(48, 320)
}

/// Whole number with thousands separators.
pub fn fmt_count(n: usize) -> String {
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sighting(name: &str, loc: &str, day: Option<u32>, private: Option<bool>) -> Sighting {
        Sighting {
            species_code: name.to_lowercase(),
            common_name: name.into(),
            scientific_name: "x".into(),
            observed: String::new(),
            observed_on: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 5, d)),
            latitude: 42.0,
            longitude: -83.0,
            location: loc.into(),
            location_id: None,
            count: Some(1),
            private_location: private,
        }
    }

    #[test]
    fn species_counts_are_sorted_and_capped() {
        let s = vec![
            sighting("Blue Jay", "A", None, None),
            sighting("American Robin", "A", None, None),
            sighting("Blue Jay", "B", None, None),
            sighting("Cardinal", "B", None, None),
        ];
        let c = species_counts(&s, 2);
        assert_eq!(
            c,
            vec![("Blue Jay".to_string(), 2), ("American Robin".to_string(), 1)]
        );
    }

    #[test]
    fn daily_counts_skip_undated() {
        let s = vec![
            sighting("A", "L", Some(2), None),
            sighting("B", "L", Some(1), None),
            sighting("C", "L", Some(2), None),
            sighting("D", "L", None, None),
        ];
        let d = daily_counts(&s);
        assert_eq!(d.len(), 2);
        assert_eq!(d[0], (NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), 1));
        assert_eq!(d[1].1, 2);
    }

    #[test]
    fn privacy_split_needs_flags() {
        assert_eq!(privacy_split(&[sighting("A", "L", None, None)]), None);
        let s = vec![
            sighting("A", "L", None, Some(true)),
            sighting("B", "L", None, Some(false)),
            sighting("C", "L", None, Some(false)),
        ];
        assert_eq!(privacy_split(&s), Some((2, 1)));
    }

    #[test]
    fn single_point_range_is_widened() {
        let (lo, hi) = padded_range([5.0].into_iter()).unwrap();
        assert!(lo < 5.0 && hi > 5.0);
        assert!(padded_range(std::iter::empty()).is_none());
    }

    #[test]
    fn counts_get_separators() {
        assert_eq!(fmt_count(12345), "12,345");
    }
}
