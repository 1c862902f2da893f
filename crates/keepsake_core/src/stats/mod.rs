//! Aggregate read-only computations over snapshots.
//!
//! # Responsibility
//! - Compute the counts, averages, percentages, distributions and
//!   best/worst lookups the dashboard screens show.
//!
//! # Invariants
//! - Every function is pure over its inputs.
//! - Averages below the sample threshold report insufficient data
//!   instead of a value; no computation ever yields NaN.
//! - Ties resolve deterministically (earliest `created_at` then id for
//!   extremum lookups, alphabetical labels for histograms).

use std::collections::BTreeMap;

use crate::model::entry::Entry;
use crate::query::DateRange;
use crate::time::whole_days_between;

/// Filterable/aggregable dimension of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Category,
    Status,
    Condition,
    Mood,
}

fn facet_label(entry: &Entry, facet: Facet) -> Option<String> {
    match facet {
        Facet::Category => entry.category.clone(),
        Facet::Status => entry.status.map(|status| status.to_string()),
        Facet::Condition => entry.condition.map(|condition| condition.to_string()),
        Facet::Mood => entry.mood.map(|mood| mood.to_string()),
    }
}

/// Numeric or ordinal measure of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Mood scale score, 1..=5.
    MoodScore,
    /// Item condition rank, 1..=5 with 5 best.
    ConditionRank,
}

impl Metric {
    /// The metric value, when the entry carries the underlying field.
    pub fn value(self, entry: &Entry) -> Option<f64> {
        match self {
            Self::MoodScore => entry.mood.map(|mood| f64::from(mood.score())),
            Self::ConditionRank => entry
                .condition
                .map(|condition| f64::from(condition.rank())),
        }
    }
}

/// Minimum qualifying entries before an average is reported.
pub const MIN_AVERAGE_SAMPLES: usize = 3;

/// Result of an average computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AverageOutcome {
    Value(f64),
    /// Fewer qualifying entries than the domain minimum; no number is
    /// reported at all rather than a misleading small-sample average.
    InsufficientData { required: usize, actual: usize },
}

/// Counts entries per facet value. Values with zero count are absent.
pub fn count_by(entries: &[Entry], facet: Facet) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        if let Some(label) = facet_label(entry, facet) {
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    counts
}

/// Averages a metric over the entries whose `entry_date` falls in
/// `range` (all entries when `range` is `None`).
///
/// Entries without the metric's field never qualify.
pub fn average(
    entries: &[Entry],
    metric: Metric,
    range: Option<DateRange>,
    min_samples: usize,
) -> AverageOutcome {
    let values: Vec<f64> = entries
        .iter()
        .filter(|entry| match range {
            Some(range) => entry
                .entry_date
                .is_some_and(|date_ms| range.contains(date_ms)),
            None => true,
        })
        .filter_map(|entry| metric.value(entry))
        .collect();

    if values.len() < min_samples.max(1) {
        return AverageOutcome::InsufficientData {
            required: min_samples.max(1),
            actual: values.len(),
        };
    }

    let sum: f64 = values.iter().sum();
    AverageOutcome::Value(sum / values.len() as f64)
}

/// Share of `part` in `whole` as a percentage. Zero when `whole` is
/// zero; never a division error.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Max,
    Min,
}

/// Best or worst entry by a metric. Entries without the metric's field
/// are skipped; ties resolve to the earliest `created_at`, then the
/// smaller id.
pub fn extremum<'a>(entries: &'a [Entry], metric: Metric, which: Extremum) -> Option<&'a Entry> {
    let mut best: Option<(f64, &Entry)> = None;

    for entry in entries {
        let Some(value) = metric.value(entry) else {
            continue;
        };

        let better = match best {
            None => true,
            Some((best_value, best_entry)) => {
                let primary = match which {
                    Extremum::Max => value.total_cmp(&best_value),
                    Extremum::Min => best_value.total_cmp(&value),
                };
                primary
                    .then_with(|| best_entry.created_at.cmp(&entry.created_at))
                    .then_with(|| best_entry.id.cmp(&entry.id))
                    .is_gt()
            }
        };

        if better {
            best = Some((value, entry));
        }
    }

    best.map(|(_, entry)| entry)
}

/// Whole days between the entry's calendar anchor (falling back to its
/// creation time) and `as_of_ms`, truncated toward zero.
pub fn age_in_days(entry: &Entry, as_of_ms: i64) -> i64 {
    let anchor_ms = entry.entry_date.unwrap_or(entry.created_at);
    whole_days_between(anchor_ms, as_of_ms)
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount {
    pub label: String,
    pub count: usize,
}

/// Histogram over a facet, sorted by descending count with alphabetical
/// labels breaking ties.
pub fn distribution(entries: &[Entry], facet: Facet) -> Vec<FacetCount> {
    let mut buckets: Vec<FacetCount> = count_by(entries, facet)
        .into_iter()
        .map(|(label, count)| FacetCount { label, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets
}
