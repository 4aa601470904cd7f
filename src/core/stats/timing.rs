use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::stats::{mean, min_max, std_dev};

/// Caller-declared grouping key for timing samples, e.g. "10" or "1000".
///
/// Labels that parse as integers order numerically and come before any
/// non-numeric label; the rest order lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SizeLabel(String);

impl SizeLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn numeric(&self) -> Option<u128> {
        self.0.parse().ok()
    }
}

impl Ord for SizeLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for SizeLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SizeLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SizeLabel {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One completed sort: which bucket it belongs to and how long it took.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    pub label: SizeLabel,
    pub elapsed_ms: f64,
}

impl TimingRecord {
    pub fn new(label: impl Into<SizeLabel>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregate statistics of one bucket. `mean` is None for an empty bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSummary {
    pub label: SizeLabel,
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Timing samples grouped by size label. Samples keep insertion order
/// within a bucket; buckets iterate in label order.
#[derive(Debug, Clone, Default)]
pub struct TimingTable {
    buckets: BTreeMap<SizeLabel, Vec<f64>>,
}

impl TimingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a bucket exists even if no sample ever lands in it
    pub fn declare(&mut self, label: impl Into<SizeLabel>) {
        self.buckets.entry(label.into()).or_default();
    }

    pub fn record(&mut self, record: TimingRecord) {
        self.buckets
            .entry(record.label)
            .or_default()
            .push(record.elapsed_ms);
    }

    pub fn push(&mut self, label: impl Into<SizeLabel>, elapsed_ms: f64) {
        self.record(TimingRecord::new(label, elapsed_ms));
    }

    pub fn samples(&self, label: &SizeLabel) -> Option<&[f64]> {
        self.buckets.get(label).map(Vec::as_slice)
    }

    /// Every sample as a record, grouped by label
    pub fn records(&self) -> impl Iterator<Item = TimingRecord> + '_ {
        self.buckets.iter().flat_map(|(label, samples)| {
            samples
                .iter()
                .map(move |&elapsed_ms| TimingRecord::new(label.clone(), elapsed_ms))
        })
    }

    pub fn summaries(&self) -> Vec<BucketSummary> {
        self.buckets
            .iter()
            .map(|(label, samples)| {
                let extremes = min_max(samples);
                BucketSummary {
                    label: label.clone(),
                    count: samples.len(),
                    mean: mean(samples),
                    std_dev: std_dev(samples),
                    min: extremes.map(|(lo, _)| lo),
                    max: extremes.map(|(_, hi)| hi),
                }
            })
            .collect()
    }

    /// Total number of samples across all buckets
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<TimingRecord> for TimingTable {
    fn from_iter<I: IntoIterator<Item = TimingRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.record(record);
        }
        table
    }
}
