use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use matlib::{Mwc256, QuickSorter};
use rand::Rng;
use serde::Deserialize;
use stats::{SizeLabel, TimingRecord, TimingTable};
use tracing::{debug, info, warn};

use crate::errors::{BatchError, ItemError};
use crate::timer::time_sort;

/// What to do when one item of a batch fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and keep going
    #[default]
    Continue,
    /// Stop at the first failure
    Abort,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => f.write_str("continue"),
            FailurePolicy::Abort => f.write_str("abort"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(format!("unknown failure policy {:?} (expected continue or abort)", other)),
        }
    }
}

/// One named sequence to sort. The sequence is a `Result` so upstream
/// read failures flow through the same policy as sort failures.
///
/// An item without a label never gets a bucket; it can only fail.
#[derive(Debug)]
pub struct BatchItem {
    pub id: String,
    pub label: Option<SizeLabel>,
    pub sequence: Result<Vec<f64>, ItemError>,
}

impl BatchItem {
    pub fn new(id: impl Into<String>, label: impl Into<SizeLabel>, sequence: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            sequence: Ok(sequence),
        }
    }

    pub fn failed(id: impl Into<String>, label: impl Into<SizeLabel>, error: ItemError) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            sequence: Err(error),
        }
    }

    /// A failed item whose size could not be determined
    pub fn unlabeled(id: impl Into<String>, error: ItemError) -> Self {
        Self {
            id: id.into(),
            label: None,
            sequence: Err(error),
        }
    }
}

/// A sorted sequence and how long sorting it took
#[derive(Debug, Clone)]
pub struct CompletedSort {
    pub id: String,
    pub label: SizeLabel,
    pub sorted: Vec<f64>,
    pub elapsed_ms: f64,
}

#[derive(Debug)]
pub struct ItemFailure {
    pub id: String,
    pub label: Option<SizeLabel>,
    pub error: ItemError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub table: TimingTable,
    pub completed: usize,
    pub failures: Vec<ItemFailure>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Times and sorts batch items one at a time, collecting elapsed times per
/// size label.
pub struct BatchRunner<R = Mwc256> {
    sorter: QuickSorter<R>,
    policy: FailurePolicy,
}

impl<R: Rng> BatchRunner<R> {
    pub fn new(sorter: QuickSorter<R>, policy: FailurePolicy) -> Self {
        Self { sorter, policy }
    }

    /// Run every item through the sorter and hand each completed sort to
    /// `sink` (usually to write it out). A sink error fails that item.
    ///
    /// Every label seen gets a bucket, even if all of its items failed.
    /// Unlabeled items are counted as failures only.
    #[tracing::instrument(skip_all, fields(policy = %self.policy))]
    pub fn run<I, F>(&mut self, items: I, mut sink: F) -> Result<BatchOutcome, BatchError>
    where
        I: IntoIterator<Item = BatchItem>,
        F: FnMut(&CompletedSort) -> Result<(), ItemError>,
    {
        let mut outcome = BatchOutcome::default();

        for item in items {
            if let Some(label) = &item.label {
                outcome.table.declare(label.clone());
            }

            match self.run_item(item, &mut sink) {
                Ok(record) => {
                    outcome.table.record(record);
                    outcome.completed += 1;
                }
                Err(failure) => {
                    let label = failure.label.as_ref().map_or("-", SizeLabel::as_str);
                    warn!(id = %failure.id, label, error = %failure.error, "item failed");
                    match self.policy {
                        FailurePolicy::Abort => {
                            return Err(BatchError::Aborted {
                                id: failure.id,
                                source: failure.error,
                            });
                        }
                        FailurePolicy::Continue => outcome.failures.push(failure),
                    }
                }
            }
        }

        info!(
            completed = outcome.completed,
            failed = outcome.failures.len(),
            "batch finished"
        );
        Ok(outcome)
    }

    /// Run without an output sink
    pub fn run_sequences<I>(&mut self, items: I) -> Result<BatchOutcome, BatchError>
    where
        I: IntoIterator<Item = BatchItem>,
    {
        self.run(items, |_| Ok(()))
    }

    fn run_item<F>(&mut self, item: BatchItem, sink: &mut F) -> Result<TimingRecord, ItemFailure>
    where
        F: FnMut(&CompletedSort) -> Result<(), ItemError>,
    {
        let BatchItem { id, label, sequence } = item;

        let fail = |id: String, label: SizeLabel, error: ItemError| ItemFailure {
            id,
            label: Some(label),
            error,
        };

        let Some(label) = label else {
            let error = match sequence {
                Err(error) => error,
                Ok(_) => ItemError::Unlabeled {
                    path: PathBuf::from(&id),
                },
            };
            return Err(ItemFailure {
                id,
                label: None,
                error,
            });
        };

        let mut data = match sequence {
            Ok(data) if data.is_empty() => {
                let error = ItemError::Empty { id: id.clone() };
                return Err(fail(id, label, error));
            }
            Ok(data) => data,
            Err(error) => return Err(fail(id, label, error)),
        };

        let elapsed_ms = match time_sort(&mut self.sorter, &mut data) {
            Ok(ms) => ms,
            Err(e) => return Err(fail(id, label, e.into())),
        };
        debug!(%id, %label, n = data.len(), elapsed_ms, "sorted");

        let completed = CompletedSort {
            id,
            label,
            sorted: data,
            elapsed_ms,
        };
        if let Err(error) = sink(&completed) {
            return Err(fail(completed.id, completed.label, error));
        }

        Ok(TimingRecord::new(completed.label, elapsed_ms))
    }
}
