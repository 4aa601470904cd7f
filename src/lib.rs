//! Randomized Hoare-partition quicksort over `f64` sequences, with a harness
//! that times each sort and aggregates the timings by declared input size.
//!
//! The algorithm lives in `matlib`, timing aggregation and reports in
//! `stats`, and file handling in `sortio`; this crate ties them together
//! with the timer and the batch runner.

pub mod batch;
pub mod errors;
pub mod timer;

pub use matlib;
pub use sortio;
pub use stats;

pub use batch::{BatchItem, BatchOutcome, BatchRunner, CompletedSort, FailurePolicy, ItemFailure};
pub use errors::{BatchError, ItemError};
pub use matlib::{Mwc256, QuickSorter, SortError};
pub use stats::{SizeLabel, TimingRecord, TimingTable};
pub use timer::{duration_ms, time_sort};
