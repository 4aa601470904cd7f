use std::time::{Duration, Instant};

use matlib::{QuickSorter, SortError};
use rand::Rng;

/// Fractional milliseconds
pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Sort `data` in place and return the wall-clock time the sort took, in
/// milliseconds. Every call is timed, including empty and singleton input.
pub fn time_sort<R: Rng>(sorter: &mut QuickSorter<R>, data: &mut [f64]) -> Result<f64, SortError> {
    let start = Instant::now();
    let result = sorter.sort(data);
    let elapsed = start.elapsed();

    result?;
    Ok(duration_ms(elapsed))
}
