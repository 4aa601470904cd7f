use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::error;

use crate::{Mwc256, random_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("swap({i}, {j}): index out of range for length {len}")]
    IndexOutOfRange { i: usize, j: usize, len: usize },
}

/// Swap two elements. Equal indices are a no-op; an out-of-range index is
/// logged and reported, and the data is left untouched.
pub fn swap(data: &mut [f64], i: usize, j: usize) -> Result<(), SortError> {
    let len = data.len();
    if i >= len || j >= len {
        error!(i, j, len, "swap: index out of range, swap skipped");
        return Err(SortError::IndexOutOfRange { i, j, len });
    }
    if i != j {
        data.swap(i, j);
    }
    Ok(())
}

/*
--------------------------------------------------------------------------------
   HOARE_PARTITION - Partition data[l..=r] around a randomly chosen pivot

   The pivot is moved to data[l] first. Both scans stop on equality, so
   runs of duplicates split near the middle instead of degrading.
   Returns the final pivot position s:
      data[l..s] <= data[s] <= data[s+1..=r]
--------------------------------------------------------------------------------
*/
pub fn hoare_partition<R: Rng + ?Sized>(
    data: &mut [f64],
    l: usize,
    r: usize,
    rng: &mut R,
) -> Result<usize, SortError> {
    if r >= data.len() {
        error!(l, r, len = data.len(), "hoare_partition: range end out of bounds");
        return Err(SortError::IndexOutOfRange { i: l, j: r, len: data.len() });
    }
    if l >= r {
        return Ok(l);
    }

    let pivot = random_index(rng, l, r + 1);
    swap(data, l, pivot)?;
    let p = data[l];

    let mut i = l;
    let mut j = r + 1;

    while i < j {
        // i never passes r, j never passes l
        loop {
            i += 1;
            if !(i < r && data[i] < p) {
                break;
            }
        }
        loop {
            j -= 1;
            if !(j > l && data[j] > p) {
                break;
            }
        }
        swap(data, i, j)?;
    }

    // Undo the swap made after the scans crossed, then seat the pivot
    swap(data, i, j)?;
    swap(data, l, j)?;

    Ok(j)
}

/// Sort data[l..=r] in place. `l > r` is an empty range and a no-op.
///
/// Recurses into the smaller side and loops on the larger one, so the stack
/// depth stays logarithmic even for unlucky pivot sequences.
pub fn quick_sort_range<R: Rng + ?Sized>(
    data: &mut [f64],
    mut l: usize,
    mut r: usize,
    rng: &mut R,
) -> Result<(), SortError> {
    while l < r {
        let s = hoare_partition(data, l, r, rng)?;

        if s - l < r - s {
            if s > l {
                quick_sort_range(data, l, s - 1, rng)?;
            }
            l = s + 1;
        } else {
            if s < r {
                quick_sort_range(data, s + 1, r, rng)?;
            }
            if s == l {
                break;
            }
            r = s - 1;
        }
    }
    Ok(())
}

/// Sort a whole slice ascending. Slices of length 0 or 1 are left alone.
pub fn quick_sort<R: Rng + ?Sized>(data: &mut [f64], rng: &mut R) -> Result<(), SortError> {
    if data.len() < 2 {
        return Ok(());
    }
    let last = data.len() - 1;
    quick_sort_range(data, 0, last, rng)
}

/// Randomized quicksort that owns its pivot generator.
///
/// One sorter is meant to be reused across many sorts so the generator is
/// seeded once, not per call.
#[derive(Debug, Clone)]
pub struct QuickSorter<R = Mwc256> {
    rng: R,
}

impl QuickSorter<Mwc256> {
    /// Sorter seeded from the system clock
    pub fn from_clock() -> Self {
        Self::new(Mwc256::from_clock())
    }

    /// Sorter with a reproducible pivot sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Mwc256::seed_from_u64(seed))
    }
}

impl<R: Rng> QuickSorter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn sort(&mut self, data: &mut [f64]) -> Result<(), SortError> {
        quick_sort(data, &mut self.rng)
    }

    pub fn partition(&mut self, data: &mut [f64], l: usize, r: usize) -> Result<usize, SortError> {
        hoare_partition(data, l, r, &mut self.rng)
    }
}
