use rand::Rng;
use tracing::warn;

/// Pick a random index in the half-open range `[lower, upper)`.
///
/// An empty range (`lower == upper`) yields `lower`. An inverted range is a
/// caller error; it is logged and `lower` is returned instead of failing.
pub fn random_index<R: Rng + ?Sized>(rng: &mut R, lower: usize, upper: usize) -> usize {
    if lower > upper {
        warn!(lower, upper, "random_index: invalid range, returning lower limit");
        return lower;
    }
    if lower == upper {
        return lower;
    }
    rng.gen_range(lower..upper)
}
