use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

use crate::{WriteError, write_file};

pub const FIXTURE_MIN: i64 = -100_000;
pub const FIXTURE_MAX: i64 = 100_000;

/// `n` integers drawn uniformly from [FIXTURE_MIN, FIXTURE_MAX]
pub fn random_values<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<i64> {
    (0..n).map(|_| rng.gen_range(FIXTURE_MIN..=FIXTURE_MAX)).collect()
}

/// Write `files_per_size` fixtures for every size, named `<size>-<index>.txt`.
/// Returns the paths written, in generation order.
pub fn generate_fixtures<R: Rng + ?Sized>(
    dir: &Path,
    sizes: &[usize],
    files_per_size: usize,
    rng: &mut R,
) -> Result<Vec<PathBuf>, WriteError> {
    let mut written = Vec::with_capacity(sizes.len() * files_per_size);

    for &size in sizes {
        for index in 0..files_per_size {
            let path = dir.join(format!("{}-{}.txt", size, index));
            let line = random_values(size, rng)
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            write_file(&path, line + "\n")?;
            debug!(path = %path.display(), size, "fixture written");
            written.push(path);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_numbers;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::tempdir;

    #[test]
    fn test_random_values_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let values = random_values(10_000, &mut rng);
        assert_eq!(values.len(), 10_000);
        assert!(values.iter().all(|v| (FIXTURE_MIN..=FIXTURE_MAX).contains(v)));
    }

    #[test]
    fn test_generate_fixtures() {
        let dir = tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let paths = generate_fixtures(dir.path(), &[10, 100], 3, &mut rng).unwrap();

        assert_eq!(paths.len(), 6);
        assert!(paths[0].ends_with("10-0.txt"));
        assert!(paths[5].ends_with("100-2.txt"));

        for (path, expected) in paths.iter().zip([10, 10, 10, 100, 100, 100]) {
            assert_eq!(read_numbers(path).unwrap().len(), expected);
        }
    }
}
