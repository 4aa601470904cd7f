use std::time::{SystemTime, UNIX_EPOCH};

use rand::{RngCore, SeedableRng};

/// MWC256 random number generator
/// This is a random int generator suggested by Marsaglia in his DIEHARD suite.
/// It provides a great combination of speed and quality, and is the default
/// source of pivot positions for the quicksort.
#[derive(Debug, Clone)]
pub struct Mwc256 {
    q: [u32; 256],
    carry: u32,
    i: u8,
}

impl Mwc256 {
    /// Create a new random number generator with a default seed
    pub fn new() -> Self {
        Self::with_seed(123456789)
    }

    /// Create a new random number generator with the given seed
    pub fn with_seed(seed: u32) -> Self {
        let mut q = [0u32; 256];
        let mut j = seed;

        for q_val in &mut q {
            j = j.wrapping_mul(69069).wrapping_add(12345);
            *q_val = j;
        }

        Self {
            q,
            carry: 362436,
            i: 255,
        }
    }

    /// Seed from the system clock. Call once per process (or per sorter),
    /// never per sort.
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        // fold the high bits in so two runs in the same second still differ
        Self::with_seed((nanos ^ (nanos >> 32) ^ (nanos >> 64)) as u32)
    }

    /// Generate a random u32
    pub fn rand32(&mut self) -> u32 {
        const A: u64 = 809430660;

        self.i = self.i.wrapping_add(1);
        let t = A * (self.q[self.i as usize] as u64) + (self.carry as u64);
        self.carry = (t >> 32) as u32;
        self.q[self.i as usize] = (t & 0xFFFFFFFF) as u32;
        self.q[self.i as usize]
    }

    /// Generate a random f64 in the range [0, 1)
    pub fn unifrand(&mut self) -> f64 {
        const MULT: f64 = 1.0 / (u32::MAX as f64 + 1.0);
        MULT * (self.rand32() as f64)
    }
}

impl Default for Mwc256 {
    fn default() -> Self {
        Self::new()
    }
}

impl RngCore for Mwc256 {
    fn next_u32(&mut self) -> u32 {
        self.rand32()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.rand32() as u64;
        let lo = self.rand32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.rand32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mwc256 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::with_seed(u32::from_le_bytes(seed))
    }
}
