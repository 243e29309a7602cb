//! Deterministic random number generation for map generation.
//!
//! Every draw is derived from the run seed, so the same seed always yields the
//! same map. Nothing in this module reads ambient entropy; seeds are supplied
//! by the caller.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state. Simple operations,
/// no branches, same seed always produces the same output.
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Compute a deterministic seed from independent entropy components.
///
/// * `run_seed` - Seed chosen for the run
/// * `cursor` - Draw counter within a stream
/// * `stream` - Stream identifier so unrelated draws never collide
/// * `context` - Additional context for multiple rolls at the same cursor
pub fn compute_seed(run_seed: u64, cursor: u64, stream: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash style mixing constants
    let mut hash = run_seed;
    hash ^= cursor.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Sequential draw stream over [`PcgRng`].
///
/// Each call advances an internal cursor, so the n-th draw of a stream is a
/// pure function of `(seed, stream, n)`.
#[derive(Clone, Debug)]
pub struct SeededStream {
    seed: u64,
    stream: u32,
    cursor: u64,
    rng: PcgRng,
}

impl SeededStream {
    pub fn new(seed: u64, stream: u32) -> Self {
        Self {
            seed,
            stream,
            cursor: 0,
            rng: PcgRng,
        }
    }

    /// Number of draws taken so far.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.seed, self.cursor, self.stream, 0);
        self.cursor += 1;
        seed
    }

    pub fn next_u32(&mut self) -> u32 {
        let seed = self.next_seed();
        self.rng.next_u32(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    /// Value in `[min, max]` inclusive.
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        let seed = self.next_seed();
        self.rng.range(seed, min, max)
    }

    /// Picks an index with probability proportional to its weight.
    ///
    /// Returns `None` when every weight is zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        if total == 0 {
            return None;
        }

        let mut roll = (self.next_u64() % total) as i64;
        for (index, &weight) in weights.iter().enumerate() {
            roll -= weight as i64;
            if roll < 0 {
                return Some(index);
            }
        }
        // Unreachable while total > 0; keep the last non-zero slot as a fallback.
        weights.iter().rposition(|&w| w > 0)
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range(0, i as u32) as usize;
            items.swap(i, j);
        }
    }
}
