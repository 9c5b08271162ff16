//! Seeded random sources.
//!
//! The colony draws exactly two kinds of numbers: a uniform index in a
//! half-open range (starting cities, shuffles) and a uniform real in
//! `[0, 1)` (roulette spins). [`RandomSource`] captures that pair so any
//! `rand` generator can drive a search, and so can [`SubtractiveRng`],
//! which replays the classic Knuth subtractive stream used by the .NET
//! `System.Random(seed)` constructor.
//!
//! Reproducibility depends on draw order, not just on the seed. The colony
//! consumes draws ant by ant, and within an ant position by position.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A sequential stream of uniform draws.
pub trait RandomSource {
    /// Returns a uniform index in `[low, high)`.
    ///
    /// Callers guarantee `low < high`.
    fn next_index(&mut self, low: usize, high: usize) -> usize;

    /// Returns a uniform real in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: Rng> RandomSource for R {
    fn next_index(&mut self, low: usize, high: usize) -> usize {
        self.random_range(low..high)
    }

    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Creates the default seeded generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

const MBIG: i32 = i32::MAX;
const MSEED: i32 = 161_803_398;

/// Knuth's subtractive lagged-Fibonacci generator (lags 55 and 24).
///
/// Seeding and sampling follow `System.Random(int seed)` exactly, so a
/// tour sequence recorded against that runtime can be reproduced here.
/// Not suitable for anything statistical beyond heuristics.
///
/// # Examples
///
/// ```
/// use u_aco::random::{RandomSource, SubtractiveRng};
///
/// let mut rng = SubtractiveRng::new(0);
/// let u = rng.next_unit();
/// assert!((u - 0.7262432699679598).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct SubtractiveRng {
    seed_array: [i32; 56],
    inext: usize,
    inextp: usize,
}

impl SubtractiveRng {
    /// Seeds the generator.
    ///
    /// Every `i32` is a valid seed. Seeding arithmetic wraps, as the
    /// original generator's unchecked integer math does.
    pub fn new(seed: i32) -> Self {
        let mut seed_array = [0i32; 56];
        let subtraction = if seed == i32::MIN {
            i32::MAX
        } else {
            seed.abs()
        };
        let mut mj = MSEED - subtraction;
        seed_array[55] = mj;
        let mut mk = 1i32;
        let mut ii = 0usize;
        // Slot 0 is never used.
        for _ in 1..55 {
            ii += 21;
            if ii >= 55 {
                ii -= 55;
            }
            seed_array[ii] = mk;
            mk = mj.wrapping_sub(mk);
            if mk < 0 {
                mk += MBIG;
            }
            mj = seed_array[ii];
        }
        for _ in 1..5 {
            for i in 1..56 {
                let mut n = i + 30;
                if n >= 55 {
                    n -= 55;
                }
                seed_array[i] = seed_array[i].wrapping_sub(seed_array[1 + n]);
                if seed_array[i] < 0 {
                    seed_array[i] += MBIG;
                }
            }
        }

        Self {
            seed_array,
            inext: 0,
            inextp: 21,
        }
    }

    /// Next raw value in `[0, i32::MAX)`.
    fn internal_sample(&mut self) -> i32 {
        let mut next = self.inext + 1;
        if next >= 56 {
            next = 1;
        }
        let mut nextp = self.inextp + 1;
        if nextp >= 56 {
            nextp = 1;
        }

        let mut value = self.seed_array[next].wrapping_sub(self.seed_array[nextp]);
        if value == MBIG {
            value -= 1;
        }
        if value < 0 {
            value += MBIG;
        }

        self.seed_array[next] = value;
        self.inext = next;
        self.inextp = nextp;
        value
    }

    /// Uniform real in `[0, 1)`.
    pub fn sample(&mut self) -> f64 {
        f64::from(self.internal_sample()) * (1.0 / f64::from(MBIG))
    }
}

impl RandomSource for SubtractiveRng {
    fn next_index(&mut self, low: usize, high: usize) -> usize {
        assert!(low < high, "empty range {low}..{high}");
        debug_assert!(high - low <= MBIG as usize, "range too wide for SubtractiveRng");
        let range = (high - low) as f64;
        (self.sample() * range) as usize + low
    }

    fn next_unit(&mut self) -> f64 {
        self.sample()
    }
}
