//! Pheromone-weighted next-city selection.
//!
//! Each unvisited city `j` seen from the current city `c` scores
//! `tau[c][j]^alpha * (1 / d[c][j])^beta`, clamped into
//! `[MIN_SCORE, f64::MAX / (n * 100)]` so the normalizing sum can never
//! overflow. Scores are normalized, accumulated into a cumulative
//! distribution and sampled with one uniform draw (roulette wheel).
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"

use super::matrix::{DistanceMatrix, PheromoneMatrix};
use crate::random::RandomSource;

/// Floor for the score of any selectable city.
pub const MIN_SCORE: f64 = 1e-4;

/// Largest score a single city may carry among `n` cities.
pub fn max_score_bound(n: usize) -> f64 {
    f64::MAX / (n * 100) as f64
}

/// Desirability of moving along an edge with the given pheromone and cost.
///
/// NaN (possible when an underflowed pheromone term meets a zero distance)
/// collapses to the floor. `+inf` saturates at `max_bound`.
pub fn desirability(pheromone: f64, distance: f64, alpha: f64, beta: f64, max_bound: f64) -> f64 {
    let raw = pheromone.powf(alpha) * (1.0 / distance).powf(beta);
    if raw.is_nan() || raw < MIN_SCORE {
        MIN_SCORE
    } else if raw > max_bound {
        max_bound
    } else {
        raw
    }
}

/// Reusable buffers for one roulette spin.
#[derive(Debug, Clone)]
pub(crate) struct Wheel {
    probabilities: Vec<f64>,
    /// `cumulative[0] = 0`, `cumulative[i + 1] = cumulative[i] + probabilities[i]`.
    cumulative: Vec<f64>,
}

impl Wheel {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            probabilities: vec![0.0; n],
            cumulative: vec![0.0; n + 1],
        }
    }

    /// Probabilities from the most recent spin.
    #[cfg(test)]
    pub(crate) fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Picks the next city for an ant standing on `current`.
    ///
    /// Consumes exactly one `next_unit` draw.
    ///
    /// # Panics
    ///
    /// Panics if every city other than `current` is already visited.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn select_next_city<R: RandomSource>(
        &mut self,
        current: usize,
        visited: &[bool],
        pheromones: &PheromoneMatrix,
        distances: &DistanceMatrix,
        alpha: f64,
        beta: f64,
        rng: &mut R,
    ) -> usize {
        let n = visited.len();
        let max_bound = max_score_bound(n);

        let mut sum = 0.0;
        for j in 0..n {
            let score = if j == current || visited[j] {
                0.0
            } else {
                desirability(
                    pheromones.get(current, j),
                    distances.get(current, j),
                    alpha,
                    beta,
                    max_bound,
                )
            };
            self.probabilities[j] = score;
            sum += score;
        }

        if !(sum.is_finite() && sum > 0.0) {
            sum = self.uniform_fallback(current, visited);
        }

        self.cumulative[0] = 0.0;
        for j in 0..n {
            self.probabilities[j] /= sum;
            self.cumulative[j + 1] = self.cumulative[j] + self.probabilities[j];
        }

        let drawn = rng.next_unit();
        match spin_roulette(&self.cumulative, drawn) {
            Some(city) => city,
            // Rounding left the last bucket short of the draw.
            None => self
                .probabilities
                .iter()
                .rposition(|&p| p > 0.0)
                .unwrap_or_else(|| {
                    panic!("roulette miss: no candidate city for draw {drawn} from city {current}")
                }),
        }
    }

    /// Gives every unvisited city the same weight. Returns the new sum.
    fn uniform_fallback(&mut self, current: usize, visited: &[bool]) -> f64 {
        let mut candidates = 0usize;
        for (j, &seen) in visited.iter().enumerate() {
            if j == current || seen {
                self.probabilities[j] = 0.0;
            } else {
                self.probabilities[j] = 1.0;
                candidates += 1;
            }
        }
        assert!(
            candidates > 0,
            "no unvisited city left to select from city {current}"
        );
        tracing::warn!(
            event = "degenerate_scores",
            current,
            candidates,
            "score sum not finite and positive, falling back to uniform selection"
        );
        candidates as f64
    }
}

/// Returns the smallest `i` with `cumulative[i] <= drawn < cumulative[i + 1]`.
///
/// Zero-width buckets never match, so cities with zero probability are
/// never chosen.
pub(crate) fn spin_roulette(cumulative: &[f64], drawn: f64) -> Option<usize> {
    cumulative
        .windows(2)
        .position(|w| drawn >= w[0] && drawn < w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    /// Replays fixed unit draws.
    struct FixedDraws(Vec<f64>);

    impl RandomSource for FixedDraws {
        fn next_index(&mut self, low: usize, _high: usize) -> usize {
            low
        }

        fn next_unit(&mut self) -> f64 {
            self.0.remove(0)
        }
    }

    fn line_matrix(n: usize) -> DistanceMatrix {
        let mut dm = DistanceMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                dm.set(i, j, i.abs_diff(j) as f64);
            }
        }
        dm
    }

    #[test]
    fn test_desirability_clamps() {
        let max_bound = max_score_bound(10);
        // 0.01^3 * 1 = 1e-6 -> floor
        assert_eq!(desirability(0.01, 1.0, 3.0, 2.0, max_bound), MIN_SCORE);
        // zero distance -> +inf -> ceiling
        assert_eq!(desirability(0.5, 0.0, 1.0, 2.0, max_bound), max_bound);
        // underflowed pheromone term times +inf -> NaN -> floor
        assert_eq!(desirability(1e-4, 0.0, 1e6, 1.0, max_bound), MIN_SCORE);
        let mid = desirability(2.0, 0.5, 1.0, 1.0, max_bound);
        assert!((mid - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_exponents_give_equal_scores() {
        let max_bound = max_score_bound(4);
        let a = desirability(0.3, 7.0, 0.0, 0.0, max_bound);
        let b = desirability(9.0, 1.0, 0.0, 0.0, max_bound);
        assert_eq!(a, 1.0);
        assert_eq!(b, 1.0);
    }

    #[test]
    fn test_spin_roulette_buckets() {
        let cumulative = [0.0, 0.25, 0.25, 1.0];
        assert_eq!(spin_roulette(&cumulative, 0.0), Some(0));
        assert_eq!(spin_roulette(&cumulative, 0.2499), Some(0));
        // zero-width bucket 1 is skipped
        assert_eq!(spin_roulette(&cumulative, 0.25), Some(2));
        assert_eq!(spin_roulette(&cumulative, 0.99), Some(2));
        assert_eq!(spin_roulette(&cumulative, 1.0), None);
    }

    #[test]
    fn test_probabilities_normalized_and_visited_excluded() {
        let n = 6;
        let dm = line_matrix(n);
        let pm = PheromoneMatrix::new(n, 0.5);
        let mut visited = vec![false; n];
        visited[0] = true;
        visited[4] = true;

        let mut wheel = Wheel::new(n);
        let mut rng = create_rng(3);
        let city = wheel.select_next_city(2, &visited, &pm, &dm, 1.0, 2.0, &mut rng);

        assert!(![0, 2, 4].contains(&city));
        let probs = wheel.probabilities();
        assert_eq!(probs[0], 0.0);
        assert_eq!(probs[2], 0.0);
        assert_eq!(probs[4], 0.0);
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        // closer cities are more likely
        assert!(probs[1] > probs[5]);
        assert!((probs[1] - probs[3]).abs() < 1e-15);
    }

    #[test]
    fn test_draw_maps_to_bucket() {
        let n = 3;
        let dm = line_matrix(n);
        let pm = PheromoneMatrix::new(n, 1.0);
        let visited = vec![true, false, false];
        // from 0: scores 1 (city 1) and 1/4 (city 2) -> probabilities 0.8, 0.2
        let mut wheel = Wheel::new(n);
        let mut draws = FixedDraws(vec![0.79, 0.81]);
        assert_eq!(
            wheel.select_next_city(0, &visited, &pm, &dm, 1.0, 2.0, &mut draws),
            1
        );
        assert_eq!(
            wheel.select_next_city(0, &visited, &pm, &dm, 1.0, 2.0, &mut draws),
            2
        );
    }

    #[test]
    fn test_rounding_shortfall_selects_last_candidate() {
        let n = 4;
        let dm = line_matrix(n);
        let pm = PheromoneMatrix::new(n, 1.0);
        let visited = vec![false, false, true, false];
        let mut wheel = Wheel::new(n);
        // a draw at or past the final cumulative value lands on the last live bucket
        let mut draws = FixedDraws(vec![1.0]);
        assert_eq!(
            wheel.select_next_city(1, &visited, &pm, &dm, 1.0, 1.0, &mut draws),
            3
        );
    }

    #[test]
    fn test_only_one_candidate() {
        let n = 4;
        let dm = line_matrix(n);
        let pm = PheromoneMatrix::new(n, 0.01);
        let visited = vec![true, true, false, true];
        let mut wheel = Wheel::new(n);
        let mut rng = create_rng(0);
        for _ in 0..20 {
            assert_eq!(
                wheel.select_next_city(3, &visited, &pm, &dm, 3.0, 2.0, &mut rng),
                2
            );
        }
    }

    #[test]
    fn test_uniform_fallback_on_degenerate_sum() {
        let n = 3;
        let mut wheel = Wheel::new(n);
        let sum = wheel.uniform_fallback(0, &[true, false, false]);
        assert_eq!(sum, 2.0);
        assert_eq!(wheel.probabilities(), &[0.0, 1.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "no unvisited city")]
    fn test_no_candidate_panics() {
        let n = 3;
        let dm = line_matrix(n);
        let pm = PheromoneMatrix::new(n, 0.01);
        let mut wheel = Wheel::new(n);
        let mut rng = create_rng(0);
        wheel.select_next_city(0, &[true, true, true], &pm, &dm, 1.0, 1.0, &mut rng);
    }
}
