//! A single ant: one candidate tour plus construction scratch.

use super::matrix::DistanceMatrix;
use crate::random::RandomSource;

/// One agent of the colony.
///
/// The tour is a permutation of `0..n` read as a cycle. It is replaced
/// wholesale after every construction phase, never edited in place, so a
/// clone of it is an independent snapshot.
#[derive(Debug, Clone)]
pub struct Ant {
    tour: Vec<usize>,
    /// `positions[city]` is the index of `city` in `tour`.
    positions: Vec<usize>,
    visited: Vec<bool>,
}

impl Ant {
    /// Creates an ant holding a uniformly random tour.
    pub fn with_random_tour<R: RandomSource>(n: usize, rng: &mut R) -> Self {
        let mut ant = Self {
            tour: Vec::new(),
            positions: Vec::new(),
            visited: vec![false; n],
        };
        ant.set_tour(random_tour(n, rng));
        ant
    }

    /// The current tour.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Replaces the tour.
    ///
    /// # Panics
    ///
    /// Panics if `tour` is not a permutation of `0..tour.len()`.
    pub(crate) fn set_tour(&mut self, tour: Vec<usize>) {
        let n = tour.len();
        let mut positions = vec![usize::MAX; n];
        for (idx, &city) in tour.iter().enumerate() {
            assert!(
                city < n && positions[city] == usize::MAX,
                "tour is not a permutation: city {city} at position {idx}"
            );
            positions[city] = idx;
        }
        self.tour = tour;
        self.positions = positions;
    }

    /// Sum of edge costs along the tour, without the edge from the last
    /// city back to the first.
    pub fn tour_cost(&self, distances: &DistanceMatrix) -> f64 {
        self.tour
            .windows(2)
            .map(|w| distances.get(w[0], w[1]))
            .sum()
    }

    /// Returns `true` if `a` and `b` are adjacent in the tour, including
    /// the wrap-around pair `(last, first)`.
    ///
    /// Symmetric in its arguments.
    ///
    /// # Panics
    ///
    /// Panics if `a` is not in the tour.
    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        let n = self.tour.len();
        let pos = self.position_of(a);
        self.tour[(pos + 1) % n] == b || self.tour[(pos + n - 1) % n] == b
    }

    /// Index of `city` within the tour.
    ///
    /// # Panics
    ///
    /// Panics if `city` is not in the tour. A well-formed tour always
    /// contains every city, so this signals corrupted bookkeeping.
    pub fn position_of(&self, city: usize) -> usize {
        match self.positions.get(city) {
            Some(&pos) if pos != usize::MAX => pos,
            _ => panic!(
                "city {city} not found in tour of length {}",
                self.tour.len()
            ),
        }
    }

    /// Distinct undirected edges of the closed tour as `(min, max)` pairs.
    ///
    /// A two-city tour has a single edge; otherwise there are `n`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.tour.len();
        let closing = if n > 2 {
            Some((self.tour[n - 1], self.tour[0]))
        } else {
            None
        };
        self.tour
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
            .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
    }

    /// Clears the visited set before building a new tour.
    pub fn reset_visited(&mut self) {
        self.visited.fill(false);
    }

    pub(crate) fn visit(&mut self, city: usize) {
        self.visited[city] = true;
    }

    /// Visited flags of the tour under construction.
    pub fn visited(&self) -> &[bool] {
        &self.visited
    }
}

/// Draws a uniformly random tour of `n` cities.
///
/// Draw order: the starting city, then one draw per position of a forward
/// Fisher-Yates shuffle. The starting city is then swapped into position 0.
/// Swapping a uniform city to the front of a uniform permutation leaves the
/// result uniform.
pub fn random_tour<R: RandomSource>(n: usize, rng: &mut R) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }

    let start = rng.next_index(0, n);
    let mut tour: Vec<usize> = (0..n).collect();
    for k in 0..n {
        let r = rng.next_index(k, n);
        tour.swap(k, r);
    }

    let start_pos = tour
        .iter()
        .position(|&c| c == start)
        .unwrap_or_else(|| panic!("starting city {start} missing from shuffled tour"));
    tour.swap(0, start_pos);
    tour
}
