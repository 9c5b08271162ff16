//! Colony search loop.
//!
//! # Algorithm
//!
//! 1. Give every ant a uniformly random tour; the best of them seeds the
//!    running best.
//! 2. At each iteration:
//!    a. Every ant, in population order, builds a new tour from a random
//!       starting city by roulette selection over unvisited cities
//!    b. Pheromone on every pair `(i, j)`, `i < j`, evaporates and receives
//!       deposits from the ants whose tours use that edge
//!    c. The iteration's best tour replaces the running best if strictly
//!       cheaper
//! 3. Return the running best after the configured number of iterations
//!
//! Everything draws from one random stream in a fixed order, so a seed
//! fully determines every tour of the run.

use tracing::{debug, info};

use super::ant::Ant;
use super::config::{AcoConfig, PheromoneRule};
use super::matrix::{clamp_pheromone, DistanceMatrix, PheromoneMatrix};
use super::selection::Wheel;
use crate::error::Result;
use crate::random::{create_rng, RandomSource};

/// Snapshot of the cheapest tour seen so far.
///
/// Owns its tour; later iterations never alter it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestTrail {
    /// City indices in visiting order.
    pub tour: Vec<usize>,
    /// Tour cost as computed by [`Ant::tour_cost`].
    pub cost: f64,
}

/// Result of an ACO run.
#[derive(Debug, Clone)]
pub struct AcoResult {
    /// Best tour found.
    pub best: BestTrail,

    /// Iterations executed by this run.
    pub iterations: usize,

    /// Colony iteration at which the best tour was found (0 = initial population).
    pub best_iteration: usize,

    /// Running best cost; index 0 is the value before the first iteration.
    pub cost_history: Vec<f64>,
}

/// Ant Colony Optimization over a symmetric distance matrix.
///
/// The colony owns the ants and the pheromone matrix and borrows the
/// distances for its whole lifetime. Search state persists between calls,
/// so `search(k)` followed by `search(1)` matches a single `search(k + 1)`.
///
/// # Examples
///
/// ```
/// use u_aco::aco::{AcoConfig, AntColony, DistanceMatrix};
/// use u_aco::random::create_rng;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 2.0, 9.0, 10.0],
///     vec![2.0, 0.0, 6.0, 4.0],
///     vec![9.0, 6.0, 0.0, 3.0],
///     vec![10.0, 4.0, 3.0, 0.0],
/// ])
/// .expect("square");
///
/// let config = AcoConfig::default().with_ant_count(8);
/// let mut colony = AntColony::new(&dm, &config, create_rng(42)).expect("valid input");
/// let best = colony.search(20);
/// assert_eq!(best.tour.len(), 4);
/// ```
pub struct AntColony<'a, R: RandomSource> {
    distances: &'a DistanceMatrix,
    pheromones: PheromoneMatrix,
    ants: Vec<Ant>,
    config: AcoConfig,
    rng: R,
    wheel: Wheel,
    best: BestTrail,
    iteration: usize,
    best_iteration: usize,
}

impl<'a, R: RandomSource> AntColony<'a, R> {
    /// Validates the inputs and spawns the ants.
    ///
    /// Each ant draws its initial tour from `rng` in population order.
    pub fn new(distances: &'a DistanceMatrix, config: &AcoConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        distances.validate()?;

        let n = distances.size();
        let ants: Vec<Ant> = (0..config.ant_count)
            .map(|_| Ant::with_random_tour(n, &mut rng))
            .collect();

        let (best_idx, best_cost) = population_best(&ants, distances);
        let best = BestTrail {
            tour: ants[best_idx].tour().to_vec(),
            cost: best_cost,
        };

        debug!(
            event = "colony_created",
            cities = n,
            ants = config.ant_count,
            initial_best = best_cost,
        );

        Ok(Self {
            distances,
            pheromones: PheromoneMatrix::new(n, config.initial_pheromone),
            ants,
            config: config.clone(),
            rng,
            wheel: Wheel::new(n),
            best,
            iteration: 0,
            best_iteration: 0,
        })
    }

    /// The ant population.
    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    /// Current pheromone intensities.
    pub fn pheromones(&self) -> &PheromoneMatrix {
        &self.pheromones
    }

    /// Running best.
    pub fn best(&self) -> &BestTrail {
        &self.best
    }

    /// Iterations completed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Runs `iterations` rounds and returns the running best.
    ///
    /// `iterations` is not validated here: the positive iteration count is
    /// a precondition of [`AcoConfig::validate`], checked when the colony is
    /// built. `search(0)` performs no rounds and returns the best tour seen
    /// so far (the initial population's best on a fresh colony).
    pub fn search(&mut self, iterations: usize) -> BestTrail {
        for _ in 0..iterations {
            self.step();
        }
        self.best.clone()
    }

    /// Runs `iterations` rounds and reports run statistics.
    pub fn run(&mut self, iterations: usize) -> AcoResult {
        info!(
            event = "search_start",
            cities = self.distances.size(),
            ants = self.ants.len(),
            iterations,
        );

        let mut cost_history = Vec::with_capacity(iterations + 1);
        cost_history.push(self.best.cost);
        for _ in 0..iterations {
            self.step();
            cost_history.push(self.best.cost);
        }

        info!(
            event = "search_end",
            best_cost = self.best.cost,
            best_iteration = self.best_iteration,
        );

        AcoResult {
            best: self.best.clone(),
            iterations,
            best_iteration: self.best_iteration,
            cost_history,
        }
    }

    /// Performs one construct/update round.
    pub fn step(&mut self) -> &BestTrail {
        self.construct_tours();
        self.update_pheromones();
        self.iteration += 1;

        let (idx, cost) = population_best(&self.ants, self.distances);
        if cost < self.best.cost {
            self.best = BestTrail {
                tour: self.ants[idx].tour().to_vec(),
                cost,
            };
            self.best_iteration = self.iteration;
            debug!(event = "new_best", iteration = self.iteration, cost);
        }
        &self.best
    }

    fn construct_tours(&mut self) {
        let Self {
            distances,
            pheromones,
            ants,
            config,
            rng,
            wheel,
            ..
        } = self;

        for ant in ants.iter_mut() {
            let tour = build_tour(
                ant,
                distances,
                pheromones,
                wheel,
                config.alpha,
                config.beta,
                rng,
            );
            ant.set_tour(tour);
        }
    }

    fn update_pheromones(&mut self) {
        let n = self.distances.size();
        let costs: Vec<f64> = self
            .ants
            .iter()
            .map(|ant| ant.tour_cost(self.distances))
            .collect();

        let rows = {
            let plan = UpdatePlan::new(
                &self.pheromones,
                &self.ants,
                &costs,
                self.config.pheromone_rule,
                1.0 - self.config.rho,
                self.config.q,
            );
            compute_rows(&plan, n)
        };

        for (i, row) in rows.into_iter().enumerate() {
            for (offset, value) in row.into_iter().enumerate() {
                self.pheromones.set_pair(i, i + 1 + offset, value);
            }
        }
    }
}

/// Builds one tour for `ant`: a random start, then `n - 1` roulette picks.
fn build_tour<R: RandomSource>(
    ant: &mut Ant,
    distances: &DistanceMatrix,
    pheromones: &PheromoneMatrix,
    wheel: &mut Wheel,
    alpha: f64,
    beta: f64,
    rng: &mut R,
) -> Vec<usize> {
    let n = distances.size();
    ant.reset_visited();

    let start = rng.next_index(0, n);
    let mut tour = Vec::with_capacity(n);
    tour.push(start);
    ant.visit(start);

    let mut current = start;
    for _ in 1..n {
        let next =
            wheel.select_next_city(current, ant.visited(), pheromones, distances, alpha, beta, rng);
        tour.push(next);
        ant.visit(next);
        current = next;
    }
    tour
}

/// First ant with the strictly lowest tour cost.
fn population_best(ants: &[Ant], distances: &DistanceMatrix) -> (usize, f64) {
    let mut best_idx = 0;
    let mut best_cost = ants[0].tour_cost(distances);
    for (idx, ant) in ants.iter().enumerate().skip(1) {
        let cost = ant.tour_cost(distances);
        if cost < best_cost {
            best_idx = idx;
            best_cost = cost;
        }
    }
    (best_idx, best_cost)
}

/// Read-only inputs of one pheromone update.
///
/// Every new value depends only on the old matrix and the finished tours,
/// so rows can be computed in any order.
struct UpdatePlan<'u> {
    pheromones: &'u PheromoneMatrix,
    ants: &'u [Ant],
    costs: &'u [f64],
    rule: PheromoneRule,
    /// Summed deposits per pair (`i * n + j`, `i < j`); aggregate rule only.
    deposits: Vec<f64>,
    decay: f64,
    q: f64,
}

impl<'u> UpdatePlan<'u> {
    fn new(
        pheromones: &'u PheromoneMatrix,
        ants: &'u [Ant],
        costs: &'u [f64],
        rule: PheromoneRule,
        decay: f64,
        q: f64,
    ) -> Self {
        let n = pheromones.size();
        let deposits = match rule {
            PheromoneRule::Aggregate => {
                let mut deposits = vec![0.0; n * n];
                for (ant, &cost) in ants.iter().zip(costs) {
                    let amount = q / cost;
                    for (a, b) in ant.edges() {
                        deposits[a * n + b] += amount;
                    }
                }
                deposits
            }
            PheromoneRule::Sequential => Vec::new(),
        };

        Self {
            pheromones,
            ants,
            costs,
            rule,
            deposits,
            decay,
            q,
        }
    }

    /// New values for pairs `(i, j)` with `j` in `i + 1..n`.
    fn row(&self, i: usize) -> Vec<f64> {
        let n = self.pheromones.size();
        ((i + 1)..n)
            .map(|j| match self.rule {
                PheromoneRule::Aggregate => {
                    self.decay * self.pheromones.get(i, j) + self.deposits[i * n + j]
                }
                PheromoneRule::Sequential => {
                    let mut value = self.pheromones.get(i, j);
                    for (ant, &cost) in self.ants.iter().zip(self.costs) {
                        let deposit = if ant.contains_edge(i, j) {
                            self.q / cost
                        } else {
                            0.0
                        };
                        value = clamp_pheromone(self.decay * value + deposit);
                    }
                    value
                }
            })
            .collect()
    }
}

#[cfg(feature = "parallel")]
fn compute_rows(plan: &UpdatePlan<'_>, n: usize) -> Vec<Vec<f64>> {
    use rayon::prelude::*;
    (0..n).into_par_iter().map(|i| plan.row(i)).collect()
}

#[cfg(not(feature = "parallel"))]
fn compute_rows(plan: &UpdatePlan<'_>, n: usize) -> Vec<Vec<f64>> {
    (0..n).map(|i| plan.row(i)).collect()
}

/// Executes an ACO search from a configuration.
pub struct AcoRunner;

impl AcoRunner {
    /// Runs `config.iterations` rounds with a [`StdRng`](rand::rngs::StdRng)
    /// seeded from `config.seed` (random when unset).
    pub fn run(distances: &DistanceMatrix, config: &AcoConfig) -> Result<AcoResult> {
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        Self::run_with_rng(distances, config, rng)
    }

    /// Runs `config.iterations` rounds drawing from `rng`. `config.seed` is ignored.
    pub fn run_with_rng<R: RandomSource>(
        distances: &DistanceMatrix,
        config: &AcoConfig,
        rng: R,
    ) -> Result<AcoResult> {
        let mut colony = AntColony::new(distances, config, rng)?;
        Ok(colony.run(config.iterations))
    }
}
