//! Ant Colony Optimization (ACO) for the symmetric TSP.
//!
//! A fixed population of ants repeatedly builds tours city by city,
//! choosing each next city with probability proportional to
//! `pheromone^alpha * (1 / distance)^beta`. After every round, pheromone
//! evaporates everywhere and is reinforced along the edges of each tour in
//! proportion to the tour's quality. The cheapest tour seen is kept as the
//! running best.
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents", *IEEE Trans. SMC-B* 26(1), 29-41.
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*, MIT Press.

mod ant;
mod colony;
mod config;
mod matrix;
mod selection;

pub use ant::{random_tour, Ant};
pub use colony::{AcoResult, AcoRunner, AntColony, BestTrail};
pub use config::{AcoConfig, PheromoneRule};
pub use matrix::{
    DistanceMatrix, PheromoneMatrix, DEFAULT_INITIAL_PHEROMONE, PHEROMONE_MAX, PHEROMONE_MIN,
};
pub use selection::{desirability, max_score_bound, MIN_SCORE};
