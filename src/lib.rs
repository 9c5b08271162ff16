//! Ant Colony Optimization for the symmetric Traveling Salesman Problem.
//!
//! A colony of ants builds closed tours over a fully connected set of
//! cities, biased by a shared pheromone matrix that is reinforced along
//! good tours and evaporates over time. The search is an anytime
//! heuristic: it returns the cheapest tour seen after a fixed number of
//! iterations, with no optimality guarantee.
//!
//! - [`aco`]: distance and pheromone matrices, ants, roulette selection,
//!   and the colony search loop.
//! - [`random`]: the seeded random-source seam, including a generator that
//!   replays the classic subtractive stream for legacy fixtures.
//! - [`error`]: precondition errors returned before any search work.
//!
//! # Example
//!
//! ```
//! use u_aco::aco::{AcoConfig, AcoRunner, DistanceMatrix};
//!
//! let dm = DistanceMatrix::from_rows(&[
//!     vec![0.0, 1.0, 4.0],
//!     vec![1.0, 0.0, 2.0],
//!     vec![4.0, 2.0, 0.0],
//! ])
//! .expect("square");
//!
//! let config = AcoConfig::default().with_iterations(10).with_seed(7);
//! let result = AcoRunner::run(&dm, &config).expect("valid input");
//! assert_eq!(result.best.tour.len(), 3);
//! assert!(result.best.cost >= 3.0);
//! ```

pub mod aco;
pub mod error;
pub mod random;

pub use error::{AcoError, Result};
