//! ACO configuration.

use super::matrix::{DEFAULT_INITIAL_PHEROMONE, PHEROMONE_MAX, PHEROMONE_MIN};
use crate::error::{AcoError, Result};

/// How evaporation and deposition combine in the pheromone update.
///
/// Both rules visit unordered pairs `(i, j)`, `i < j`, in row-major order
/// and clamp the result into the pheromone bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PheromoneRule {
    /// Decay once, then add every ant's deposit:
    /// `p = clamp((1 - rho) * p + Σ q / cost_k)` over ants whose tour
    /// contains the edge.
    #[default]
    Aggregate,

    /// Fold ants one at a time, decaying before each:
    /// `p = clamp((1 - rho) * p + [edge in tour_k] * q / cost_k)` for each
    /// ant `k` in population order. Evaporation therefore compounds once per
    /// ant. Kept for replaying fixtures recorded with this rule.
    Sequential,
}

/// Configuration for the Ant Colony Optimization search.
///
/// Defaults are the tuning used by the regression fixtures: four ants,
/// strong pheromone bias (`alpha = 3`), moderate distance bias
/// (`beta = 2`), slow evaporation.
///
/// # Examples
///
/// ```
/// use u_aco::aco::{AcoConfig, PheromoneRule};
///
/// let config = AcoConfig::default()
///     .with_ant_count(10)
///     .with_alpha(1.0)
///     .with_beta(5.0)
///     .with_rho(0.1)
///     .with_pheromone_rule(PheromoneRule::Sequential)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of ants. Fixed for the whole run.
    pub ant_count: usize,

    /// Pheromone exponent. 0 ignores pheromone entirely.
    pub alpha: f64,

    /// Visibility exponent applied to `1 / distance`. 0 ignores distance.
    pub beta: f64,

    /// Evaporation rate in (0, 1).
    pub rho: f64,

    /// Deposit scale. An ant deposits `q / tour_cost` on each of its edges.
    pub q: f64,

    /// Number of construct/update rounds.
    pub iterations: usize,

    /// Starting intensity on every edge.
    pub initial_pheromone: f64,

    /// Evaporation/deposition rule.
    pub pheromone_rule: PheromoneRule,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ant_count: 4,
            alpha: 3.0,
            beta: 2.0,
            rho: 0.01,
            q: 2.0,
            iterations: 50,
            initial_pheromone: DEFAULT_INITIAL_PHEROMONE,
            pheromone_rule: PheromoneRule::default(),
            seed: None,
        }
    }
}

impl AcoConfig {
    pub fn with_ant_count(mut self, n: usize) -> Self {
        self.ant_count = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_initial_pheromone(mut self, tau: f64) -> Self {
        self.initial_pheromone = tau;
        self
    }

    pub fn with_pheromone_rule(mut self, rule: PheromoneRule) -> Self {
        self.pheromone_rule = rule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.ant_count == 0 {
            return Err(invalid("ant_count must be at least 1".into()));
        }
        if self.iterations == 0 {
            return Err(invalid("iterations must be at least 1".into()));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(invalid(format!(
                "alpha must be finite and >= 0, got {}",
                self.alpha
            )));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(invalid(format!(
                "beta must be finite and >= 0, got {}",
                self.beta
            )));
        }
        if self.rho.is_nan() || self.rho <= 0.0 || self.rho >= 1.0 {
            return Err(invalid(format!("rho must be in (0, 1), got {}", self.rho)));
        }
        if !(self.q.is_finite() && self.q > 0.0) {
            return Err(invalid(format!(
                "q must be finite and positive, got {}",
                self.q
            )));
        }
        if !(PHEROMONE_MIN..=PHEROMONE_MAX).contains(&self.initial_pheromone) {
            return Err(invalid(format!(
                "initial_pheromone must be in [{PHEROMONE_MIN}, {PHEROMONE_MAX}], got {}",
                self.initial_pheromone
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> AcoError {
    AcoError::InvalidConfig(msg)
}
