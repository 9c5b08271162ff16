//! Dense city-pair matrices: edge costs and pheromone intensities.

use std::ops::RangeInclusive;

use crate::error::{AcoError, Result};
use crate::random::RandomSource;

/// Lower clamp applied to every pheromone entry after an update.
pub const PHEROMONE_MIN: f64 = 1e-4;

/// Upper clamp applied to every pheromone entry after an update.
pub const PHEROMONE_MAX: f64 = 1e5;

/// Initial off-diagonal pheromone intensity.
pub const DEFAULT_INITIAL_PHEROMONE: f64 = 0.01;

/// A dense n×n edge-cost matrix stored in row-major order.
///
/// The diagonal is never read by the colony. Off the diagonal, entries
/// must be finite, non-negative and symmetric; [`DistanceMatrix::validate`]
/// checks this and the colony refuses matrices that fail it.
///
/// # Examples
///
/// ```
/// use u_aco::aco::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_rows(&[
///     vec![0.0, 5.0, 9.0],
///     vec![5.0, 0.0, 4.0],
///     vec![9.0, 4.0, 0.0],
/// ])
/// .expect("square");
/// assert_eq!(dm.size(), 3);
/// assert_eq!(dm.get(2, 1), 4.0);
/// assert!(dm.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit row-major buffer.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from nested rows.
    ///
    /// Only the shape is checked here; call [`validate`](Self::validate)
    /// for the full contract.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(AcoError::InvalidMatrix(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { data, size })
    }

    /// Generates a symmetric matrix of integer distances drawn uniformly
    /// from `range`.
    ///
    /// Draws are taken over the upper triangle in row-major order and
    /// mirrored, one draw per unordered pair.
    pub fn random<R: RandomSource>(
        size: usize,
        range: RangeInclusive<usize>,
        rng: &mut R,
    ) -> Result<Self> {
        let (min, max) = (*range.start(), *range.end());
        if min > max {
            return Err(AcoError::InvalidMatrix(format!(
                "empty distance range {min}..={max}"
            )));
        }

        let mut dm = Self::new(size);
        for i in 0..size {
            for j in (i + 1)..size {
                let d = rng.next_index(min, max + 1) as f64;
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        Ok(dm)
    }

    /// Parses a JSON array of rows, e.g. `[[0, 3], [3, 0]]`.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<Vec<f64>> =
            serde_json::from_str(json).map_err(|e| AcoError::Parse(e.to_string()))?;
        Self::from_rows(&rows)
    }

    /// Returns the cost of the edge `from → to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the cost of the edge `from → to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Checks the shape and symmetry contract the colony relies on.
    pub fn validate(&self) -> Result<()> {
        if self.data.len() != self.size * self.size {
            return Err(AcoError::InvalidMatrix(format!(
                "{} entries for a {}x{} matrix",
                self.data.len(),
                self.size,
                self.size
            )));
        }
        if self.size < 2 {
            return Err(AcoError::InvalidMatrix(format!(
                "need at least 2 cities, got {}",
                self.size
            )));
        }
        for i in 0..self.size {
            for j in 0..self.size {
                if i == j {
                    continue;
                }
                let d = self.get(i, j);
                if !d.is_finite() || d < 0.0 {
                    return Err(AcoError::InvalidMatrix(format!(
                        "distance[{i}][{j}] = {d} must be finite and non-negative"
                    )));
                }
            }
        }
        if !self.is_symmetric(0.0) {
            return Err(AcoError::InvalidMatrix("matrix is not symmetric".into()));
        }
        Ok(())
    }
}

/// Symmetric n×n pheromone intensities.
///
/// Every write goes through [`set_pair`](Self::set_pair), which clamps to
/// `[PHEROMONE_MIN, PHEROMONE_MAX]` and mirrors the value, so symmetry and
/// bounds hold after every update.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    data: Vec<f64>,
    size: usize,
}

impl PheromoneMatrix {
    /// Creates a matrix with `initial` everywhere off the diagonal.
    ///
    /// The diagonal stays at zero and is never read.
    pub fn new(size: usize, initial: f64) -> Self {
        let mut data = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                data[i * size + j] = initial;
                data[j * size + i] = initial;
            }
        }
        Self { data, size }
    }

    /// Returns the intensity on edge `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    /// Clamps `value` and writes it to both `(i, j)` and `(j, i)`.
    pub(crate) fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        let v = clamp_pheromone(value);
        self.data[i * self.size + j] = v;
        self.data[j * self.size + i] = v;
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Clamps into the pheromone bounds. `+inf` saturates at the upper bound.
#[inline]
pub(crate) fn clamp_pheromone(value: f64) -> f64 {
    if value < PHEROMONE_MIN {
        PHEROMONE_MIN
    } else if value > PHEROMONE_MAX {
        PHEROMONE_MAX
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SubtractiveRng;

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(1, 0), 5.0);
    }

    #[test]
    fn test_from_data_invalid_size() {
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_from_rows_ragged() {
        let err = DistanceMatrix::from_rows(&[vec![0.0, 1.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, AcoError::InvalidMatrix(_)));
    }

    #[test]
    fn test_validate_too_small() {
        let dm = DistanceMatrix::new(1);
        assert!(dm.validate().is_err());
        assert!(DistanceMatrix::new(0).validate().is_err());
    }

    #[test]
    fn test_validate_asymmetric() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert!(!dm.is_symmetric(1e-10));
        assert!(dm.validate().is_err());
    }

    #[test]
    fn test_validate_negative_and_nan() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, -1.0);
        dm.set(1, 0, -1.0);
        assert!(dm.validate().is_err());

        dm.set(0, 1, f64::NAN);
        dm.set(1, 0, f64::NAN);
        assert!(dm.validate().is_err());
    }

    #[test]
    fn test_validate_ignores_diagonal() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 0, f64::NAN);
        dm.set(0, 1, 3.0);
        dm.set(1, 0, 3.0);
        assert!(dm.validate().is_ok());
    }

    #[test]
    fn test_random_matrix_symmetric_and_in_range() {
        let mut rng = SubtractiveRng::new(0);
        let dm = DistanceMatrix::random(10, 1..=8, &mut rng).expect("valid range");
        assert!(dm.validate().is_ok());
        for i in 0..10 {
            for j in (i + 1)..10 {
                let d = dm.get(i, j);
                assert!((1.0..=8.0).contains(&d));
                assert_eq!(d.fract(), 0.0);
            }
        }
        assert_eq!(dm.get(0, 1), 6.0);
        assert_eq!(dm.get(8, 9), 8.0);
    }

    #[test]
    fn test_random_matrix_empty_range() {
        let mut rng = SubtractiveRng::new(0);
        #[allow(clippy::reversed_empty_ranges)]
        let result = DistanceMatrix::random(4, 5..=2, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_mismatched_buffer() {
        let dm = DistanceMatrix {
            data: vec![0.0, 1.0],
            size: 3,
        };
        assert!(matches!(dm.validate(), Err(AcoError::InvalidMatrix(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialized_shape_mismatch_is_rejected() {
        let dm: DistanceMatrix =
            serde_json::from_str(r#"{"data":[0.0,1.0],"size":3}"#).expect("well-formed json");
        assert!(matches!(dm.validate(), Err(AcoError::InvalidMatrix(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_str() {
        let dm = DistanceMatrix::from_json_str("[[0, 3, 4], [3, 0, 5], [4, 5, 0]]")
            .expect("well-formed");
        assert_eq!(dm.size(), 3);
        assert_eq!(dm.get(1, 2), 5.0);
        assert!(dm.validate().is_ok());

        assert!(matches!(
            DistanceMatrix::from_json_str("[[0, 1"),
            Err(AcoError::Parse(_))
        ));
    }

    #[test]
    fn test_pheromone_init() {
        let pm = PheromoneMatrix::new(4, DEFAULT_INITIAL_PHEROMONE);
        for i in 0..4 {
            assert_eq!(pm.get(i, i), 0.0);
            for j in 0..4 {
                if i != j {
                    assert_eq!(pm.get(i, j), 0.01);
                }
            }
        }
    }

    #[test]
    fn test_pheromone_set_pair_clamps_and_mirrors() {
        let mut pm = PheromoneMatrix::new(3, 0.01);
        pm.set_pair(0, 2, 1e9);
        assert_eq!(pm.get(0, 2), PHEROMONE_MAX);
        assert_eq!(pm.get(2, 0), PHEROMONE_MAX);

        pm.set_pair(1, 2, 0.0);
        assert_eq!(pm.get(1, 2), PHEROMONE_MIN);
        assert_eq!(pm.get(2, 1), PHEROMONE_MIN);

        pm.set_pair(0, 1, f64::INFINITY);
        assert_eq!(pm.get(1, 0), PHEROMONE_MAX);
    }
}
