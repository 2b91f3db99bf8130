// src/quantum/state.rs
//! Quantum state representations
//!
//! A register of `n` qubits is stored as `2^n` complex amplitudes. Qubit 0 is
//! the most significant bit of the basis index, so `|q0 q1 ... q(n-1)⟩` maps
//! to index `q0·2^(n-1) + ... + q(n-1)`.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Tolerance used when checking normalization.
const NORM_TOLERANCE: f64 = 1e-10;

/// Widest register the simulator accepts: 2^30 amplitudes are 16 GiB.
pub const MAX_QUBITS: usize = 30;

/// Number of amplitudes of a `qubit_count`-qubit register
pub fn dimension_for(qubit_count: usize) -> Result<usize> {
    u32::try_from(qubit_count)
        .ok()
        .filter(|_| qubit_count <= MAX_QUBITS)
        .and_then(|shift| 1usize.checked_shl(shift))
        .ok_or(Error::TooManyQubits {
            qubit_count,
            max: MAX_QUBITS,
        })
}

/// State vector representation of a quantum state
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    /// Number of qubits
    qubit_count: usize,

    /// The state vector as an array of complex amplitudes
    amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// Create a new state vector with the given amplitudes
    pub fn new(qubit_count: usize, amplitudes: Array1<Complex64>) -> Result<Self> {
        let expected_dim = dimension_for(qubit_count)?;

        if amplitudes.len() != expected_dim {
            return Err(Error::DimensionMismatch(format!(
                "state vector of {} qubits needs {} amplitudes, got {}",
                qubit_count, expected_dim, amplitudes.len()
            )));
        }

        let state = StateVector {
            qubit_count,
            amplitudes,
        };

        if !state.is_valid() {
            return Err(Error::DimensionMismatch(format!(
                "state vector is not normalized (norm² = {})",
                state.norm_sqr()
            )));
        }

        Ok(state)
    }

    /// Create a new state vector in the computational basis state |index⟩
    pub fn computational_basis(qubit_count: usize, index: usize) -> Result<Self> {
        let dim = dimension_for(qubit_count)?;

        if index >= dim {
            return Err(Error::DimensionMismatch(format!(
                "basis index {} is out of range for a {}-qubit state",
                index, qubit_count
            )));
        }

        let mut amplitudes = Array1::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);

        Ok(StateVector {
            qubit_count,
            amplitudes,
        })
    }

    /// Create the zero state |00...0⟩
    pub fn zero_state(qubit_count: usize) -> Result<Self> {
        Self::computational_basis(qubit_count, 0)
    }

    /// Return to |00...0⟩ without reallocating
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    /// Returns the number of qubits in this state
    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    /// Returns the dimension of the Hilbert space (2^n for n qubits)
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Get a reference to the amplitudes
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Sum of squared amplitude magnitudes
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).sum()
    }

    /// Check whether the state is normalized
    pub fn is_valid(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() < NORM_TOLERANCE
    }

    /// Inner product ⟨self|other⟩
    pub fn inner_product(&self, other: &Self) -> Result<Complex64> {
        if self.qubit_count != other.qubit_count {
            return Err(Error::DimensionMismatch(format!(
                "inner product of {}-qubit and {}-qubit states",
                self.qubit_count, other.qubit_count
            )));
        }

        Ok(self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Calculate the probability of measuring the given bit string
    pub fn probability(&self, bit_string: usize) -> f64 {
        if bit_string >= self.dimension() {
            return 0.0;
        }

        self.amplitudes[bit_string].norm_sqr()
    }

    /// Bit mask selecting `qubit` in a basis index.
    pub fn qubit_mask(&self, qubit: usize) -> Result<usize> {
        self.check_qubit(qubit)?;
        Ok(1 << (self.qubit_count - 1 - qubit))
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.qubit_count {
            return Err(Error::QubitOutOfRange {
                qubit,
                qubit_count: self.qubit_count,
            });
        }
        Ok(())
    }

    /// Apply a 2x2 unitary to a single qubit in place.
    pub fn apply_single_qubit_matrix(
        &mut self,
        matrix: &Array2<Complex64>,
        qubit: usize,
    ) -> Result<()> {
        if matrix.shape() != [2, 2] {
            return Err(Error::DimensionMismatch(format!(
                "single-qubit matrix must be 2x2, got {}x{}",
                matrix.shape()[0],
                matrix.shape()[1]
            )));
        }

        let mask = self.qubit_mask(qubit)?;
        let (m00, m01, m10, m11) = (
            matrix[[0, 0]],
            matrix[[0, 1]],
            matrix[[1, 0]],
            matrix[[1, 1]],
        );

        for i in 0..self.dimension() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m00 * a + m01 * b;
                self.amplitudes[j] = m10 * a + m11 * b;
            }
        }

        Ok(())
    }

    /// Apply a controlled-NOT in place.
    pub fn apply_cnot(&mut self, control: usize, target: usize) -> Result<()> {
        let ctrl_mask = self.qubit_mask(control)?;
        let tgt_mask = self.qubit_mask(target)?;

        if control == target {
            return Err(Error::RepeatedWire(control));
        }

        for i in 0..self.dimension() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_zero_is_most_significant() {
        let state = StateVector::zero_state(3).unwrap();
        assert_eq!(state.qubit_mask(0).unwrap(), 0b100);
        assert_eq!(state.qubit_mask(2).unwrap(), 0b001);
        assert!(state.qubit_mask(3).is_err());
    }

    #[test]
    fn test_cnot_flips_target_when_control_set() {
        // |10⟩ -> |11⟩
        let mut state = StateVector::computational_basis(2, 0b10).unwrap();
        state.apply_cnot(0, 1).unwrap();
        assert!((state.probability(0b11) - 1.0).abs() < 1e-12);

        assert!(matches!(state.apply_cnot(1, 1), Err(Error::RepeatedWire(1))));
    }

    #[test]
    fn test_new_rejects_unnormalized() {
        let amplitudes = Array1::from_elem(2, Complex64::new(1.0, 0.0));
        assert!(StateVector::new(1, amplitudes).is_err());
    }

    #[test]
    fn test_oversized_register_is_an_error() {
        assert_eq!(dimension_for(MAX_QUBITS).unwrap(), 1 << 30);
        for qubit_count in [MAX_QUBITS + 1, 64, 65, usize::MAX] {
            assert!(matches!(
                StateVector::zero_state(qubit_count),
                Err(Error::TooManyQubits { max: MAX_QUBITS, .. })
            ));
        }
        assert!(StateVector::computational_basis(64, 0).is_err());
        assert!(StateVector::new(64, Array1::zeros(1)).is_err());
    }
}
