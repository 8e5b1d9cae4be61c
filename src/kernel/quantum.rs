//! Quantum fidelity kernel
//!
//! Each feature vector is encoded into an n-qubit state with a ZZ feature map
//! and the kernel value is the fidelity between the two encoded states:
//!
//! K(x, y) = |⟨ψ(x)|ψ(y)⟩|²
//!
//! The circuit for a point x with one qubit per feature is:
//!
//! 1. H on every qubit
//! 2. RZ(π·x_q) on every qubit q
//! 3. for each adjacent pair (q, q+1): CX(q, q+1), RZ((π − x_q)(π − x_{q+1})) on q+1, CX(q, q+1)
//!
//! The state is simulated exactly, so cost grows as 2ⁿ per evaluation.

use crate::core::{Result, SVMError};
use crate::kernel::traits::ensure_same_dim;
use crate::kernel::Kernel;
use ndarray::ArrayView1;
use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Largest feature count the simulator will encode
pub const MAX_QUBITS: usize = 10;

/// Fidelity kernel over a simulated ZZ feature map
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantumKernel;

impl QuantumKernel {
    /// Create a new quantum kernel
    pub fn new() -> Self {
        Self
    }

    /// Check whether vectors with `n_features` entries can be encoded
    pub fn supports(n_features: usize) -> Result<()> {
        if n_features > MAX_QUBITS {
            return Err(SVMError::KernelUnavailable(format!(
                "quantum kernel needs one qubit per feature; {n_features} features exceed the {MAX_QUBITS}-qubit simulator"
            )));
        }
        Ok(())
    }

    /// Encode a point into its feature-map statevector
    pub fn encode(&self, x: ArrayView1<f64>) -> Result<Statevector> {
        Self::supports(x.len())?;
        let mut state = Statevector::zero(x.len());

        for q in 0..x.len() {
            state.hadamard(q);
        }
        for (q, &value) in x.iter().enumerate() {
            state.rz(q, PI * value);
        }
        for q in 1..x.len() {
            let angle = (PI - x[q - 1]) * (PI - x[q]);
            state.cx(q - 1, q);
            state.rz(q, angle);
            state.cx(q - 1, q);
        }

        Ok(state)
    }
}

impl Kernel for QuantumKernel {
    fn compute(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64> {
        ensure_same_dim(&x, &y)?;
        if x.is_empty() {
            return Ok(1.0);
        }
        let a = self.encode(x)?;
        let b = self.encode(y)?;
        Ok(a.fidelity(&b))
    }

    fn name(&self) -> &str {
        "quantum"
    }
}

/// Amplitudes of an n-qubit register; qubit q is bit q of the basis index
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    n_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// The |0…0⟩ state
    pub fn zero(n_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << n_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            n_qubits,
            amplitudes,
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Hadamard on qubit `q`; requires `q < n_qubits`
    pub(crate) fn hadamard(&mut self, q: usize) {
        debug_assert!(q < self.n_qubits, "qubit {q} out of range");
        let mask = 1 << q;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let a = self.amplitudes[i];
                let b = self.amplitudes[i | mask];
                self.amplitudes[i] = (a + b) * FRAC_1_SQRT_2;
                self.amplitudes[i | mask] = (a - b) * FRAC_1_SQRT_2;
            }
        }
    }

    /// RZ(θ) = diag(e^{-iθ/2}, e^{iθ/2}) on qubit `q < n_qubits`
    pub(crate) fn rz(&mut self, q: usize, theta: f64) {
        debug_assert!(q < self.n_qubits, "qubit {q} out of range");
        let mask = 1 << q;
        let low = Complex64::from_polar(1.0, -theta / 2.0);
        let high = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amplitude) in self.amplitudes.iter_mut().enumerate() {
            *amplitude *= if i & mask == 0 { low } else { high };
        }
    }

    /// CNOT; both qubits must be distinct and below `n_qubits`
    pub(crate) fn cx(&mut self, control: usize, target: usize) {
        debug_assert!(
            control < self.n_qubits && target < self.n_qubits && control != target,
            "invalid CNOT qubits ({control}, {target})"
        );
        let control_mask = 1 << control;
        let target_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & control_mask != 0 && i & target_mask == 0 {
                self.amplitudes.swap(i, i | target_mask);
            }
        }
    }

    /// |⟨self|other⟩|²
    pub fn fidelity(&self, other: &Statevector) -> f64 {
        let inner: Complex64 = self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum();
        inner.norm_sqr()
    }

    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_self_similarity_is_one() {
        let kernel = QuantumKernel::new();
        for point in [array![0.5, 0.2], array![-0.8, 0.9], array![1.3, -2.1, 0.4]] {
            assert_relative_eq!(
                kernel.compute(point.view(), point.view()).unwrap(),
                1.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_single_qubit_closed_form() {
        // One qubit: ⟨ψ(a)|ψ(b)⟩ = cos(π(a − b)/2)
        let kernel = QuantumKernel::new();
        let a = array![0.3];
        let b = array![-0.4];
        let expected = (PI * 0.7 / 2.0).cos().powi(2);

        assert_relative_eq!(
            kernel.compute(a.view(), b.view()).unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_symmetry_and_range() {
        let kernel = QuantumKernel::new();
        let points = [
            array![0.5, 0.2],
            array![0.55, 0.25],
            array![-0.8, 0.9],
            array![2.0, -1.5],
        ];

        for x in &points {
            for y in &points {
                let k_xy = kernel.compute(x.view(), y.view()).unwrap();
                let k_yx = kernel.compute(y.view(), x.view()).unwrap();
                assert_relative_eq!(k_xy, k_yx, epsilon = 1e-12);
                assert!((-1e-12..=1.0 + 1e-12).contains(&k_xy));
            }
        }
    }

    #[test]
    fn test_nearby_points_are_more_similar() {
        let kernel = QuantumKernel::new();
        let p1 = array![0.5, 0.2];
        let p2 = array![0.55, 0.25];
        let p3 = array![-0.8, 0.9];

        let near = kernel.compute(p1.view(), p2.view()).unwrap();
        let far = kernel.compute(p1.view(), p3.view()).unwrap();
        assert!(near > far);
    }

    #[test]
    fn test_encoding_preserves_norm() {
        let kernel = QuantumKernel::new();
        let state = kernel.encode(array![0.7, -1.1, 0.3].view()).unwrap();
        assert_eq!(state.n_qubits(), 3);
        assert_eq!(state.amplitudes().len(), 8);
        assert_relative_eq!(state.norm_sqr(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let kernel = QuantumKernel::new();
        let x = array![0.1, 0.2];
        let y = array![0.1];
        assert!(matches!(
            kernel.compute(x.view(), y.view()),
            Err(SVMError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_too_many_qubits() {
        let kernel = QuantumKernel::new();
        let x = Array1::<f64>::zeros(MAX_QUBITS + 1);
        assert!(matches!(
            kernel.compute(x.view(), x.view()),
            Err(SVMError::KernelUnavailable(_))
        ));
        assert!(QuantumKernel::supports(MAX_QUBITS).is_ok());
    }

    #[test]
    fn test_empty_vectors() {
        let kernel = QuantumKernel::new();
        let x = Array1::<f64>::zeros(0);
        assert_eq!(kernel.compute(x.view(), x.view()).unwrap(), 1.0);
    }

    #[test]
    fn test_gates() {
        let mut state = Statevector::zero(2);
        state.hadamard(0);
        state.cx(0, 1);
        // Bell state (|00⟩ + |11⟩)/√2
        assert_relative_eq!(state.amplitudes()[0].re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(state.amplitudes()[3].re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(state.amplitudes()[1].norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(state.amplitudes()[2].norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_gate_rejects_missing_qubit() {
        let mut state = Statevector::zero(2);
        state.hadamard(2);
    }
}
