//! Run-time kernel selection

use crate::core::{Result, SVMError};
use crate::kernel::{GaussianKernel, Kernel, QuantumKernel};
use log::{info, warn};
use std::fmt;
use std::str::FromStr;

/// Which similarity function the pipeline should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelChoice {
    /// Prefer the quantum kernel, substitute the Gaussian kernel (with a
    /// warning) when the data cannot be encoded
    #[default]
    Auto,
    /// Quantum kernel only; fail if it cannot encode the data
    Quantum,
    /// Gaussian kernel only
    Gaussian,
}

impl KernelChoice {
    /// Build the kernel for data with `n_features` columns
    pub fn resolve(self, n_features: usize, gamma: f64) -> Result<Box<dyn Kernel>> {
        let kernel: Box<dyn Kernel> = match self {
            KernelChoice::Quantum => {
                QuantumKernel::supports(n_features)?;
                Box::new(QuantumKernel::new())
            }
            KernelChoice::Gaussian => Box::new(GaussianKernel::new(gamma)?),
            KernelChoice::Auto => match QuantumKernel::supports(n_features) {
                Ok(()) => Box::new(QuantumKernel::new()),
                Err(reason) => {
                    warn!("{reason}. Using a Gaussian kernel (gamma={gamma}) instead.");
                    Box::new(GaussianKernel::new(gamma)?)
                }
            },
        };
        info!("Using {} kernel", kernel.name());
        Ok(kernel)
    }
}

impl fmt::Display for KernelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KernelChoice::Auto => "auto",
            KernelChoice::Quantum => "quantum",
            KernelChoice::Gaussian => "gaussian",
        };
        f.write_str(name)
    }
}

impl FromStr for KernelChoice {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(KernelChoice::Auto),
            "quantum" => Ok(KernelChoice::Quantum),
            "gaussian" | "rbf" => Ok(KernelChoice::Gaussian),
            other => Err(SVMError::InvalidParameter(format!(
                "Unknown kernel: {other} (expected auto, quantum or gaussian)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MAX_QUBITS;

    #[test]
    fn test_parse_round_trip() {
        for choice in [
            KernelChoice::Auto,
            KernelChoice::Quantum,
            KernelChoice::Gaussian,
        ] {
            assert_eq!(choice.to_string().parse::<KernelChoice>().unwrap(), choice);
        }
        assert_eq!("RBF".parse::<KernelChoice>().unwrap(), KernelChoice::Gaussian);
        assert!("poly".parse::<KernelChoice>().is_err());
    }

    #[test]
    fn test_resolve_prefers_quantum() {
        let kernel = KernelChoice::Auto.resolve(2, 0.5).unwrap();
        assert_eq!(kernel.name(), "quantum");
    }

    #[test]
    fn test_auto_falls_back_to_gaussian() {
        let kernel = KernelChoice::Auto.resolve(MAX_QUBITS + 1, 0.5).unwrap();
        assert_eq!(kernel.name(), "gaussian");
    }

    #[test]
    fn test_explicit_quantum_does_not_fall_back() {
        assert!(matches!(
            KernelChoice::Quantum.resolve(MAX_QUBITS + 1, 0.5),
            Err(SVMError::KernelUnavailable(_))
        ));
    }

    #[test]
    fn test_gaussian_validates_gamma() {
        assert!(KernelChoice::Gaussian.resolve(2, -1.0).is_err());
        assert_eq!(
            KernelChoice::Gaussian.resolve(2, 0.5).unwrap().name(),
            "gaussian"
        );
    }
}
