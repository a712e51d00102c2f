use thiserror::Error;

use crate::domain::catalog::CatalogError;

/// Errors surfaced by a simulation run
///
/// Every variant is raised before the offending value can reach a
/// [`ResultSet`](crate::domain::ResultSet); a failed run never yields partial output.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Progress observer failed: {0}")]
    Progress(#[from] ProgressError),
}

/// Failure reported by a progress observer; aborts the run that invoked it
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ProgressError(pub String);

impl From<validator::ValidationErrors> for SimulationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SimulationError::Configuration(errors.to_string())
    }
}

impl SimulationError {
    /// Stable label for the error family, for callers that map errors to messages
    pub fn kind(&self) -> &'static str {
        match self {
            SimulationError::Configuration(_) => "ConfigurationError",
            SimulationError::Catalog(_) => "CatalogError",
            SimulationError::Computation(_) => "ComputationError",
            SimulationError::Progress(_) => "ProgressError",
        }
    }
}

/// Rejects NaN and infinities produced by an intermediate step
pub(crate) fn ensure_finite(label: &str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::Computation(format!(
            "{label} is not finite ({value})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            SimulationError::Configuration("x".to_string()).kind(),
            "ConfigurationError"
        );
        assert_eq!(
            SimulationError::Computation("x".to_string()).kind(),
            "ComputationError"
        );
        assert_eq!(
            SimulationError::from(ProgressError("closed".to_string())).kind(),
            "ProgressError"
        );
    }

    #[test]
    fn test_error_display() {
        let error = SimulationError::Configuration("trials must be at least 1".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: trials must be at least 1"
        );
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("x", 1.5).unwrap(), 1.5);
        assert!(matches!(
            ensure_finite("x", f64::NAN),
            Err(SimulationError::Computation(_))
        ));
        assert!(ensure_finite("x", f64::INFINITY).is_err());
    }
}
