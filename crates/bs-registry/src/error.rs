//! Registry lookup errors.

use thiserror::Error;

/// Result type for registry lookups.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while resolving a request against the registry.
///
/// All of these are client input errors: they are detected before any
/// solver work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unsupported battery type: {chemistry}")]
    UnsupportedChemistry { chemistry: String },

    #[error("Unsupported model '{model}' for battery type '{chemistry}'")]
    UnsupportedModel { chemistry: String, model: String },

    #[error("Parameter set '{parameter_set}' not available for '{chemistry}'")]
    UnsupportedParameterSet {
        chemistry: String,
        parameter_set: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_inputs() {
        let err = RegistryError::UnsupportedModel {
            chemistry: "lead-acid".into(),
            model: "SPM".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SPM"));
        assert!(msg.contains("lead-acid"));
    }
}
