use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DemandError {
    #[error("Shape mismatch for {context}: expected length {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },
    #[error("Unknown demand method '{0}'")]
    UnknownMethod(String),
    #[error("Required runtime column not available on thermostat: {0}")]
    MissingColumn(String),
    #[error("Time index must be strictly increasing, but was not at position {position}")]
    UnorderedIndex { position: usize },
    #[error("Equipment type {0} is not recognised")]
    InvalidEquipmentType(u8),
    #[error("Non-finite temperature in {context} at position {position}")]
    NonFiniteTemperature { context: String, position: usize },
    #[error("Invalid estimation config: {0}")]
    InvalidConfig(String),
}

impl DemandError {
    pub(crate) fn shape_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            context: context.to_string(),
            expected,
            actual,
        }
    }
}

pub type DemandResult<T> = Result<T, DemandError>;
