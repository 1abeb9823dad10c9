use skylark_core::parameters::ParameterError;

/// Errors that can occur while building or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid control configuration: {0}")]
    InvalidConfig(ParameterError),

    #[error("control tick failed: {0}")]
    Tick(&'static str),

    #[error("scenario error: {0}")]
    Scenario(String),
}

impl From<ParameterError> for SimError {
    fn from(err: ParameterError) -> Self {
        SimError::InvalidConfig(err)
    }
}
