use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallbackError {
    #[error("Observer callback failed: {0}")]
    Failed(String),
    #[error("Observer callback panicked: {0}")]
    Panicked(String),
}

impl CallbackError {
    pub fn failed(reason: impl ToString) -> Self {
        CallbackError::Failed(reason.to_string())
    }
}

pub type CallbackResult = Result<(), CallbackError>;
