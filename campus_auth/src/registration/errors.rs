use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum RegistrationError {
    #[error("Storage error: {0}")]
    Storage(String),
}
