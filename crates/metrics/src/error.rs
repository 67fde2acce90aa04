use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    #[error("Calculation error: {0}")]
    Calculation(String),
}
