use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("Cannot rank an empty set of properties")]
    EmptyInput,

    #[error("Invalid weight for {0}: must not be negative, got {1}")]
    InvalidWeight(String, Decimal),
}
