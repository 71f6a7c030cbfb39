use thiserror::Error;

pub type FlResult<T> = Result<T, FlError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
