use thiserror::Error;

/// pricecmp error types
#[derive(Error, Debug)]
pub enum PriceCompareError {
    /// Query was empty after trimming
    #[error("query must not be empty")]
    EmptyQuery,

    /// Price text could not be turned into a number
    #[error("parse error: {0}")]
    Parse(String),

    /// A store quote carried an unparsable price
    #[error("invalid price {price:?} for store {store}")]
    InvalidPrice { store: String, price: String },

    /// Lowest price is zero, margin would divide by zero
    #[error("degenerate input: lowest price is zero")]
    DegenerateInput,

    /// Comparison result has no stores
    #[error("comparison result is empty")]
    EmptyResult,

    /// Comparison API request failed (transport, status or payload)
    #[error("network error: {0}")]
    Network(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// History persistence failed
    #[error("history error: {0}")]
    History(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for pricecmp
pub type Result<T> = std::result::Result<T, PriceCompareError>;
