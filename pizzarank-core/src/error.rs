use thiserror::Error;

use crate::types::SortKey;

/// Why a set of base fields was rejected. Nothing is mutated when this is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("quantity must be a positive whole number")]
    ZeroQuantity,
    #[error("diameter must be a finite number, got {0}")]
    NonFiniteDiameter(f64),
    #[error("diameter must be positive, got {0}")]
    NonPositiveDiameter(f64),
    #[error("price must be a finite number, got {0}")]
    NonFinitePrice(f64),
    #[error("price must be positive, got {0}")]
    NonPositivePrice(f64),
    #[error("diameter and price are too extreme to compute area and price per area")]
    DerivedOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PizzaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("position {position} is out of range ({len} entries)")]
    InvalidPosition { position: usize, len: usize },
    #[error("cannot sort by {0}")]
    UnsortableKey(SortKey),
    #[cfg(feature = "share")]
    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, PizzaError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSortKeyError {
    #[error("unknown sort key {0:?}")]
    Unknown(String),
    #[error("ranking by rank is circular")]
    Circular,
}

/// Reasons a shared payload could not be turned back into entries.
#[cfg(feature = "share")]
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid percent-encoded UTF-8: {0}")]
    Percent(#[from] std::string::FromUtf8Error),
    #[error("payload is not a valid entry list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record {index} is invalid: {source}")]
    Record {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("the shared state contains no usable data")]
    NoUsableData,
}
