use thiserror::Error;

use crate::Symbol;

/// Problems found while loading a persisted code table.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    #[error("Line {line}: symbol {text:?} is not a non-negative integer")]
    InvalidSymbol { line: usize, text: String },
    #[error("Line {line}: path {text:?} contains characters other than '0' and '1'")]
    InvalidPath { line: usize, text: String },
    #[error("Line {line}: the path of symbol {symbol} is empty")]
    EmptyPath { line: usize, symbol: Symbol },
    #[error("Line {line}: symbol {symbol} has no path line")]
    UnpairedSymbol { line: usize, symbol: Symbol },
    #[error("Symbol {symbol} appears more than once in the table")]
    DuplicateSymbol { symbol: Symbol },
    #[error("The path {path} of symbol {symbol} collides with the path of another symbol")]
    PrefixCollision { symbol: Symbol, path: String },
    #[error("The code is not complete: position {path:?} has a single child")]
    IncompleteCode { path: String },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodeError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("The bit source ended in the middle of a code word after {bits_read} bits")]
    TruncatedStream { bits_read: usize },
    #[error("Cannot decode with a tree that holds no symbols")]
    EmptyAlphabet,
    #[error("The frequency of symbol {symbol} does not fit in 64 bits")]
    FrequencyOverflow { symbol: Symbol },
    #[error("The total weight of the alphabet does not fit in 64 bits")]
    WeightOverflow,
    #[error("Symbol {symbol} is not part of the code")]
    UnknownSymbol { symbol: Symbol },
    #[error("Symbol {symbol} cannot be written as a single byte")]
    UnrepresentableSymbol { symbol: Symbol },
    #[error("Malformed property {key}: {message}")]
    Properties { key: String, message: String },
    #[error(transparent)]
    PropertiesFile(#[from] java_properties::PropertiesError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
