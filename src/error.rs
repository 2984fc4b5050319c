use core::fmt;

use thiserror::Error;

use crate::ScalarType;

#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("'ply' expected, found {line:?}")]
    MagicMismatch { line: String },

    #[error("Invalid format line: {line:?}")]
    InvalidFormatLine { line: String },

    #[error("Invalid header line: {line:?}")]
    InvalidHeaderLine { line: String },

    #[error("Malformed element line: {line:?}")]
    MalformedElementLine { line: String },

    #[error("Property declared before any element: {line:?}")]
    PropertyWithoutElement { line: String },

    #[error("Unknown scalar type: {name}")]
    UnknownType { name: String },

    #[error("Unsupported schema for element '{element}': a list property must be the only property")]
    UnsupportedSchema { element: String },

    #[error("Invalid property list line for element '{element}': declared {declared} values, found {found}")]
    ListLengthMismatch {
        element: String,
        declared: usize,
        found: usize,
    },

    #[error("Element '{element}' expects {expected} properties per line, found {found}")]
    PropertyCountMismatch {
        element: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid {data_type} value: {token:?}")]
    InvalidValue {
        token: String,
        data_type: ScalarType,
    },

    #[error("List length must be a non-negative integer")]
    InvalidListLength,

    #[error("Header or ascii body line is not valid text")]
    InvalidText,

    #[error("Unexpected data after the last declared element")]
    UnexpectedBodyData,

    #[error("Unexpected end of stream {}", outstanding(.element.as_deref(), .remaining))]
    PrematureEndOfStream {
        element: Option<String>,
        remaining: usize,
    },

    #[error("Decoder already failed and cannot continue")]
    Poisoned,

    #[error("Ply row must be a struct or map.")]
    RowMustBeStructOrMap,

    #[error("Serde error: {0}")]
    Serde(String),
}

fn outstanding(element: Option<&str>, remaining: &usize) -> String {
    match element {
        Some(element) => format!("({remaining} rows of '{element}' outstanding)"),
        None => "before end_header".to_string(),
    }
}

impl serde::de::Error for PlyError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        PlyError::Serde(msg.to_string())
    }
}
