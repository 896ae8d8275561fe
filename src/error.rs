use std::fmt;

use pgwire::error::{ErrorInfo, PgWireError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Malformed text or wire input rejected at a codec boundary
    Format(String),
    /// Extension descriptor rejected during registration
    Registration(String),
    InvalidOperation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format(msg) => write!(f, "Format error: {}", msg),
            Error::Registration(msg) => write!(f, "Registration error: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for PgWireError {
    fn from(e: Error) -> PgWireError {
        match e {
            Error::Format(msg) => PgWireError::UserError(Box::new(ErrorInfo::new(
                "ERROR".to_string(),
                "22P02".to_string(), // invalid_text_representation
                msg,
            ))),
            Error::Registration(msg) => PgWireError::UserError(Box::new(ErrorInfo::new(
                "ERROR".to_string(),
                "42P17".to_string(), // invalid_object_definition
                msg,
            ))),
            Error::InvalidOperation(msg) => PgWireError::UserError(Box::new(ErrorInfo::new(
                "ERROR".to_string(),
                "XX000".to_string(), // internal_error
                msg,
            ))),
        }
    }
}
