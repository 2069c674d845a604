use thiserror::Error;

pub type Result<T> = std::result::Result<T, FieldsError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldsError {
    /// A field that demands an explicit value received null or nothing
    #[error("Got nil value for {0}")]
    MissingValue(String),

    /// Any other rejected value; the message carries the offending input
    #[error("{0}")]
    InvalidValue(String),

    #[error("Field not found: {0}")]
    NotFound(String),
}

impl FieldsError {
    pub fn is_missing_value(&self) -> bool {
        matches!(self, FieldsError::MissingValue(_))
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, FieldsError::InvalidValue(_))
    }
}
