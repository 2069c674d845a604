use fields::FieldsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AclError>;

#[derive(Error, Debug)]
pub enum AclError {
    #[error("Got nil value for {0}")]
    MissingValue(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("Invalid parameter {0}")]
    UnknownAttribute(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    YamlParsing(#[from] serde_yaml::Error),

    #[error("Manifest parsing error: {0}")]
    ManifestParsing(String),
}

impl AclError {
    /// A required value was null or absent
    pub fn is_missing_value(&self) -> bool {
        matches!(self, AclError::MissingValue(_))
    }

    /// A value was present but rejected
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, AclError::InvalidValue(_))
    }
}

impl From<FieldsError> for AclError {
    fn from(err: FieldsError) -> Self {
        match err {
            FieldsError::MissingValue(field) => AclError::MissingValue(field),
            FieldsError::InvalidValue(message) => AclError::InvalidValue(message),
            FieldsError::NotFound(field) => AclError::UnknownAttribute(field),
        }
    }
}
