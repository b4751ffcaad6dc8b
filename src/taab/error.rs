use crate::model::{Category, SchemaVariant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaabError {
    #[error("Please scan a card first.")]
    NoCardScanned,

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Card ID must be at least {min} characters")]
    CardIdTooShort { min: usize },

    #[error("Card scanning is not supported on this device")]
    ScannerUnavailable,

    #[error("Unsupported file type '{0}': not yet supported")]
    UnsupportedFileType(String),

    #[error("Malformed JSON: {0}")]
    MalformedJson(String),

    #[error("Malformed CSV row at line {line}: {reason}")]
    MalformedCsvRow { line: u64, reason: String },

    #[error("{category} is not offered by the {schema} schema")]
    CategoryNotOffered {
        category: Category,
        schema: SchemaVariant,
    },

    #[error("Entry index {index} is out of range (have {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TaabError>;
