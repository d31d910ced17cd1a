use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

/// Server error codes the provisioner distinguishes
pub mod codes {
    pub const INDEX_OPTIONS_CONFLICT: i32 = 85;
    pub const INDEX_KEY_SPECS_CONFLICT: i32 = 86;
    pub const NAMESPACE_EXISTS: i32 = 48;
    pub const DOCUMENT_VALIDATION_FAILURE: i32 = 121;
    pub const DUPLICATE_KEY: i32 = 11000;
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Collection '{0}' already exists")]
    CollectionExists(String),

    #[error("Duplicate key in '{collection}': {message}")]
    DuplicateKey { collection: String, message: String },

    #[error("Document rejected by the '{collection}' validator: {message}")]
    DocumentValidation { collection: String, message: String },

    #[error("Index conflict on '{collection}': {message}")]
    IndexConflict { collection: String, message: String },

    #[error("Invalid {collection} document '{id}': {details}")]
    InvalidDocument {
        collection: String,
        id: String,
        details: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;

impl ProvisionError {
    /// Map a server error code raised while working on `collection`
    pub fn from_server_code(collection: &str, code: Option<i32>, message: String) -> Self {
        let collection = collection.to_string();
        match code {
            Some(codes::NAMESPACE_EXISTS) => ProvisionError::CollectionExists(collection),
            Some(codes::DUPLICATE_KEY) => ProvisionError::DuplicateKey {
                collection,
                message,
            },
            Some(codes::DOCUMENT_VALIDATION_FAILURE) => ProvisionError::DocumentValidation {
                collection,
                message,
            },
            Some(codes::INDEX_OPTIONS_CONFLICT | codes::INDEX_KEY_SPECS_CONFLICT) => {
                ProvisionError::IndexConflict {
                    collection,
                    message,
                }
            }
            _ => ProvisionError::Database(message),
        }
    }

    /// Classify a driver error raised while working on `collection`
    pub fn from_driver(collection: &str, err: mongodb::error::Error) -> Self {
        let code = server_error_code(&err);
        Self::from_server_code(collection, code, err.to_string())
    }

    /// True when the failure means the store was already provisioned
    pub fn is_already_provisioned(&self) -> bool {
        matches!(
            self,
            ProvisionError::CollectionExists(_) | ProvisionError::DuplicateKey { .. }
        )
    }
}

/// First server error code carried by a driver error, if any
fn server_error_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        ErrorKind::InsertMany(insert) => insert
            .write_errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.code),
        _ => None,
    }
}

impl From<mongodb::error::Error> for ProvisionError {
    fn from(err: mongodb::error::Error) -> Self {
        ProvisionError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ProvisionError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProvisionError::Serialization(err.to_string())
    }
}
