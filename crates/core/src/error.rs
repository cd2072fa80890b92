/// Errors returned by the family history core.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("FHIR error: {0}")]
    Fhir(#[from] fhir::FhirError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),

    #[error("record does not belong to this session: {0}")]
    SessionMismatch(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
