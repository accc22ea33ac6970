use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid field id: {0:?}")]
    InvalidFieldId(String),
    #[error("employee record is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },
}

pub type Result<T> = std::result::Result<T, ModelError>;
