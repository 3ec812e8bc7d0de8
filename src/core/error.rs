use thiserror::Error;

use crate::objects::loader::ConfigError;

#[derive(Error, Debug)]
pub enum ObjectError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Object is not loaded: {0}")]
    NotLoaded(String),

    #[error("Invalid object config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ObjectError>;
