use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("storage rejected the write for {0:?}")]
    WriteRejected(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
