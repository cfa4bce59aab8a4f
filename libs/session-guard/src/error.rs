use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Token storage lock poisoned")]
    Poisoned,

    #[error("Refusing to store an empty session token")]
    EmptyToken,
}
