pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid algorithm id: {0}")]
    InvalidAlgorithm(u8),
    
    #[error("Invalid overlay color: {0}")]
    InvalidColor(u8),
}
