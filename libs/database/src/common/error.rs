/// Errors raised while establishing or probing a database connection.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The server did not answer a ping
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A value could not be turned into BSON
    #[error("Encoding error: {0}")]
    Encode(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
