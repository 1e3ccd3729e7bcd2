use crate::detect::Dialect;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The AI backend reported an error envelope mid-stream.
    #[error("AI stream reported an error: {message}")]
    Stream { message: String },

    /// The converter table has no entry for this dialect. The pipeline
    /// degrades this to an informational outcome; it only surfaces as an
    /// error when the table is queried directly.
    #[error("Unsupported diagram dialect: {dialect}")]
    UnsupportedDialect { dialect: Dialect },
}
