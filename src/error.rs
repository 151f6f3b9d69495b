/// Errors raised by the prompt assembler.
///
/// A rejected operation never leaves the working set partially modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblerError {
    #[error("File index {index} is out of range (working set has {len} files)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid model '{name}': max_tokens must be greater than zero (got {max_tokens})")]
    InvalidModel { name: String, max_tokens: i64 },

    #[error("Unknown model '{0}'")]
    UnknownModel(String),
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
