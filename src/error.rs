use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid markup, or a process-wide collaborator that was never registered.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A caller handed in something that can never be valid.
    #[error("argument error: {0}")]
    Argument(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to read tags: {0}")]
    Tag(#[from] id3::Error),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn argument(msg: impl Into<String>) -> Self {
        Error::Argument(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    pub fn is_argument(&self) -> bool {
        matches!(self, Error::Argument(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
