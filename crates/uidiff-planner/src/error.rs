use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Blueprint generator failed: {message}")]
    Generator { message: String },

    #[error("Blueprint generator returned an empty reply")]
    EmptyReply,

    #[error("Invalid blueprint reply: {source}")]
    InvalidReply {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode blueprint request: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("Directory does not exist: {}", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn generator(message: impl Into<String>) -> Self {
        Self::Generator {
            message: message.into(),
        }
    }
}
