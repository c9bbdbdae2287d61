use crate::model::Source;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing {side} input: no detections and no semantic graph were provided")]
    MissingInput { side: Source },

    #[error("Invalid {side} input JSON: {source}")]
    InputJson {
        side: Source,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {side} semantic graph: {message}")]
    InvalidGraph { side: Source, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}
